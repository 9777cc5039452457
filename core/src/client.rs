//! Stateless HTTP request builder and response parser for the todo API.
//!
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, ReplaceTodo, Todo, UpdateTodo};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_health(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/")
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/todos")
    }

    pub fn build_get_todo(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/todos/{id}"))
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/todos", input)
    }

    pub fn build_update_todo(&self, id: i64, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Patch, &format!("/todos/{id}"), input)
    }

    pub fn build_replace_todo(&self, id: i64, input: &ReplaceTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/todos/{id}"), input)
    }

    pub fn build_toggle_todo(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Patch, &format!("/todos/{id}/toggle"))
    }

    pub fn build_delete_todo(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/todos/{id}"))
    }

    pub fn parse_health(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 201)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_replace_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut request = self.request(method, path);
        request
            .headers
            .push(("content-type".to_string(), "application/json".to_string()));
        request.body = Some(body);
        Ok(request)
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    match response.status {
        status if status == expected => Ok(()),
        404 => Err(ApiError::NotFound),
        422 => Err(ApiError::Validation {
            body: response.body.clone(),
        }),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TODO_JSON: &str = r#"{"id":1,"title":"Test","description":null,"completed":false,"created_at":"2024-01-02T03:04:05Z","updated_at":"2024-01-02T03:04:05Z"}"#;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3001")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3001/todos");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_todo_produces_correct_request() {
        let req = client().build_get_todo(42);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3001/todos/42");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_todo_produces_correct_request() {
        let input = CreateTodo {
            title: "Buy milk".to_string(),
            description: None,
            completed: false,
        };
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3001/todos");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Buy milk");
        assert_eq!(body["completed"], false);
        assert!(body.get("description").is_none());
    }

    #[test]
    fn build_update_todo_uses_patch_and_omits_absent_fields() {
        let input = UpdateTodo {
            completed: Some(true),
            ..UpdateTodo::default()
        };
        let req = client().build_update_todo(1, &input).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "http://localhost:3001/todos/1");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "completed": true }));
    }

    #[test]
    fn build_update_todo_sends_explicit_null_description() {
        let input = UpdateTodo {
            description: Some(None),
            ..UpdateTodo::default()
        };
        let req = client().build_update_todo(1, &input).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "description": null }));
    }

    #[test]
    fn build_replace_todo_uses_put() {
        let input = ReplaceTodo {
            title: "All".to_string(),
            description: None,
            completed: true,
        };
        let req = client().build_replace_todo(3, &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3001/todos/3");
    }

    #[test]
    fn build_toggle_and_delete_have_no_body() {
        let toggle = client().build_toggle_todo(5);
        assert_eq!(toggle.method, HttpMethod::Patch);
        assert_eq!(toggle.path, "http://localhost:3001/todos/5/toggle");
        assert!(toggle.body.is_none());

        let delete = client().build_delete_todo(5);
        assert_eq!(delete.method, HttpMethod::Delete);
        assert!(delete.body.is_none());
    }

    #[test]
    fn parse_list_todos_success() {
        let todos = client()
            .parse_list_todos(response(200, &format!("[{TODO_JSON}]")))
            .unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, 1);
        assert_eq!(todos[0].title, "Test");
    }

    #[test]
    fn parse_get_todo_not_found() {
        let err = client().parse_get_todo(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_create_todo_success() {
        let todo = client().parse_create_todo(response(201, TODO_JSON)).unwrap();
        assert_eq!(todo.title, "Test");
        assert!(!todo.completed);
    }

    #[test]
    fn parse_create_todo_validation_failure() {
        let err = client()
            .parse_create_todo(response(422, r#"{"error":"validation failed: title must not be empty"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { ref body } if body.contains("title")));
    }

    #[test]
    fn parse_create_todo_wrong_status() {
        let err = client()
            .parse_create_todo(response(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_delete_todo_success_and_not_found() {
        assert!(client().parse_delete_todo(response(204, "")).is_ok());
        let err = client().parse_delete_todo(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3001/");
        let req = client.build_list_todos();
        assert_eq!(req.path, "http://localhost:3001/todos");
        assert_eq!(client.build_health().path, "http://localhost:3001/");
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client()
            .parse_list_todos(response(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
