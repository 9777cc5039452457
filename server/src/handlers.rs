//! Axum handlers: thin adapters from HTTP onto `TodoStore`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::error::StoreError;
use crate::store::TodoStore;
use crate::types::{CreateTodo, ReplaceTodo, Todo, UpdateTodo};

pub async fn health() -> Json<Value> {
    Json(json!({ "message": "Healthy" }))
}

pub async fn openapi() -> Json<Value> {
    Json(crate::openapi::document())
}

pub async fn list_todos(State(store): State<TodoStore>) -> Result<Json<Vec<Todo>>, StoreError> {
    store.list().map(Json)
}

pub async fn create_todo(
    State(store): State<TodoStore>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), StoreError> {
    let todo = store.create(input)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn get_todo(
    State(store): State<TodoStore>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, StoreError> {
    store.get(id).map(Json)
}

pub async fn update_todo(
    State(store): State<TodoStore>,
    Path(id): Path<i64>,
    Json(patch): Json<UpdateTodo>,
) -> Result<Json<Todo>, StoreError> {
    store.update(id, patch).map(Json)
}

pub async fn replace_todo(
    State(store): State<TodoStore>,
    Path(id): Path<i64>,
    Json(input): Json<ReplaceTodo>,
) -> Result<Json<Todo>, StoreError> {
    store.replace(id, input).map(Json)
}

pub async fn toggle_todo(
    State(store): State<TodoStore>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, StoreError> {
    store.toggle(id).map(Json)
}

pub async fn delete_todo(
    State(store): State<TodoStore>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StoreError> {
    store.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
