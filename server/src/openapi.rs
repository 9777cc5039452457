//! OpenAPI 3 description of the HTTP surface.
//!
//! Served at `GET /openapi.json` and written to disk by the
//! `generate-openapi` binary. Keep in sync with the router in `lib.rs`.

use std::path::Path;

use serde_json::{json, Value};

pub const DEFAULT_OUTPUT: &str = "interfaces/openapi.json";

pub fn document() -> Value {
    let id_param = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": "Unique identifier of the todo",
        "schema": { "type": "integer", "format": "int64" }
    });
    let todo_ref = json!({ "$ref": "#/components/schemas/Todo" });
    let todo_body = |description: &str| {
        json!({
            "description": description,
            "content": { "application/json": { "schema": todo_ref.clone() } }
        })
    };
    let error = |description: &str| {
        json!({
            "description": description,
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } }
        })
    };
    let request = |schema: &str| {
        json!({
            "required": true,
            "content": { "application/json": { "schema": { "$ref": format!("#/components/schemas/{schema}") } } }
        })
    };

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Todo API",
            "description": "A minimal CRUD API for managing Todos.",
            "version": env!("CARGO_PKG_VERSION")
        },
        "tags": [
            { "name": "health", "description": "Health check endpoints" },
            { "name": "todos", "description": "Operations on todo items" }
        ],
        "paths": {
            "/": {
                "get": {
                    "tags": ["health"],
                    "summary": "Health Check",
                    "operationId": "health_check",
                    "responses": {
                        "200": {
                            "description": "Service is healthy",
                            "content": { "application/json": { "schema": {
                                "type": "object",
                                "properties": { "message": { "type": "string" } }
                            } } }
                        }
                    }
                }
            },
            "/todos": {
                "get": {
                    "tags": ["todos"],
                    "summary": "List all todos",
                    "operationId": "list_todos",
                    "responses": {
                        "200": {
                            "description": "All todos in ascending id order",
                            "content": { "application/json": { "schema": {
                                "type": "array",
                                "items": todo_ref.clone()
                            } } }
                        }
                    }
                },
                "post": {
                    "tags": ["todos"],
                    "summary": "Create a new todo",
                    "operationId": "create_todo",
                    "requestBody": request("CreateTodo"),
                    "responses": {
                        "201": todo_body("The created todo"),
                        "422": error("Validation failed")
                    }
                }
            },
            "/todos/{id}": {
                "parameters": [id_param.clone()],
                "get": {
                    "tags": ["todos"],
                    "summary": "Get todo by ID",
                    "operationId": "get_todo",
                    "responses": {
                        "200": todo_body("The requested todo"),
                        "404": error("Todo not found")
                    }
                },
                "patch": {
                    "tags": ["todos"],
                    "summary": "Partially update a todo by ID",
                    "operationId": "update_todo",
                    "requestBody": request("UpdateTodo"),
                    "responses": {
                        "200": todo_body("The updated todo"),
                        "404": error("Todo not found"),
                        "422": error("Validation failed")
                    }
                },
                "put": {
                    "tags": ["todos"],
                    "summary": "Replace a todo by ID",
                    "operationId": "replace_todo",
                    "requestBody": request("ReplaceTodo"),
                    "responses": {
                        "200": todo_body("The replaced todo"),
                        "404": error("Todo not found"),
                        "422": error("Validation failed")
                    }
                },
                "delete": {
                    "tags": ["todos"],
                    "summary": "Delete a todo by ID",
                    "operationId": "delete_todo",
                    "responses": {
                        "204": { "description": "Todo deleted" },
                        "404": error("Todo not found")
                    }
                }
            },
            "/todos/{id}/toggle": {
                "parameters": [id_param],
                "patch": {
                    "tags": ["todos"],
                    "summary": "Toggle completion status of a todo",
                    "operationId": "toggle_todo",
                    "responses": {
                        "200": todo_body("The todo with flipped completion"),
                        "404": error("Todo not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Todo": {
                    "type": "object",
                    "required": ["id", "title", "completed", "created_at", "updated_at"],
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "title": { "type": "string" },
                        "description": { "type": "string", "nullable": true },
                        "completed": { "type": "boolean" },
                        "created_at": { "type": "string", "format": "date-time" },
                        "updated_at": { "type": "string", "format": "date-time" }
                    }
                },
                "CreateTodo": {
                    "type": "object",
                    "required": ["title"],
                    "properties": {
                        "title": { "type": "string", "minLength": 1 },
                        "description": { "type": "string", "nullable": true },
                        "completed": { "type": "boolean", "default": false }
                    }
                },
                "UpdateTodo": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "minLength": 1 },
                        "description": { "type": "string", "nullable": true },
                        "completed": { "type": "boolean" }
                    }
                },
                "ReplaceTodo": {
                    "type": "object",
                    "required": ["title", "completed"],
                    "properties": {
                        "title": { "type": "string", "minLength": 1 },
                        "description": { "type": "string", "nullable": true },
                        "completed": { "type": "boolean" }
                    }
                },
                "Error": {
                    "type": "object",
                    "required": ["error"],
                    "properties": { "error": { "type": "string" } }
                }
            }
        }
    })
}

/// Write the document as pretty JSON, creating parent directories.
pub fn write_document(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut json = serde_json::to_string_pretty(&document())?;
    json.push('\n');
    std::fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = document();
        let paths = doc["paths"].as_object().unwrap();
        let mut keys: Vec<_> = paths.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["/", "/todos", "/todos/{id}", "/todos/{id}/toggle"]);

        let item = &doc["paths"]["/todos/{id}"];
        for method in ["get", "patch", "put", "delete"] {
            assert!(item.get(method).is_some(), "missing {method}");
        }
        assert!(doc["paths"]["/todos"]["post"]["responses"].get("201").is_some());
    }

    #[test]
    fn writes_pretty_json_to_nested_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interfaces").join("openapi.json");
        write_document(&path).unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, document());
    }
}
