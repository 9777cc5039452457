//! Wire and domain types for the todo service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A persisted todo item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /todos`.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl CreateTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: false,
        }
    }
}

/// Body of `PATCH /todos/{id}`. Absent fields are left untouched; an
/// explicit `null` is `Some(None)`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

/// Only called for keys present in the JSON, so `null` becomes `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of `PUT /todos/{id}`: every field is overwritten.
#[derive(Clone, Debug, Deserialize)]
pub struct ReplaceTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
}
