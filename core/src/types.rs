//! Wire DTOs for the todo API.
//!
//! Defined independently from the server crate; the end-to-end test catches
//! schema drift between the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /todos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Payload for `PATCH /todos/{id}`. Only the fields present in the JSON are
/// applied; omitted fields remain unchanged on the server. A `description`
/// of `Some(None)` is sent as `null` and clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Payload for `PUT /todos/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceTodo {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}
