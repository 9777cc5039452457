//! Error types for the todo store and their HTTP mapping.
//!
//! `Validation` and `NotFound` are the two caller-visible failures. Anything
//! coming out of SQLite is reported to the client as a generic 500 and only
//! logged in detail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Input failed a field constraint (e.g. an empty title).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("todo {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored timestamp could not be parsed back into a `DateTime`.
    #[error("corrupt timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("failed to prepare store directory: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Database(_) | StoreError::Timestamp { .. } | StoreError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "store operation failed");
            "internal server error".to_string()
        } else {
            tracing::debug!(error = %self, "request rejected");
            self.to_string()
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
