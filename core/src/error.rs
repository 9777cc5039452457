//! Error types for the todo API client.
//!
//! `NotFound` and `Validation` get dedicated variants because callers act on
//! them (missing id, bad input). Any other non-2xx response lands in
//! `HttpError` with the raw status code and body.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned 422: the payload failed validation.
    #[error("validation failed: {body}")]
    Validation { body: String },

    /// The server returned a non-2xx status other than 404 or 422.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}
