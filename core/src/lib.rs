//! Synchronous API client core for the todo service.
//!
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network. The caller executes the HTTP round-trip, so the
//! core stays deterministic and testable.
//!
//! - `TodoClient` is stateless and holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response).

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{CreateTodo, ReplaceTodo, Todo, UpdateTodo};
