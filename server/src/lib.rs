//! HTTP todo service backed by a single SQLite file.
//!
//! `app` builds the router around a `TodoStore`; `run` serves it on an
//! already-bound listener so tests can pick a random port.

pub mod config;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod store;
pub mod types;

use axum::{
    http::{header::InvalidHeaderValue, HeaderValue},
    routing::{get, patch},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::TraceLayer,
};

pub use config::{Config, ConfigError};
pub use error::StoreError;
pub use store::TodoStore;
pub use types::{CreateTodo, ReplaceTodo, Todo, UpdateTodo};

/// Router with the default CORS origin (`http://localhost:3000`).
pub fn app(store: TodoStore) -> Router {
    router(store).layer(cors_layer(HeaderValue::from_static(config::DEFAULT_CORS_ORIGIN)))
}

/// Router restricted to the configured CORS origin.
pub fn app_with_config(store: TodoStore, config: &Config) -> Result<Router, InvalidHeaderValue> {
    let origin = HeaderValue::from_str(&config.cors_origin)?;
    Ok(router(store).layer(cors_layer(origin)))
}

fn router(store: TodoStore) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/openapi.json", get(handlers::openapi))
        .route("/todos", get(handlers::list_todos).post(handlers::create_todo))
        .route(
            "/todos/{id}",
            get(handlers::get_todo)
                .patch(handlers::update_todo)
                .put(handlers::replace_todo)
                .delete(handlers::delete_todo),
        )
        .route("/todos/{id}/toggle", patch(handlers::toggle_todo))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

// Credentials rule out wildcard methods/headers, so mirror the preflight.
fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

/// Serve until Ctrl-C, then drain in-flight requests.
pub async fn run_until_shutdown(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::warn!(error = %e, "cannot listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
