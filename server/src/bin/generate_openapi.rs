//! Write the OpenAPI document for the todo API.
//!
//! Usage: `generate-openapi [OUTPUT]` (default `interfaces/openapi.json`).

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use todo_server::openapi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let output = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(openapi::DEFAULT_OUTPUT));

    openapi::write_document(&output)?;
    tracing::info!(path = %output.display(), "wrote OpenAPI document");
    Ok(())
}
