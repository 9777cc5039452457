use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use todo_server::{Config, TodoStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let store = TodoStore::open(&config.db_path)?;
    if config.seed_samples {
        store.seed_samples()?;
    }

    let app = todo_server::app_with_config(store, &config)?;
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, db = %config.db_path.display(), "todo server listening");

    todo_server::run_until_shutdown(listener, app).await?;
    Ok(())
}
