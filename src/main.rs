// src/main.rs

use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use formkit::config::Config;
use formkit::routes;
use formkit::state::AppState;
use formkit::store::{KvStore, MemoryStore, SqliteStore};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "formkit.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let store: Arc<dyn KvStore> = if config.uses_memory_store() {
        tracing::warn!("Using in-memory storage; nothing will survive a restart.");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(open_sqlite(&config.database_url).await?)
    };

    let state = AppState::new(store, config.clone());
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Opens the SQLite store, retrying while the file is locked by another process.
async fn open_sqlite(url: &str) -> Result<SqliteStore, Box<dyn std::error::Error>> {
    let mut retry_count = 0;
    loop {
        match SqliteStore::connect(url).await {
            Ok(store) => {
                tracing::info!("Storage ready at {}", url);
                return Ok(store);
            }
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    tracing::error!("Giving up on storage after 5 retries: {}", e);
                    return Err(e.into());
                }
                tracing::warn!("Storage not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}
