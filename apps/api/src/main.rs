//! # Mercado API
//!
//! HTTP server for the store inventory and sales backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        API Server                               │
//! │                                                                 │
//! │  Front-end ───► HTTP (3001) ───► Handlers ───► Store            │
//! │                                                  │              │
//! │                                     ┌────────────┴───────────┐  │
//! │                                     ▼                        ▼  │
//! │                                  SQLite               in-memory │
//! │                            (DATABASE_PATH set)       (fallback) │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With `DATABASE_PATH` set the server uses SQLite; a connection
//! failure falls back to the in-memory store so the front-end keeps
//! working while the database problem is fixed.

mod config;
mod error;
mod handlers;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mercado_db::{Database, DbConfig, Store};

use crate::config::ApiConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Mercado API server...");

    let config = ApiConfig::load()?;
    info!(
        port = config.port,
        database_path = config.database_path.as_deref().unwrap_or("<memory>"),
        "Configuration loaded"
    );

    let store = select_store(&config).await;
    info!(
        backend = store.backend_name(),
        persistent = store.is_persistent(),
        "Storage ready"
    );

    let app = handlers::router(store);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Picks the storage backend: SQLite when a database path is
/// configured, in-memory otherwise or when the connection fails.
async fn select_store(config: &ApiConfig) -> Store {
    let Some(path) = &config.database_path else {
        info!("No DATABASE_PATH configured, using in-memory store");
        return Store::in_memory();
    };

    match Database::new(DbConfig::new(path)).await {
        Ok(db) => Store::Sqlite(db),
        Err(e) => {
            warn!(error = %e, path = %path, "Database unavailable, falling back to in-memory store");
            Store::in_memory()
        }
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
