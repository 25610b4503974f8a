//! # Parky Server
//!
//! Opens the ticket store, serves the HTTP API, and shuts down cleanly on
//! Ctrl+C or SIGTERM.

use anyhow::Context;
use parky_db::TicketStore;
use parky_server::{router, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = ServerConfig::load()?;
    info!(
        address = %config.listen_address(),
        database = %config.database_path.display(),
        backdate_minutes = config.backdate_minutes,
        "Configuration loaded"
    );

    // Without a store there is nothing to serve
    let store = TicketStore::open(config.store_config())
        .await
        .context("failed to open ticket store")?;

    let app = router(AppState::new(store.clone()));

    let listener = TcpListener::bind(config.listen_address())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_address()))?;
    info!(address = %config.listen_address(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Server shutdown complete");
    Ok(())
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

    info!("Shutting down...");
}
