//! Kiroween Server: application entry point.

use anyhow::Context;
use kiroween_db::{DbManager, run_migrations};
use kiroween_server::{ServerConfig, build_router};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "kiroween_server=info,kiroween_service=info,kiroween_db=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .json()
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    tracing::info!(profile = ?config.profile, "Starting Kiroween server...");

    let db = DbManager::connect(&config.database)
        .await
        .context("failed to connect to SurrealDB")?;
    run_migrations(db.client())
        .await
        .context("failed to apply migrations")?;

    let app = build_router(db.client().clone(), &config);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Kiroween server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
