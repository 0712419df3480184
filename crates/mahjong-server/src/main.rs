//! Entry point for the mahjong ledger server.
//!
//! Loads layered configuration, initializes logging, opens (and if needed
//! creates, migrates and seeds) the ledger database, then serves the JSON
//! API until `Ctrl-C` or `SIGTERM`.

use std::sync::Arc;

use anyhow::Context;
use mahjong_db::DbPool;
use mahjong_server::config::LoggingConfig;
use mahjong_server::{AppConfig, AppState, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the database cannot be
/// opened, or the listener cannot bind.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;

    init_tracing(&config.logging);

    info!(
        host = %config.server.host,
        port = config.server.port,
        database = %config.database.url,
        cors_any_origin = config.cors.allow_any_origin,
        "mahjong-server starting"
    );

    let db = DbPool::open(&config.database.to_db_config())
        .await
        .context("opening ledger database")?;

    let state = Arc::new(
        AppState::new(db.clone()).with_cors_any_origin(config.cors.allow_any_origin),
    );

    let served = start_server(&config.server, state).await;

    db.close().await;
    info!("Database pool closed");

    served.context("running HTTP server")?;
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
