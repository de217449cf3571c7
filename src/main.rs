//! Price estimator service.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the configured price sources and serves the HTTP API until
//! Ctrl+C.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use price_estimator::config::AppConfig;
use price_estimator::engine::{BoundedEstimator, PriceEstimator};
use price_estimator::server::{self, routes::ServerState};
use price_estimator::sources;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path = AppConfig::resolve_path();
    let cfg = AppConfig::load_or_default(&config_path)?;

    init_logging();

    info!(
        config = %config_path,
        port = cfg.server.port,
        request_timeout_ms = cfg.server.request_timeout_ms,
        "Price estimator starting up"
    );

    let sources = sources::build_sources(&cfg.sources)?;
    if sources.is_empty() {
        warn!("No price sources enabled; every estimate will fail");
    }

    let estimator = BoundedEstimator::new(
        Arc::new(PriceEstimator::new(sources)),
        cfg.server.request_timeout(),
    );
    let state = Arc::new(ServerState::new(estimator));

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", cfg.server.host, cfg.server.port))?;

    server::serve(state, addr, shutdown_signal()).await?;

    info!("Price estimator shut down cleanly.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("price_estimator=info,tower_http=info"));

    let json_logging = std::env::var("PRICE_ESTIMATOR_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
