//! Price sources.
//!
//! Defines the `PriceSource` trait and provides exchange-specific
//! implementations that fetch a spot price over HTTP.

pub mod binance;
pub mod bitfinex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::{SourceConfig, SourcesConfig};
use binance::BinanceSource;
use bitfinex::BitfinexSource;

/// User agent sent by every HTTP-backed source.
pub const USER_AGENT: &str = "price-estimator/0.1.0";

/// Abstraction over external price providers.
///
/// Each implementation is fixed to one trading pair at construction.
/// A failed fetch must surface as an error, never as a partial or
/// fabricated price.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the current price. Always finite and non-negative on success.
    async fn fetch_price(&self) -> Result<f64>;

    /// Source name for logging.
    fn name(&self) -> &'static str;
}

/// Reject values no exchange should report as a price.
pub fn validate_price(source: &str, price: f64) -> Result<f64> {
    if !price.is_finite() {
        anyhow::bail!("{source} returned a non-finite price: {price}");
    }
    if price < 0.0 {
        anyhow::bail!("{source} returned a negative price: {price}");
    }
    Ok(price)
}

/// Build an HTTP client with a per-source request timeout.
pub(crate) fn http_client(source: &str, timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .with_context(|| format!("Failed to build {source} HTTP client"))
}

/// Construct every enabled source, in a fixed order.
pub fn build_sources(cfg: &SourcesConfig) -> Result<Vec<Arc<dyn PriceSource>>> {
    let mut sources: Vec<Arc<dyn PriceSource>> = Vec::new();

    if cfg.binance.enabled {
        sources.push(Arc::new(BinanceSource::from_config(&cfg.binance)?));
    }
    if cfg.bitfinex.enabled {
        sources.push(Arc::new(BitfinexSource::from_config(&cfg.bitfinex)?));
    }

    info!(
        count = sources.len(),
        names = ?sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
        "Price sources configured"
    );

    Ok(sources)
}

fn trim_base(cfg: &SourceConfig) -> &str {
    cfg.base_url.trim_end_matches('/')
}
