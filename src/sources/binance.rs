//! Binance spot ticker source.
//!
//! API: `GET /api/v3/ticker/price?symbol=BTCUSDT`
//! Auth: None required.
//! Response: `{"symbol": "BTCUSDT", "price": "22000.01000000"}`
//!
//! Binance quotes BTC against USDT; the estimator treats USDT as USD.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{http_client, trim_base, validate_price, PriceSource};
use crate::config::SourceConfig;

const SOURCE_NAME: &str = "binance";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TickerPrice {
    symbol: String,
    /// Decimal string, not a JSON number.
    price: String,
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

pub struct BinanceSource {
    http: Client,
    url: String,
}

impl BinanceSource {
    pub fn from_config(cfg: &SourceConfig) -> Result<Self> {
        Ok(Self {
            http: http_client(SOURCE_NAME, cfg.timeout_secs)?,
            url: format!("{}/api/v3/ticker/price?symbol={}", trim_base(cfg), cfg.symbol),
        })
    }

    fn parse_ticker(body: &str) -> Result<f64> {
        let ticker: TickerPrice = serde_json::from_str(body)
            .context("Failed to parse Binance ticker response")?;
        let price: f64 = ticker.price.trim().parse()
            .with_context(|| format!("Binance price is not a number: {:?}", ticker.price))?;
        debug!(symbol = %ticker.symbol, price, "Binance ticker parsed");
        validate_price(SOURCE_NAME, price)
    }
}

#[async_trait]
impl PriceSource for BinanceSource {
    async fn fetch_price(&self) -> Result<f64> {
        let resp = self.http.get(&self.url).send().await
            .context("Binance request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("Binance API error: {status}");
        }

        let body = resp.text().await
            .context("Failed to read Binance response body")?;
        Self::parse_ticker(&body)
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
