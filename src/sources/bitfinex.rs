//! Bitfinex public ticker source.
//!
//! API: `GET /v2/ticker/tBTCUSD`
//! Auth: None required.
//! Response: flat JSON array
//! `[BID, BID_SIZE, ASK, ASK_SIZE, DAILY_CHANGE, DAILY_CHANGE_RELATIVE,
//!   LAST_PRICE, VOLUME, HIGH, LOW]`

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{http_client, trim_base, validate_price, PriceSource};
use crate::config::SourceConfig;

const SOURCE_NAME: &str = "bitfinex";

/// Position of `LAST_PRICE` in the ticker array.
const LAST_PRICE_INDEX: usize = 6;

pub struct BitfinexSource {
    http: Client,
    url: String,
}

impl BitfinexSource {
    pub fn from_config(cfg: &SourceConfig) -> Result<Self> {
        Ok(Self {
            http: http_client(SOURCE_NAME, cfg.timeout_secs)?,
            url: format!("{}/v2/ticker/{}", trim_base(cfg), cfg.symbol),
        })
    }

    fn parse_ticker(body: &str) -> Result<f64> {
        let fields: Vec<f64> = serde_json::from_str(body)
            .context("Failed to parse Bitfinex ticker response")?;
        let price = fields.get(LAST_PRICE_INDEX).copied().with_context(|| {
            format!("Bitfinex ticker has {} fields, expected at least {}", fields.len(), LAST_PRICE_INDEX + 1)
        })?;
        debug!(price, "Bitfinex ticker parsed");
        validate_price(SOURCE_NAME, price)
    }
}

#[async_trait]
impl PriceSource for BitfinexSource {
    async fn fetch_price(&self) -> Result<f64> {
        let resp = self.http.get(&self.url).send().await
            .context("Bitfinex request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("Bitfinex API error: {status}");
        }

        let body = resp.text().await
            .context("Failed to read Bitfinex response body")?;
        Self::parse_ticker(&body)
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }
}
