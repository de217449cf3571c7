//! Fan-out/fan-in price estimation.
//!
//! Queries every configured source on its own tokio task, waits for all
//! of them, and averages whatever came back. Individual source failures
//! are logged and dropped here; only total failure reaches the caller.

use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::sources::{validate_price, PriceSource};
use crate::types::{EstimateError, PriceEstimate};

/// Mean-price estimator over a fixed, ordered set of sources.
///
/// Holds no mutable state, so one instance can serve any number of
/// concurrent callers behind an `Arc`.
pub struct PriceEstimator {
    sources: Vec<Arc<dyn PriceSource>>,
}

impl PriceEstimator {
    pub fn new(sources: Vec<Arc<dyn PriceSource>>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[Arc<dyn PriceSource>] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Query all sources concurrently and return the mean of the successes.
    ///
    /// Waits for every source to resolve; there is no internal timeout.
    /// With zero sources configured this returns `AllSourcesFailed`.
    pub async fn estimate(&self) -> Result<PriceEstimate, EstimateError> {
        let queried = self.sources.len();

        let handles: Vec<_> = self
            .sources
            .iter()
            .enumerate()
            .map(|(index, source)| tokio::spawn(query_source(index, Arc::clone(source))))
            .collect();

        // One slot per source, all written before any is read.
        let slots = join_all(handles).await;

        let prices: Vec<f64> = slots
            .into_iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Ok(price) => price,
                Err(e) => {
                    warn!(index, error = %e, "Price source task aborted");
                    None
                }
            })
            .collect();

        let Some(average) = mean(&prices) else {
            warn!(queried, "All price sources failed");
            return Err(EstimateError::AllSourcesFailed { queried });
        };

        info!(
            mean = average,
            queried,
            responded = prices.len(),
            "Price estimate computed"
        );

        Ok(PriceEstimate {
            mean: average,
            sources_queried: queried,
            sources_responded: prices.len(),
            computed_at: Utc::now(),
        })
    }

    /// Mean price across all sources that responded.
    ///
    /// As long as one source works this succeeds; if every source fails
    /// the error must be checked before trusting anything.
    pub async fn estimate_mean(&self) -> Result<f64, EstimateError> {
        self.estimate().await.map(|est| est.mean)
    }
}

/// Run one source to completion, folding its failure into `None`.
async fn query_source(index: usize, source: Arc<dyn PriceSource>) -> Option<f64> {
    let name = source.name();
    match source.fetch_price().await.and_then(|p| validate_price(name, p)) {
        Ok(price) => {
            debug!(index, source = name, price, "Price fetched");
            Some(price)
        }
        Err(e) => {
            warn!(index, source = name, error = %e, "Price source failed");
            None
        }
    }
}

/// Arithmetic mean, `None` for an empty slice.
fn mean(prices: &[f64]) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }
    Some(prices.iter().sum::<f64>() / prices.len() as f64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
