//! Deadline-bounded estimation for synchronous callers.
//!
//! The estimator itself waits on every source with no timeout. This
//! wrapper runs it as a detached task and races it against a timer.
//! The losing estimation is abandoned, not aborted: it keeps running
//! until its sources resolve, and its result is dropped.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, error, warn};

use super::estimator::PriceEstimator;
use crate::types::{EstimateError, PriceEstimate};

/// Run `estimator` against `deadline`, delivering exactly one outcome.
///
/// Returns the estimate, `AllSourcesFailed`, or `Timeout`.
pub async fn estimate_within(
    estimator: Arc<PriceEstimator>,
    deadline: Duration,
) -> Result<PriceEstimate, EstimateError> {
    let queried = estimator.len();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let outcome = estimator.estimate().await;
        // `send` consumes the sender, so at most one outcome can ever be sent.
        if tx.send(outcome).is_err() {
            debug!("Estimation finished after its caller gave up; result discarded");
        }
    });

    tokio::select! {
        biased;

        received = rx => match received {
            Ok(outcome) => outcome,
            Err(_) => {
                error!(queried, "Estimation task ended without reporting");
                Err(EstimateError::AllSourcesFailed { queried })
            }
        },
        _ = tokio::time::sleep(deadline) => {
            warn!(deadline_ms = deadline.as_millis() as u64, "Estimation deadline elapsed");
            Err(EstimateError::Timeout { deadline })
        }
    }
}

/// A shared estimator paired with the deadline every call runs under.
#[derive(Clone)]
pub struct BoundedEstimator {
    estimator: Arc<PriceEstimator>,
    deadline: Duration,
}

impl BoundedEstimator {
    pub fn new(estimator: Arc<PriceEstimator>, deadline: Duration) -> Self {
        Self { estimator, deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn estimator(&self) -> &Arc<PriceEstimator> {
        &self.estimator
    }

    pub async fn estimate(&self) -> Result<PriceEstimate, EstimateError> {
        estimate_within(Arc::clone(&self.estimator), self.deadline).await
    }

    pub async fn estimate_mean(&self) -> Result<f64, EstimateError> {
        self.estimate().await.map(|est| est.mean)
    }
}
