//! Core types shared across the estimator.
//!
//! Defines the aggregate estimate produced by the engine and the
//! domain error taxonomy surfaced to callers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Estimate
// ---------------------------------------------------------------------------

/// Result of one successful fan-out/fan-in over all configured sources.
#[derive(Debug, Clone, Serialize)]
pub struct PriceEstimate {
    /// Arithmetic mean over the sources that responded.
    pub mean: f64,
    /// Number of sources queried.
    pub sources_queried: usize,
    /// Number of sources that produced a price.
    pub sources_responded: usize,
    pub computed_at: DateTime<Utc>,
}

impl PriceEstimate {
    /// Number of sources whose failure was absorbed into the estimate.
    pub fn sources_failed(&self) -> usize {
        self.sources_queried - self.sources_responded
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Terminal outcomes of an estimation other than success.
///
/// Individual source failures never appear here; they are absorbed at
/// fan-in. Callers must be able to tell "ran out of sources" apart from
/// "ran out of time", hence two distinct variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EstimateError {
    /// Every configured source failed. Also returned when no sources are
    /// configured at all.
    #[error("All {queried} price sources failed")]
    AllSourcesFailed { queried: usize },

    /// The caller's deadline elapsed before the estimation finished.
    #[error("Estimation timed out after {}ms", .deadline.as_millis())]
    Timeout { deadline: Duration },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
