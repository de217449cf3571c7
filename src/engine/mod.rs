//! Estimation engine.
//!
//! Concurrent fan-out over price sources and the deadline race that
//! wraps it for request handlers.

pub mod deadline;
pub mod estimator;

pub use deadline::{estimate_within, BoundedEstimator};
pub use estimator::PriceEstimator;
