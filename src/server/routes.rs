//! HTTP route handlers.
//!
//! State is shared via `Arc<ServerState>`. Estimation failures map to
//! 500s (the problem is upstream), malformed input to 400s.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::input::{format_usd, parse_price_input, price_difference, PriceInputError};
use crate::engine::BoundedEstimator;
use crate::types::{EstimateError, PriceEstimate};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ServerState {
    pub estimator: BoundedEstimator,
}

impl ServerState {
    pub fn new(estimator: BoundedEstimator) -> Self {
        Self { estimator }
    }
}

pub type AppState = Arc<ServerState>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything a handler can fail with, mapped to a status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No price supplied")]
    MissingPrice,

    #[error("Invalid price input")]
    InvalidPrice(#[source] PriceInputError),

    #[error(transparent)]
    Estimate(#[from] EstimateError),
}

impl From<PriceInputError> for ApiError {
    fn from(err: PriceInputError) -> Self {
        match err {
            PriceInputError::Empty => ApiError::MissingPrice,
            other => ApiError::InvalidPrice(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingPrice | ApiError::InvalidPrice(_) => StatusCode::BAD_REQUEST,
            ApiError::Estimate(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body text shown to the user. Upstream detail stays in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::MissingPrice => "No price supplied",
            ApiError::InvalidPrice(_) => "Invalid price input",
            ApiError::Estimate(EstimateError::AllSourcesFailed { .. }) => {
                "Internal error, try again later"
            }
            ApiError::Estimate(EstimateError::Timeout { .. }) => "Timeout",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub price: Option<String>,
}

/// GET /?price=<amount>
///
/// Returns the absolute difference between the supplied price and the
/// current estimate, formatted as `$<amount>` with two decimals.
pub async fn price_difference_handler(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Result<String, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("price_difference", %request_id);

    async move {
        let raw = query.price.as_deref().unwrap_or_default();
        let user_price = parse_price_input(raw).map_err(|e| {
            warn!(input = raw, error = %e, "Rejected price input");
            ApiError::from(e)
        })?;

        let estimate = state.estimator.estimate().await.map_err(|e| {
            warn!(error = %e, "Estimation unavailable");
            ApiError::from(e)
        })?;

        let difference = price_difference(user_price, estimate.mean);
        info!(
            user_price,
            estimate = estimate.mean,
            difference,
            responded = estimate.sources_responded,
            "Price difference served"
        );
        Ok(format_usd(difference))
    }
    .instrument(span)
    .await
}

/// GET /api/estimate
pub async fn get_estimate(
    State(state): State<AppState>,
) -> Result<Json<PriceEstimate>, (StatusCode, Json<serde_json::Value>)> {
    let request_id = Uuid::new_v4();
    state
        .estimator
        .estimate()
        .instrument(info_span!("estimate", %request_id))
        .await
        .map(Json)
        .map_err(|e| {
            let err = ApiError::from(e);
            (
                err.status(),
                Json(serde_json::json!({ "error": err.public_message() })),
            )
        })
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
