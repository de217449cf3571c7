//! HTTP surface: status mapping and response bodies.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use price_estimator::engine::BoundedEstimator;
use price_estimator::server::build_router;
use price_estimator::server::routes::ServerState;

use crate::mock_source::{estimator_of, MockSource};

fn app(sources: &[Arc<MockSource>], deadline: Duration) -> Router {
    let bounded = BoundedEstimator::new(Arc::new(estimator_of(sources)), deadline);
    build_router(Arc::new(ServerState::new(bounded)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_difference_formatted_as_currency() {
    let app = app(
        &[MockSource::ok(22000.0), MockSource::ok(22500.0)],
        Duration::from_secs(5),
    );
    let (status, body) = get(app, "/?price=$21,000.25").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "$1249.75");
}

#[tokio::test]
async fn test_timeout_is_server_error() {
    let app = app(
        &[MockSource::delayed(Some(22000.0), Duration::from_millis(500))],
        Duration::from_millis(50),
    );
    let (status, body) = get(app, "/?price=22000").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Timeout");
}

#[tokio::test]
async fn test_timeout_on_json_endpoint() {
    let app = app(
        &[MockSource::delayed(Some(22000.0), Duration::from_millis(500))],
        Duration::from_millis(50),
    );
    let (status, body) = get(app, "/api/estimate").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "Timeout");
}

#[tokio::test]
async fn test_all_sources_failed_is_server_error() {
    let app = app(
        &[MockSource::failing(), MockSource::failing()],
        Duration::from_secs(5),
    );
    let (status, body) = get(app, "/?price=22000").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal error, try again later");
}

#[tokio::test]
async fn test_bad_input_is_client_error_without_querying_sources() {
    let source = MockSource::ok(22000.0);
    let app = app(&[Arc::clone(&source)], Duration::from_secs(5));

    let (status, body) = get(app.clone(), "/?price=twenty").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid price input");

    let (status, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "No price supplied");

    assert_eq!(source.calls(), 0);
}
