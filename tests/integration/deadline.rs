//! Deadline race around the estimator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use price_estimator::engine::{estimate_within, BoundedEstimator};
use price_estimator::types::EstimateError;

use crate::mock_source::{almost_equal, estimator_of, sources_for, MockSource};

#[tokio::test]
async fn test_fast_estimate_wins() {
    let est = Arc::new(estimator_of(&sources_for(&[Some(22000.0), Some(22500.0)])));
    let report = estimate_within(est, Duration::from_secs(5)).await.unwrap();
    assert!(almost_equal(report.mean, 22250.0));
}

#[tokio::test]
async fn test_total_failure_is_not_reported_as_timeout() {
    let est = Arc::new(estimator_of(&sources_for(&[None, None])));
    let err = estimate_within(est, Duration::from_secs(5)).await.unwrap_err();
    assert_eq!(err, EstimateError::AllSourcesFailed { queried: 2 });
}

#[tokio::test]
async fn test_slow_estimate_times_out() {
    let slow = MockSource::delayed(Some(22500.0), Duration::from_millis(600));
    let est = Arc::new(estimator_of(&[Arc::clone(&slow), MockSource::ok(22000.0)]));
    let deadline = Duration::from_millis(100);

    let started = Instant::now();
    let outcome = estimate_within(est, deadline).await;
    let elapsed = started.elapsed();

    assert_eq!(outcome.unwrap_err(), EstimateError::Timeout { deadline });
    assert!(elapsed >= deadline);
    assert!(elapsed < Duration::from_millis(500), "waited for the estimator: {elapsed:?}");

    // Abandoned, not cancelled: the slow source still finishes.
    assert_eq!(slow.calls(), 1);
    assert!(!slow.completed());
    tokio::time::sleep(Duration::from_millis(800)).await;
    assert!(slow.completed());
}

#[tokio::test]
async fn test_abandoned_estimate_does_not_affect_next_call() {
    let slow = MockSource::delayed(Some(300.0), Duration::from_millis(300));
    let est = Arc::new(estimator_of(&[slow, MockSource::ok(100.0)]));

    let timed_out = estimate_within(Arc::clone(&est), Duration::from_millis(30)).await;
    assert!(matches!(timed_out, Err(EstimateError::Timeout { .. })));

    let report = estimate_within(est, Duration::from_secs(5)).await.unwrap();
    assert!(almost_equal(report.mean, 200.0));
    assert_eq!(report.sources_responded, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_exactly_one_outcome_near_the_deadline() {
    // Estimation and deadline finish at roughly the same instant; each
    // call must still resolve to a single, well-formed outcome.
    let bounded = BoundedEstimator::new(
        Arc::new(estimator_of(&[MockSource::delayed(Some(50.0), Duration::from_millis(20))])),
        Duration::from_millis(20),
    );

    let calls = (0..64).map(|_| {
        let bounded = bounded.clone();
        tokio::spawn(async move { bounded.estimate_mean().await })
    });

    for joined in futures::future::join_all(calls).await {
        match joined.unwrap() {
            Ok(mean) => assert!(almost_equal(mean, 50.0)),
            Err(EstimateError::Timeout { deadline }) => {
                assert_eq!(deadline, Duration::from_millis(20))
            }
            Err(other) => panic!("unexpected outcome: {other}"),
        }
    }
}
