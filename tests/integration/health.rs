//! Health and metrics endpoint tests

use axum::http::StatusCode;
use serde_json::Value;

use prism::profiles::CredentialSet;

use crate::common::{constants, TestHarness};

#[tokio::test]
async fn test_health_endpoint_healthy() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["checks"]["providers"].as_array().unwrap().len(), 6);
    assert_eq!(body["checks"]["default_profile"], constants::DEFAULT_PROFILE);
    assert_eq!(body["checks"]["default_profile_loaded"], true);
}

#[tokio::test]
async fn test_health_degraded_without_keys() {
    let harness = TestHarness::with_credentials(CredentialSet::new()).await;

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert!(body["checks"]["providers"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_liveness_probe() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/health/live").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_probe() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/health/ready").await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/metrics").await;

    response.assert_status_ok();
}
