//! Prometheus metrics endpoint
//!
//! Exposes session metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    // Fails only if another recorder is already installed
    if metrics::set_global_recorder(recorder).is_err() {
        tracing::warn!("Metrics recorder already installed");
    }
    handle
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

/// Register all custom metrics
fn register_metrics() {
    metrics::describe_counter!(
        "prism_sessions_total",
        "Total number of streaming sessions by provider and outcome"
    );
    metrics::describe_histogram!(
        "prism_session_duration_seconds",
        "Session duration in seconds"
    );
    metrics::describe_counter!(
        "prism_decode_faults_total",
        "Stream lines dropped because they could not be decoded"
    );
    metrics::describe_gauge!(
        "prism_active_sessions",
        "Number of sessions currently streaming"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns metrics in Prometheus text format for scraping.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a finished session
pub fn record_session(provider: &str, outcome: &str, duration_secs: f64) {
    metrics::counter!(
        "prism_sessions_total",
        "provider" => provider.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!("prism_session_duration_seconds", "provider" => provider.to_string())
        .record(duration_secs);
}

/// Record a dropped stream line
pub fn record_decode_fault(provider: &str) {
    metrics::counter!("prism_decode_faults_total", "provider" => provider.to_string()).increment(1);
}

pub fn session_started() {
    metrics::gauge!("prism_active_sessions").increment(1.0);
}

pub fn session_finished() {
    metrics::gauge!("prism_active_sessions").decrement(1.0);
}
