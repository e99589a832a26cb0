//! HTTP routes for Prism
//!
//! This module defines all HTTP endpoints exposed by the gateway.

pub mod completions;
pub mod features;
pub mod health;
pub mod metrics;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::{AppError, AppResult},
    profiles::Profile,
    AppState,
};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let streaming_routes = Router::new()
        .route("/v1/completions/stream", post(completions::stream_completion))
        .route("/v1/summarize", post(features::summarize))
        .route("/v1/fill-form", post(features::fill_form));

    // Public routes (health checks, metrics)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::prometheus_metrics));

    Router::new()
        .merge(public_routes)
        .merge(streaming_routes)
        // Global middleware (applied to all routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Look up the requested profile, or the default one when none is named
pub(crate) async fn resolve_profile(
    state: &AppState,
    requested: Option<&str>,
) -> AppResult<Profile> {
    let store = state.gateway.profiles();
    let name = requested
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| store.default_profile());

    store
        .get(name)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Profile not found: {}", name)))
}
