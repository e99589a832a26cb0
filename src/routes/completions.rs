//! Streaming completions endpoint
//!
//! Accepts a normalized conversation and streams the session's events back
//! as named SSE events.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    routes::resolve_profile,
    streaming::sse::sse_response,
    types::{ChatMessage, CompletionRequest},
    AppState,
};

/// Body of `POST /v1/completions/stream`
#[derive(Debug, Clone, Deserialize)]
pub struct StreamCompletionBody {
    pub messages: Vec<ChatMessage>,
    /// Overrides the profile's model
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
}

/// Stream a completion for an arbitrary conversation
pub async fn stream_completion(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StreamCompletionBody>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;

    if body.messages.is_empty() {
        return Err(AppError::BadRequest(
            "messages must contain at least one message".to_string(),
        ));
    }

    let profile = resolve_profile(&state, body.profile.as_deref()).await?;

    let mut request = CompletionRequest::new(body.messages, profile.name.as_str());
    if let Some(model) = body.model.filter(|m| !m.trim().is_empty()) {
        request = request.with_model(model);
    }

    let model = if request.model_id.is_empty() {
        &profile.model_id
    } else {
        &request.model_id
    };
    info!(
        profile = %profile.name,
        model = %model,
        messages = request.messages.len(),
        "Streaming completion requested"
    );

    let events = state.gateway.stream(request).into_stream();
    sse_response(events)
}
