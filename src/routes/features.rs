//! Feature endpoints: page summarization and form filling
//!
//! Both assemble their messages server-side and stream like
//! `/v1/completions/stream`, using the selected profile's model.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::AppResult,
    features::{fill_form_messages, summarize_messages},
    routes::resolve_profile,
    streaming::sse::sse_response,
    types::CompletionRequest,
    AppState,
};

/// Body of `POST /v1/summarize`
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeBody {
    /// Page text to summarize
    pub content: String,
    #[serde(default)]
    pub profile: Option<String>,
}

/// Body of `POST /v1/fill-form`
#[derive(Debug, Clone, Deserialize)]
pub struct FillFormBody {
    /// What to write into the field
    pub prompt: String,
    /// Page text given as context
    #[serde(default)]
    pub extra: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
}

pub async fn summarize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SummarizeBody>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    let profile = resolve_profile(&state, body.profile.as_deref()).await?;

    info!(
        profile = %profile.name,
        content_len = body.content.len(),
        "Summary requested"
    );

    let messages = summarize_messages(&profile, &body.content);
    let request = CompletionRequest::new(messages, profile.name.as_str());
    sse_response(state.gateway.stream(request).into_stream())
}

pub async fn fill_form(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FillFormBody>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    let profile = resolve_profile(&state, body.profile.as_deref()).await?;

    info!(
        profile = %profile.name,
        has_context = body.extra.as_deref().is_some_and(|e| !e.is_empty()),
        "Form fill requested"
    );

    let messages = fill_form_messages(&body.prompt, body.extra.as_deref());
    let request = CompletionRequest::new(messages, profile.name.as_str());
    sse_response(state.gateway.stream(request).into_stream())
}
