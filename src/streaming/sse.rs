//! Outgoing SSE encoding of normalized events
//!
//! Each event becomes one named SSE frame:
//! - `ThinkingDelta` -> `event: thinking` / `data: {"text": ...}`
//! - `MessageDelta` -> `event: message` / `data: {"text": ...}`
//! - `Done` -> `event: done` / `data: {"text": ...}`
//! - `Error` -> `event: error` / `data: {"message": ...}`

use axum::response::Response;
use axum::{body::Body, http::header, http::StatusCode};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::json;

use crate::error::AppError;
use crate::types::NormalizedEvent;

/// Format a normalized event as SSE bytes.
pub fn format_event(event: &NormalizedEvent) -> Bytes {
    let data = match event {
        NormalizedEvent::ThinkingDelta(text)
        | NormalizedEvent::MessageDelta(text)
        | NormalizedEvent::Done(text) => json!({ "text": text }),
        NormalizedEvent::Error(message) => json!({ "message": message }),
    };
    Bytes::from(format!("event: {}\ndata: {}\n\n", event.name(), data))
}

/// Wrap an event stream into a `text/event-stream` response.
pub fn sse_response<S>(events: S) -> Result<Response, AppError>
where
    S: Stream<Item = NormalizedEvent> + Send + 'static,
{
    let body = Body::from_stream(
        events.map(|event| Ok::<_, std::convert::Infallible>(format_event(&event))),
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .header("X-Accel-Buffering", "no")
        .body(body)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {}", e)))
}
