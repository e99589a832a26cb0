//! Session logging utilities
//!
//! Provides structured logging with a short correlation id so every line a
//! session produces can be grepped together.

use std::time::Instant;
use tracing::{debug, error, info, warn, Span};
use uuid::Uuid;

use crate::provider::ProviderKind;

/// Context for tracking one streaming session
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Unique identifier for this session (for log correlation)
    pub trace_id: String,
    /// When the session started
    pub start_time: Instant,
    /// Vendor handling this session
    pub provider: ProviderKind,
    /// Model as requested (before vendor rewriting)
    pub model: String,
    /// Profile the session was resolved against
    pub profile: String,
}

impl SessionContext {
    pub fn new(provider: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(),
            start_time: Instant::now(),
            provider,
            model: model.into(),
            profile: String::new(),
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    pub fn log_session_start(&self) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            model = %self.model,
            profile = %self.profile,
            "Session started"
        );
    }

    /// Log the outgoing request; the body only when debug bodies are enabled
    pub fn log_upstream_request(&self, url: &str, body: &serde_json::Value, log_body: bool) {
        if log_body {
            debug!(
                trace_id = %self.trace_id,
                provider = %self.provider,
                url = %url,
                body = %body,
                "Sending request to upstream"
            );
        } else {
            debug!(
                trace_id = %self.trace_id,
                provider = %self.provider,
                url = %url,
                "Sending request to upstream"
            );
        }
    }

    pub fn log_upstream_response(&self, status: u16) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            status = %status,
            elapsed_ms = %self.elapsed_ms(),
            "Response received from upstream"
        );
    }

    pub fn log_stream_ended(&self, outcome: &str, chunks: usize) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            outcome = %outcome,
            chunks = %chunks,
            elapsed_ms = %self.elapsed_ms(),
            "Stream ended"
        );
    }

    pub fn log_cancelled(&self) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            elapsed_ms = %self.elapsed_ms(),
            "Session cancelled by consumer"
        );
    }

    /// Log a dropped stream line
    pub fn log_decode_fault(&self, line: &str, reason: &str) {
        warn!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            sse_line = %line,
            error = %reason,
            "Failed to decode stream line"
        );
    }

    /// Log session failure; `message` must already be redacted
    pub fn log_error(&self, kind: &str, message: &str) {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            model = %self.model,
            kind = %kind,
            elapsed_ms = %self.elapsed_ms(),
            error = %message,
            "Session failed"
        );
    }

    /// Log connection error; `message` must already be redacted
    pub fn log_connection_error(&self, message: &str, url: &str) {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            url = %url,
            elapsed_ms = %self.elapsed_ms(),
            error = %message,
            "Connection to upstream failed"
        );
    }

    /// Create a tracing span for this session
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "session",
            trace_id = %self.trace_id,
            provider = %self.provider,
            model = %self.model,
        )
    }
}
