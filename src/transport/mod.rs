//! Upstream transport
//!
//! Opens one streaming POST per session against the routed vendor and hands
//! back the raw body stream. Non-2xx responses and connection failures become
//! `GatewayError::TransportFailure`; every diagnostic string is redacted before
//! it is logged or returned.

pub mod endpoints;
pub mod headers;
pub mod logging;

pub use endpoints::Endpoints;
pub use headers::Attribution;
pub use logging::SessionContext;

use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::gateway::error::GENERIC_TRANSPORT_MESSAGE;
use crate::gateway::GatewayError;
use crate::provider::ProviderKind;
use crate::streaming::truncate_chars;

/// Stream type for response bodies from vendors
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Longest raw error body surfaced to the consumer
const ERROR_BODY_CHARS: usize = 500;

/// Replacement for credential values in diagnostics
pub const REDACTED: &str = "***";

/// Sends translated requests to the vendor endpoints
#[derive(Debug, Clone)]
pub struct TransportDispatcher {
    client: reqwest::Client,
    endpoints: Endpoints,
    attribution: Attribution,
    log_bodies: bool,
}

impl TransportDispatcher {
    pub fn new(client: reqwest::Client, endpoints: Endpoints, attribution: Attribution) -> Self {
        Self {
            client,
            endpoints,
            attribution,
            log_bodies: false,
        }
    }

    /// Log request bodies at debug level
    pub fn with_body_logging(mut self, enabled: bool) -> Self {
        self.log_bodies = enabled;
        self
    }

    /// Send one streaming request and return the body stream on 2xx
    #[instrument(skip_all, fields(trace_id = %ctx.trace_id, provider = %kind))]
    pub async fn open(
        &self,
        ctx: &SessionContext,
        kind: ProviderKind,
        upstream_model: &str,
        api_key: &SecretString,
        body: &serde_json::Value,
    ) -> Result<ByteStream, GatewayError> {
        let url = self.endpoints.url_for(kind, upstream_model);
        let headers = headers::build_headers(kind, api_key, &self.attribution)?;

        ctx.log_upstream_request(&url, body, self.log_bodies);

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let message = redact(
                    &format!("Failed to connect to {}: {}", kind.display_name(), e),
                    api_key,
                );
                ctx.log_connection_error(&message, &url);
                GatewayError::TransportFailure {
                    status: None,
                    message,
                }
            })?;

        let status = response.status();
        ctx.log_upstream_response(status.as_u16());

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = redact(&error_message_from_body(&text), api_key);
            return Err(GatewayError::TransportFailure {
                status: Some(status.as_u16()),
                message,
            });
        }

        Ok(Box::pin(response.bytes_stream()))
    }
}

/// Replace every occurrence of the credential value with `***`
pub fn redact(text: &str, api_key: &SecretString) -> String {
    let key = api_key.expose_secret();
    if key.is_empty() {
        return text.to_string();
    }
    text.replace(key, REDACTED)
}

/// Best human-readable message from a vendor error body
///
/// Tries `error.message`, then `message`, then a string `error`; otherwise the
/// raw text, truncated.
pub fn error_message_from_body(text: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
        let found = value
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .or_else(|| value.get("message").and_then(|v| v.as_str()))
            .or_else(|| value.get("error").and_then(|v| v.as_str()));
        if let Some(message) = found.filter(|m| !m.trim().is_empty()) {
            return message.to_string();
        }
    }

    let raw = text.trim();
    if raw.is_empty() {
        GENERIC_TRANSPORT_MESSAGE.to_string()
    } else {
        truncate_chars(raw, ERROR_BODY_CHARS).to_string()
    }
}
