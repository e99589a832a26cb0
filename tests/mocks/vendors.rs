//! Mock LLM vendors for testing
//!
//! One wiremock server stands in for all six vendors; each vendor lives under
//! its own path prefix, matching `Endpoints::all_at(server.uri())`:
//! - POST /openai/v1/chat/completions
//! - POST /anthropic/v1/messages
//! - POST /perplexity/chat/completions
//! - POST /google/v1beta/models/{model}:streamGenerateContent
//! - POST /openrouter/api/v1/chat/completions
//! - POST /xai/v1/chat/completions
//!
//! # Example
//!
//! ```rust,ignore
//! let vendors = MockVendors::start().await;
//! vendors.mock_stream(ProviderKind::OpenAI, &openai_chunks(&["Hel", "lo"])).await;
//! let endpoints = Endpoints::all_at(&vendors.uri());
//! ```

use prism::transport::Endpoints;
use prism::ProviderKind;
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

/// Mock vendor server wrapper
pub struct MockVendors {
    server: MockServer,
}

/// Path a vendor is served under, as seen by the mock server
pub fn vendor_path(kind: ProviderKind, model: &str) -> String {
    match kind {
        ProviderKind::OpenAI => "/openai/v1/chat/completions".to_string(),
        ProviderKind::Anthropic => "/anthropic/v1/messages".to_string(),
        ProviderKind::Perplexity => "/perplexity/chat/completions".to_string(),
        ProviderKind::Google => format!("/google/v1beta/models/{}:streamGenerateContent", model),
        ProviderKind::OpenRouter => "/openrouter/api/v1/chat/completions".to_string(),
        ProviderKind::XAI => "/xai/v1/chat/completions".to_string(),
    }
}

impl MockVendors {
    /// Start a new mock vendor server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the mock server URI
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Endpoint table pointing every vendor at this server
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::all_at(&self.uri())
    }

    /// Mock a 200 SSE response for `kind` (Google uses `gemini-2.5-flash`)
    pub async fn mock_stream(&self, kind: ProviderKind, body: &str) {
        self.mock_stream_for_model(kind, "gemini-2.5-flash", body).await;
    }

    /// Mock a 200 SSE response for `kind` and a specific model path
    pub async fn mock_stream_for_model(&self, kind: ProviderKind, model: &str, body: &str) {
        Mock::given(method("POST"))
            .and(path(vendor_path(kind, model)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body.to_string())
                    .insert_header("content-type", "text/event-stream")
                    .insert_header("cache-control", "no-cache"),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock a non-2xx response with a raw body
    pub async fn mock_error(&self, kind: ProviderKind, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(vendor_path(kind, "gemini-2.5-flash")))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_string(body.to_string())
                    .insert_header("content-type", "application/json"),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock a 2xx JSON body that is not a stream (inline vendor error)
    pub async fn mock_json(&self, kind: ProviderKind, body: Value) {
        Mock::given(method("POST"))
            .and(path(vendor_path(kind, "gemini-2.5-flash")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// All requests received so far
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// JSON body of the only request received
    pub async fn single_request_body(&self) -> Value {
        let requests = self.requests().await;
        assert_eq!(requests.len(), 1, "expected exactly one upstream request");
        serde_json::from_slice(&requests[0].body).expect("request body is JSON")
    }
}

// =============================================================================
// Stream bodies in each vendor's wire format
// =============================================================================

fn sse(payloads: impl IntoIterator<Item = Value>) -> String {
    payloads
        .into_iter()
        .map(|p| format!("data: {}\n\n", p))
        .collect()
}

/// OpenAI-style chunks ending with `[DONE]`
pub fn openai_chunks(contents: &[&str]) -> String {
    let mut body = sse(std::iter::once(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion.chunk",
        "choices": [{"index": 0, "delta": {"role": "assistant"}, "finish_reason": null}]
    }))
    .chain(contents.iter().map(|c| {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion.chunk",
            "choices": [{"index": 0, "delta": {"content": c}, "finish_reason": null}]
        })
    })));
    body.push_str("data: [DONE]\n\n");
    body
}

/// xAI chunks: reasoning first, then content
pub fn xai_chunks(reasoning: &[&str], contents: &[&str]) -> String {
    let mut body = sse(reasoning
        .iter()
        .map(|r| json!({"choices": [{"index": 0, "delta": {"reasoning_content": r}}]}))
        .chain(
            contents
                .iter()
                .map(|c| json!({"choices": [{"index": 0, "delta": {"content": c}}]})),
        ));
    body.push_str("data: [DONE]\n\n");
    body
}

/// Anthropic event stream with a thinking block and a text block
pub fn anthropic_events(thinking: &[&str], text: &[&str]) -> String {
    let mut body = String::new();
    let mut event = |name: &str, payload: Value| {
        body.push_str(&format!("event: {}\ndata: {}\n\n", name, payload));
    };

    event(
        "message_start",
        json!({"type": "message_start", "message": {"id": "msg_test", "role": "assistant"}}),
    );
    event(
        "content_block_start",
        json!({"type": "content_block_start", "index": 0, "content_block": {"type": "thinking", "thinking": ""}}),
    );
    for t in thinking {
        event(
            "content_block_delta",
            json!({"type": "content_block_delta", "index": 0, "delta": {"type": "thinking_delta", "thinking": t}}),
        );
    }
    event(
        "content_block_delta",
        json!({"type": "content_block_delta", "index": 0, "delta": {"type": "signature_delta", "signature": "sig"}}),
    );
    event("content_block_stop", json!({"type": "content_block_stop", "index": 0}));
    event(
        "content_block_start",
        json!({"type": "content_block_start", "index": 1, "content_block": {"type": "text", "text": ""}}),
    );
    for t in text {
        event(
            "content_block_delta",
            json!({"type": "content_block_delta", "index": 1, "delta": {"type": "text_delta", "text": t}}),
        );
    }
    event("content_block_stop", json!({"type": "content_block_stop", "index": 1}));
    event(
        "message_delta",
        json!({"type": "message_delta", "delta": {"stop_reason": "end_turn"}}),
    );
    event("message_stop", json!({"type": "message_stop"}));
    body
}

/// Gemini chunks; `(text, thought)` pairs, one chunk each, CRLF framed
pub fn gemini_chunks(parts: &[(&str, bool)]) -> String {
    parts
        .iter()
        .map(|(text, thought)| {
            let part = if *thought {
                json!({"text": text, "thought": true})
            } else {
                json!({"text": text})
            };
            format!(
                "data: {}\r\n\r\n",
                json!({"candidates": [{"content": {"parts": [part], "role": "model"}, "index": 0}]})
            )
        })
        .collect()
}
