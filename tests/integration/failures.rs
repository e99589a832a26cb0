//! Failure path tests
//!
//! Every failure must end the session with exactly one `Error` event and no
//! credential text in it.

use pretty_assertions::assert_eq;
use serde_json::json;

use prism::{
    profiles::CredentialSet, ChatMessage, CompletionRequest, NormalizedEvent, ProviderKind,
};

use crate::common::{all_credentials, constants, TestHarness};
use crate::mocks::openai_chunks;

use NormalizedEvent::{Error, MessageDelta};

fn request(model: &str) -> CompletionRequest {
    CompletionRequest::new(vec![ChatMessage::user("Hello?")], "").with_model(model)
}

fn assert_single_terminal(events: &[NormalizedEvent]) {
    let terminals = events.iter().filter(|e| e.is_terminal()).count();
    assert_eq!(terminals, 1, "expected exactly one terminal event: {:?}", events);
    assert!(events.last().is_some_and(NormalizedEvent::is_terminal));
}

#[tokio::test]
async fn test_non_2xx_error_message_is_redacted() {
    let harness = TestHarness::new().await;
    let body = json!({
        "error": {
            "message": format!("Incorrect API key provided: {}", constants::OPENAI_KEY),
            "type": "invalid_request_error"
        }
    });
    harness
        .vendors
        .mock_error(ProviderKind::OpenAI, 401, &body.to_string())
        .await;

    let events = harness.gateway.stream(request("gpt-4o")).collect().await;

    assert_eq!(
        events,
        vec![Error("Incorrect API key provided: ***".into())]
    );
}

#[tokio::test]
async fn test_non_2xx_top_level_message() {
    let harness = TestHarness::new().await;
    harness
        .vendors
        .mock_error(
            ProviderKind::Anthropic,
            529,
            r#"{"type":"error","message":"Overloaded"}"#,
        )
        .await;

    let events = harness
        .gateway
        .stream(request("claude-3-5-haiku-latest"))
        .collect()
        .await;

    assert_eq!(events, vec![Error("Overloaded".into())]);
}

#[tokio::test]
async fn test_non_2xx_plain_text_body() {
    let harness = TestHarness::new().await;
    harness
        .vendors
        .mock_error(ProviderKind::XAI, 502, "upstream unavailable")
        .await;

    let events = harness.gateway.stream(request("grok-3")).collect().await;

    assert_eq!(events, vec![Error("upstream unavailable".into())]);
}

#[tokio::test]
async fn test_non_2xx_empty_body_uses_generic_message() {
    let harness = TestHarness::new().await;
    harness
        .vendors
        .mock_error(ProviderKind::Perplexity, 500, "")
        .await;

    let events = harness.gateway.stream(request("sonar")).collect().await;

    assert_eq!(events, vec![Error("API request failed".into())]);
}

#[tokio::test]
async fn test_inline_error_in_2xx_body() {
    let harness = TestHarness::new().await;
    harness
        .vendors
        .mock_json(
            ProviderKind::OpenAI,
            json!({"error": {"message": "Rate limit exceeded", "code": 429}}),
        )
        .await;

    let events = harness.gateway.stream(request("gpt-4o")).collect().await;

    assert_eq!(events, vec![Error("Rate limit exceeded".into())]);
}

#[tokio::test]
async fn test_inline_error_after_processing_comments() {
    let harness = TestHarness::new().await;
    let body = concat!(
        ": OPENROUTER PROCESSING\n\n",
        ": OPENROUTER PROCESSING\n\n",
        "{\"error\":{\"message\":\"Insufficient credits\",\"code\":402}}",
    );
    harness
        .vendors
        .mock_stream(ProviderKind::OpenRouter, body)
        .await;

    let events = harness
        .gateway
        .stream(request("openrouter/openai/gpt-4o"))
        .collect()
        .await;

    assert_eq!(events, vec![Error("Insufficient credits".into())]);
}

#[tokio::test]
async fn test_inline_error_after_content() {
    let harness = TestHarness::new().await;
    let body = concat!(
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"partial\"}}]}\n\n",
        "data: {\"error\":{\"message\":\"Model overloaded\"}}\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\" ignored\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    harness.vendors.mock_stream(ProviderKind::OpenAI, body).await;

    let events = harness.gateway.stream(request("gpt-4o")).collect().await;

    assert_eq!(
        events,
        vec![
            MessageDelta("partial".into()),
            Error("Model overloaded".into())
        ]
    );
}

#[tokio::test]
async fn test_empty_stream_is_an_error() {
    let harness = TestHarness::new().await;
    harness
        .vendors
        .mock_stream(ProviderKind::OpenAI, &openai_chunks(&[]))
        .await;

    let events = harness.gateway.stream(request("gpt-4o")).collect().await;

    assert_eq!(events, vec![Error("No content received from API".into())]);
}

#[tokio::test]
async fn test_missing_credential_never_reaches_network() {
    let mut credentials = all_credentials();
    credentials.remove(&ProviderKind::Anthropic);
    let harness = TestHarness::with_credentials(credentials).await;

    let events = harness
        .gateway
        .stream(request("claude-3-7-sonnet-latest"))
        .collect()
        .await;

    assert_eq!(
        events,
        vec![Error("Error: Anthropic API key is not set".into())]
    );
    assert!(harness.vendors.requests().await.is_empty());
}

#[tokio::test]
async fn test_missing_credential_names_vendor() {
    let harness = TestHarness::with_credentials(CredentialSet::new()).await;

    let events = harness.gateway.stream(request("grok-3")).collect().await;

    assert_eq!(events, vec![Error("Error: xAI API key is not set".into())]);
}

#[tokio::test]
async fn test_unknown_profile() {
    let harness = TestHarness::new().await;

    let req = CompletionRequest::new(vec![ChatMessage::user("Hi")], "nobody");
    let events = harness.gateway.stream(req).collect().await;

    assert_eq!(events, vec![Error("Profile not found: nobody".into())]);
    assert!(harness.vendors.requests().await.is_empty());
}

#[tokio::test]
async fn test_empty_conversation_rejected() {
    let harness = TestHarness::new().await;

    let req = CompletionRequest::new(Vec::new(), "").with_model("gpt-4o");
    let events = harness.gateway.stream(req).collect().await;

    assert_single_terminal(&events);
    assert!(matches!(&events[0], Error(msg) if msg.starts_with("Invalid request")));
    assert!(harness.vendors.requests().await.is_empty());
}

#[tokio::test]
async fn test_cancelled_session_emits_nothing_after_cancel() {
    let harness = TestHarness::new().await;
    harness
        .vendors
        .mock_stream(ProviderKind::OpenAI, &openai_chunks(&["late"]))
        .await;

    let handle = harness.gateway.stream(request("gpt-4o"));
    let cancel = handle.cancel_handle();
    cancel.cancel();
    assert!(cancel.is_cancelled());
    let events = handle.collect().await;

    assert!(events.iter().all(|e| !e.is_terminal()), "{:?}", events);
}

#[tokio::test]
async fn test_every_failure_has_one_terminal() {
    let harness = TestHarness::new().await;
    harness
        .vendors
        .mock_error(ProviderKind::OpenAI, 503, r#"{"error":"busy"}"#)
        .await;

    let events = harness.gateway.stream(request("gpt-4o")).collect().await;

    assert_single_terminal(&events);
    assert_eq!(events, vec![Error("busy".into())]);
}
