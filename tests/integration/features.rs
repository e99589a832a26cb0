//! Summarize and fill-form endpoint tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use prism::{features::FORM_FILLER_SYSTEM_PROMPT, ProviderKind};

use crate::common::{parse_sse, TestHarness};
use crate::mocks::{anthropic_events, openai_chunks};

#[tokio::test]
async fn test_summarize_uses_profile_template() {
    let harness = TestHarness::new().await;
    harness
        .vendors
        .mock_stream(ProviderKind::OpenAI, &openai_chunks(&["Short."]))
        .await;

    let response = harness
        .server
        .post("/v1/summarize")
        .json(&json!({"content": "A long article about otters."}))
        .await;

    response.assert_status_ok();
    let frames = parse_sse(&response.text());
    assert_eq!(frames.last().unwrap().event, "done");
    assert_eq!(frames.last().unwrap().data, json!({"text": "Short."}));

    let body = harness.vendors.single_request_body().await;
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(
        body["messages"],
        json!([
            {"role": "system", "content": "You summarize web pages."},
            {
                "role": "user",
                "content": "Instructions: Summarize in one sentence.\n\nWeb page contents: A long article about otters."
            }
        ])
    );
}

#[tokio::test]
async fn test_summarize_with_named_profile() {
    let harness = TestHarness::new().await;
    harness
        .vendors
        .mock_stream(ProviderKind::Anthropic, &anthropic_events(&[], &["Otters."]))
        .await;

    let response = harness
        .server
        .post("/v1/summarize")
        .json(&json!({"content": "Page", "profile": "thinker"}))
        .await;

    response.assert_status_ok();
    let body = harness.vendors.single_request_body().await;
    assert_eq!(body["model"], "claude-3-7-sonnet-latest");
    assert_eq!(body["system"], "Think before answering.");
}

#[tokio::test]
async fn test_fill_form_message_order() {
    let harness = TestHarness::new().await;
    harness
        .vendors
        .mock_stream(ProviderKind::OpenAI, &openai_chunks(&["Jane Doe"]))
        .await;

    let response = harness
        .server
        .post("/v1/fill-form")
        .json(&json!({
            "prompt": "Write my name",
            "extra": "Contact form for Acme"
        }))
        .await;

    response.assert_status_ok();
    let frames = parse_sse(&response.text());
    assert_eq!(frames.last().unwrap().data, json!({"text": "Jane Doe"}));

    let body = harness.vendors.single_request_body().await;
    assert_eq!(
        body["messages"],
        json!([
            {"role": "system", "content": FORM_FILLER_SYSTEM_PROMPT},
            {
                "role": "user",
                "content": "For context, the page contains the following text: Contact form for Acme"
            },
            {"role": "user", "content": "Do not wrap your response in quotes."},
            {"role": "user", "content": "Write my name"}
        ])
    );
}

#[tokio::test]
async fn test_fill_form_without_context() {
    let harness = TestHarness::new().await;
    harness
        .vendors
        .mock_stream(ProviderKind::OpenAI, &openai_chunks(&["ok"]))
        .await;

    let response = harness
        .server
        .post("/v1/fill-form")
        .json(&json!({"prompt": "Say ok", "extra": ""}))
        .await;

    response.assert_status_ok();
    let body = harness.vendors.single_request_body().await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_summarize_unknown_profile() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/v1/summarize")
        .json(&json!({"content": "Page", "profile": "ghost"}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}
