//! Common test utilities and fixtures

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use secrecy::SecretString;
use serde_json::Value;

use prism::{
    config::Config,
    profiles::CredentialSet,
    routes::create_router,
    transport::{Attribution, Endpoints, TransportDispatcher},
    AppState, Gateway, InMemoryProfileStore, Profile, ProviderKind,
};

use crate::mocks::MockVendors;

/// Test constants
pub mod constants {
    pub const OPENAI_KEY: &str = "sk-openai-test-key";
    pub const ANTHROPIC_KEY: &str = "sk-ant-test-key";
    pub const PERPLEXITY_KEY: &str = "pplx-test-key";
    pub const GOOGLE_KEY: &str = "AIza-test-key";
    pub const OPENROUTER_KEY: &str = "sk-or-test-key";
    pub const XAI_KEY: &str = "xai-test-key";

    pub const DEFAULT_PROFILE: &str = "default";
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    pub const REFERER: &str = "https://prism.test";
    pub const TITLE: &str = "Prism Tests";
}

/// Every vendor key, for tests that need all providers reachable
pub fn all_credentials() -> CredentialSet {
    use constants::*;
    [
        (ProviderKind::OpenAI, OPENAI_KEY),
        (ProviderKind::Anthropic, ANTHROPIC_KEY),
        (ProviderKind::Perplexity, PERPLEXITY_KEY),
        (ProviderKind::Google, GOOGLE_KEY),
        (ProviderKind::OpenRouter, OPENROUTER_KEY),
        (ProviderKind::XAI, XAI_KEY),
    ]
    .into_iter()
    .map(|(kind, key)| (kind, SecretString::from(key.to_string())))
    .collect()
}

/// Configuration pointing every vendor at `endpoints`
pub fn test_config(endpoints: Endpoints, credentials: CredentialSet) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        profiles_path: None,
        default_profile: constants::DEFAULT_PROFILE.to_string(),
        default_model: constants::DEFAULT_MODEL.to_string(),
        credentials,
        endpoints,
        attribution: Attribution {
            referer: Some(constants::REFERER.to_string()),
            title: Some(constants::TITLE.to_string()),
        },
        connect_timeout_seconds: 5,
        debug_enabled: false,
    }
}

/// Default profile plus a couple of named ones used across tests
pub fn test_profiles() -> Vec<Profile> {
    vec![
        Profile::new(constants::DEFAULT_PROFILE, constants::DEFAULT_MODEL)
            .with_custom_prompts("Summarize in one sentence.")
            .with_system_message("You summarize web pages."),
        Profile::new("thinker", "claude-3-7-sonnet-latest")
            .with_system_message("Think before answering."),
        Profile::new("byok", "gpt-4o").with_credential(ProviderKind::OpenAI, "sk-profile-key"),
    ]
}

/// Gateway plus HTTP server wired to a mock vendor server
pub struct TestHarness {
    pub vendors: MockVendors,
    pub gateway: Gateway,
    pub server: TestServer,
}

impl TestHarness {
    /// Harness with every vendor key configured
    pub async fn new() -> Self {
        Self::with_credentials(all_credentials()).await
    }

    /// Harness with a specific set of global keys
    pub async fn with_credentials(credentials: CredentialSet) -> Self {
        let vendors = MockVendors::start().await;
        let config = test_config(vendors.endpoints(), credentials.clone());

        let store = InMemoryProfileStore::new(constants::DEFAULT_PROFILE);
        for profile in test_profiles() {
            store.insert(profile).await;
        }

        let dispatcher = TransportDispatcher::new(
            reqwest::Client::new(),
            config.endpoints.clone(),
            config.attribution.clone(),
        );
        let gateway = Gateway::new(dispatcher, store.into_shared(), credentials);

        let state = Arc::new(AppState::with_gateway(config, gateway.clone()));
        let server = TestServer::new(create_router(state)).expect("Failed to create test server");

        Self {
            vendors,
            gateway,
            server,
        }
    }
}

/// A parsed SSE frame from the HTTP surface
#[derive(Debug, Clone, PartialEq)]
pub struct SseFrame {
    pub event: String,
    pub data: Value,
}

/// Split an SSE body into `(event, data)` frames, skipping comments
pub fn parse_sse(body: &str) -> Vec<SseFrame> {
    body.split("\n\n")
        .filter_map(|block| {
            let mut event = None;
            let mut data = None;
            for line in block.lines() {
                if let Some(name) = line.strip_prefix("event: ") {
                    event = Some(name.to_string());
                } else if let Some(payload) = line.strip_prefix("data: ") {
                    data = serde_json::from_str(payload).ok();
                }
            }
            Some(SseFrame {
                event: event?,
                data: data?,
            })
        })
        .collect()
}
