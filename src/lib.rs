//! Prism - Streaming completion gateway for multiple LLM vendors
//!
//! This library routes a normalized chat request to OpenAI, Anthropic,
//! Perplexity, Google, OpenRouter or xAI based on the model id, streams the
//! vendor's response and re-emits it as a uniform sequence of thinking and
//! message deltas followed by exactly one `Done` or `Error`.

pub mod config;
pub mod error;
pub mod features;
pub mod gateway;
pub mod profiles;
pub mod provider;
pub mod routes;
pub mod streaming;
pub mod translate;
pub mod transport;
pub mod types;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::gateway::{Gateway, GatewayError, SessionHandle};
pub use crate::profiles::{InMemoryProfileStore, Profile, ProfileStore};
pub use crate::provider::ProviderKind;
pub use crate::types::{ChatMessage, CompletionRequest, NormalizedEvent, Role};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub gateway: Gateway,
    pub start_time: Instant,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        let profiles: Arc<dyn ProfileStore> = match &config.profiles_path {
            Some(path) => Arc::new(InMemoryProfileStore::load(path, &config.default_profile)?),
            None => Arc::new(InMemoryProfileStore::with_default(
                &config.default_profile,
                &config.default_model,
            )),
        };

        let gateway = Gateway::from_config(&config, profiles)?;

        Ok(Self {
            config,
            gateway,
            start_time: Instant::now(),
        })
    }

    /// Create application state around an existing gateway
    pub fn with_gateway(config: Config, gateway: Gateway) -> Self {
        Self {
            config,
            gateway,
            start_time: Instant::now(),
        }
    }
}
