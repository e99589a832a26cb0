//! Configuration management for Prism
//!
//! Configuration is loaded from environment variables (and a `.env` file, if
//! present, loaded by `main`).

use anyhow::{Context, Result};
use secrecy::SecretString;
use std::env;
use std::path::PathBuf;

use crate::profiles::{CredentialSet, DEFAULT_PROFILE_NAME};
use crate::provider::ProviderKind;
use crate::transport::{Attribution, Endpoints};

/// Model used by the built-in default profile
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// JSON profile document; a single default profile is used when unset
    pub profiles_path: Option<PathBuf>,
    /// Profile used when a request names none
    pub default_profile: String,
    /// Model of the built-in default profile
    pub default_model: String,

    /// Global vendor keys
    pub credentials: CredentialSet,
    /// Vendor endpoint table
    pub endpoints: Endpoints,
    /// OpenRouter attribution headers
    pub attribution: Attribution,

    /// Connect timeout for upstream requests (in seconds)
    pub connect_timeout_seconds: u64,

    /// Log upstream request bodies at debug level
    pub debug_enabled: bool,
}

/// Environment variable prefix for a provider's key and URL
fn env_prefix(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::OpenAI => "OPENAI",
        ProviderKind::Anthropic => "ANTHROPIC",
        ProviderKind::Perplexity => "PERPLEXITY",
        ProviderKind::Google => "GOOGLE",
        ProviderKind::OpenRouter => "OPENROUTER",
        ProviderKind::XAI => "XAI",
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut credentials = CredentialSet::new();
        for kind in ProviderKind::ALL {
            if let Some(key) = non_empty(&format!("{}_API_KEY", env_prefix(kind))) {
                credentials.insert(kind, SecretString::from(key));
            }
        }

        let defaults = Endpoints::default();
        let url = |kind: ProviderKind| {
            non_empty(&format!("{}_API_URL", env_prefix(kind)))
                .unwrap_or_else(|| defaults.base_for(kind).to_string())
        };
        let endpoints = Endpoints {
            openai: url(ProviderKind::OpenAI),
            anthropic: url(ProviderKind::Anthropic),
            perplexity: url(ProviderKind::Perplexity),
            google: url(ProviderKind::Google),
            openrouter: url(ProviderKind::OpenRouter),
            xai: url(ProviderKind::XAI),
        };

        Ok(Self {
            host: env::var("PRISM_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PRISM_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PRISM_PORT")?,

            profiles_path: non_empty("PRISM_PROFILES_PATH").map(PathBuf::from),
            default_profile: non_empty("PRISM_DEFAULT_PROFILE")
                .unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string()),
            default_model: non_empty("PRISM_DEFAULT_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),

            credentials,
            endpoints,
            attribution: Attribution {
                referer: non_empty("OPENROUTER_REFERER"),
                title: non_empty("OPENROUTER_TITLE"),
            },

            connect_timeout_seconds: env::var("PRISM_CONNECT_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid PRISM_CONNECT_TIMEOUT_SECONDS")?,

            debug_enabled: env::var("PRISM_DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }

    /// Providers with a global key configured
    pub fn configured_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.credentials.contains_key(kind))
            .collect()
    }
}
