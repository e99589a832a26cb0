//! Provider routing
//!
//! Maps a model identifier to the upstream vendor that serves it. Routing is a
//! pure, ordered prefix match: the first rule that matches wins and OpenAI is
//! the fallback, so every model id resolves to exactly one provider.

use serde::{Deserialize, Serialize};

/// Supported upstream vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[serde(rename = "openai")]
    OpenAI,
    Anthropic,
    Perplexity,
    Google,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "xai")]
    XAI,
}

/// Ordered prefix rules. Earlier rules take priority.
const ROUTES: &[(&str, ProviderKind)] = &[
    ("claude-", ProviderKind::Anthropic),
    ("sonar", ProviderKind::Perplexity),
    ("llama-", ProviderKind::Perplexity),
    ("gemini-", ProviderKind::Google),
    ("openrouter/", ProviderKind::OpenRouter),
    ("grok-", ProviderKind::XAI),
];

impl ProviderKind {
    /// All providers, in routing order with the fallback last
    pub const ALL: [ProviderKind; 6] = [
        ProviderKind::Anthropic,
        ProviderKind::Perplexity,
        ProviderKind::Google,
        ProviderKind::OpenRouter,
        ProviderKind::XAI,
        ProviderKind::OpenAI,
    ];

    /// Select the provider for a model id
    pub fn for_model(model_id: &str) -> Self {
        ROUTES
            .iter()
            .find(|(prefix, _)| model_id.starts_with(prefix))
            .map(|(_, kind)| *kind)
            .unwrap_or(ProviderKind::OpenAI)
    }

    /// Stable lowercase key used in config, profiles, logs and metrics
    pub fn slug(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Perplexity => "perplexity",
            ProviderKind::Google => "google",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::XAI => "xai",
        }
    }

    /// Human-readable vendor name for diagnostics
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Perplexity => "Perplexity",
            ProviderKind::Google => "Google",
            ProviderKind::OpenRouter => "OpenRouter",
            ProviderKind::XAI => "xAI",
        }
    }

    /// Whether the vendor speaks the OpenAI chat-completions stream format
    pub fn is_openai_family(&self) -> bool {
        matches!(
            self,
            ProviderKind::OpenAI
                | ProviderKind::OpenRouter
                | ProviderKind::Perplexity
                | ProviderKind::XAI
        )
    }

    /// Parse a slug back into a provider
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}
