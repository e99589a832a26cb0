//! Upstream endpoint table
//!
//! Built once from configuration and shared read-only by every session.

use crate::provider::ProviderKind;

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_PERPLEXITY_URL: &str = "https://api.perplexity.ai/chat/completions";
pub const DEFAULT_GOOGLE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_XAI_URL: &str = "https://api.x.ai/v1/chat/completions";

/// Immutable endpoint configuration, one URL per vendor
///
/// Google's entry is a base; the model and method are appended per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub openai: String,
    pub anthropic: String,
    pub perplexity: String,
    pub google: String,
    pub openrouter: String,
    pub xai: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openai: DEFAULT_OPENAI_URL.to_string(),
            anthropic: DEFAULT_ANTHROPIC_URL.to_string(),
            perplexity: DEFAULT_PERPLEXITY_URL.to_string(),
            google: DEFAULT_GOOGLE_URL.to_string(),
            openrouter: DEFAULT_OPENROUTER_URL.to_string(),
            xai: DEFAULT_XAI_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every vendor at one base URL (used by tests against a mock server)
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            openai: format!("{base}/openai/v1/chat/completions"),
            anthropic: format!("{base}/anthropic/v1/messages"),
            perplexity: format!("{base}/perplexity/chat/completions"),
            google: format!("{base}/google/v1beta/models"),
            openrouter: format!("{base}/openrouter/api/v1/chat/completions"),
            xai: format!("{base}/xai/v1/chat/completions"),
        }
    }

    pub fn base_for(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::OpenAI => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Perplexity => &self.perplexity,
            ProviderKind::Google => &self.google,
            ProviderKind::OpenRouter => &self.openrouter,
            ProviderKind::XAI => &self.xai,
        }
    }

    /// Full request URL for `kind`; only Google puts the model in the path
    pub fn url_for(&self, kind: ProviderKind, upstream_model: &str) -> String {
        let base = self.base_for(kind);
        match kind {
            ProviderKind::Google => format!(
                "{}/{}:streamGenerateContent?alt=sse",
                base.trim_end_matches('/'),
                upstream_model
            ),
            _ => base.to_string(),
        }
    }
}
