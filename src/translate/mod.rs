//! Translation layer from normalized requests to vendor payloads
//!
//! This module provides the `MessageTranslator` trait and one implementation per
//! `ProviderKind`. Translators are pure: they never touch the network and carry
//! no state, so the per-provider choice is made once by `translator_for`.

pub mod anthropic;
pub mod google;
pub mod openai;
pub mod openrouter;
pub mod perplexity;
pub mod xai;

use thiserror::Error;

use crate::provider::ProviderKind;
use crate::types::ChatMessage;

/// Errors that can occur during request translation
#[derive(Debug, Error)]
pub enum TranslationError {
    /// There is nothing to send
    #[error("Conversation must contain at least one message")]
    EmptyConversation,

    /// The model identifier is empty after provider-specific rewriting
    #[error("Model identifier is empty")]
    MissingModel,

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Trait for translating the normalized request into a provider-specific body
pub trait MessageTranslator: Send + Sync {
    /// Build the JSON body sent upstream for `model_id` and `messages`
    ///
    /// # Errors
    ///
    /// Returns `TranslationError` if the conversation is empty, the model id is
    /// unusable for this provider, or serialization fails.
    fn translate_request(
        &self,
        model_id: &str,
        messages: &[ChatMessage],
    ) -> Result<serde_json::Value, TranslationError>;

    /// Model identifier as the vendor expects to see it
    fn upstream_model<'a>(&self, model_id: &'a str) -> &'a str {
        model_id
    }
}

static OPENAI: openai::OpenAITranslator = openai::OpenAITranslator;
static ANTHROPIC: anthropic::AnthropicTranslator = anthropic::AnthropicTranslator;
static PERPLEXITY: perplexity::PerplexityTranslator = perplexity::PerplexityTranslator;
static GOOGLE: google::GoogleTranslator = google::GoogleTranslator;
static OPENROUTER: openrouter::OpenRouterTranslator = openrouter::OpenRouterTranslator;
static XAI: xai::XaiTranslator = xai::XaiTranslator;

/// Select the translator for a provider
pub fn translator_for(kind: ProviderKind) -> &'static dyn MessageTranslator {
    match kind {
        ProviderKind::OpenAI => &OPENAI,
        ProviderKind::Anthropic => &ANTHROPIC,
        ProviderKind::Perplexity => &PERPLEXITY,
        ProviderKind::Google => &GOOGLE,
        ProviderKind::OpenRouter => &OPENROUTER,
        ProviderKind::XAI => &XAI,
    }
}

/// Shared guard for the preconditions every translator checks
pub(crate) fn ensure_translatable(
    model_id: &str,
    messages: &[ChatMessage],
) -> Result<(), TranslationError> {
    if messages.is_empty() {
        return Err(TranslationError::EmptyConversation);
    }
    if model_id.trim().is_empty() {
        return Err(TranslationError::MissingModel);
    }
    Ok(())
}
