//! Perplexity translator implementation

use serde::Serialize;

use super::{ensure_translatable, MessageTranslator, TranslationError};
use crate::types::ChatMessage;

/// Search depth requested for every Perplexity call
pub const SEARCH_MODE: &str = "medium";

#[derive(Debug, Serialize)]
struct SearchPayload<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    search_mode: &'static str,
}

/// Perplexity chat-completions translator
///
/// Messages pass through unchanged; only the search mode is added.
#[derive(Debug, Clone, Default)]
pub struct PerplexityTranslator;

impl MessageTranslator for PerplexityTranslator {
    fn translate_request(
        &self,
        model_id: &str,
        messages: &[ChatMessage],
    ) -> Result<serde_json::Value, TranslationError> {
        ensure_translatable(model_id, messages)?;

        Ok(serde_json::to_value(SearchPayload {
            model: model_id,
            messages,
            stream: true,
            search_mode: SEARCH_MODE,
        })?)
    }
}
