//! OpenRouter translator implementation
//!
//! Model ids are addressed locally as `openrouter/<vendor>/<model>`; the routing
//! prefix is stripped before the id goes upstream.

use super::openai::ChatPayload;
use super::{ensure_translatable, MessageTranslator, TranslationError};
use crate::types::ChatMessage;

/// Local routing prefix that OpenRouter itself does not understand
pub const MODEL_PREFIX: &str = "openrouter/";

/// OpenRouter translator (OpenAI-compatible body)
#[derive(Debug, Clone, Default)]
pub struct OpenRouterTranslator;

impl MessageTranslator for OpenRouterTranslator {
    fn translate_request(
        &self,
        model_id: &str,
        messages: &[ChatMessage],
    ) -> Result<serde_json::Value, TranslationError> {
        let model = self.upstream_model(model_id);
        ensure_translatable(model, messages)?;

        Ok(serde_json::to_value(ChatPayload::streaming(model, messages))?)
    }

    fn upstream_model<'a>(&self, model_id: &'a str) -> &'a str {
        model_id.strip_prefix(MODEL_PREFIX).unwrap_or(model_id)
    }
}
