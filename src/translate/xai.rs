//! xAI translator implementation
//!
//! OpenAI-shaped body with live search switched to automatic over web and X.

use serde::Serialize;
use serde_json::json;

use super::openai::ChatPayload;
use super::{ensure_translatable, MessageTranslator, TranslationError};
use crate::types::ChatMessage;

#[derive(Debug, Serialize)]
struct GrokPayload<'a> {
    #[serde(flatten)]
    chat: ChatPayload<'a>,
    search_parameters: serde_json::Value,
}

fn search_parameters() -> serde_json::Value {
    json!({
        "mode": "auto",
        "sources": [
            {"type": "web"},
            {"type": "x"}
        ]
    })
}

/// xAI Grok translator
#[derive(Debug, Clone, Default)]
pub struct XaiTranslator;

impl MessageTranslator for XaiTranslator {
    fn translate_request(
        &self,
        model_id: &str,
        messages: &[ChatMessage],
    ) -> Result<serde_json::Value, TranslationError> {
        ensure_translatable(model_id, messages)?;

        Ok(serde_json::to_value(GrokPayload {
            chat: ChatPayload::streaming(model_id, messages),
            search_parameters: search_parameters(),
        })?)
    }
}
