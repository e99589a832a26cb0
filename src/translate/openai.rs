//! OpenAI translator implementation
//!
//! The normalized request is already OpenAI-shaped, so translation is a thin
//! wrapper. Models whose id mentions "search" get a `web_search` function tool.
//! The OpenRouter and xAI translators reuse `ChatPayload` from here.

use serde::Serialize;
use serde_json::json;

use super::{ensure_translatable, MessageTranslator, TranslationError};
use crate::types::ChatMessage;

/// Chat-completions request body shared by OpenAI-compatible vendors
#[derive(Debug, Serialize)]
pub struct ChatPayload<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<serde_json::Value>,
}

impl<'a> ChatPayload<'a> {
    pub fn streaming(model: &'a str, messages: &'a [ChatMessage]) -> Self {
        Self {
            model,
            messages,
            stream: true,
            tools: None,
        }
    }
}

/// Function-tool descriptor advertised to search-capable models
pub fn web_search_tool() -> serde_json::Value {
    json!([{
        "type": "function",
        "function": {
            "name": "web_search",
            "description": "Search the web for up-to-date information",
            "parameters": {
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    }
                },
                "required": ["query"]
            }
        }
    }])
}

/// OpenAI API translator
#[derive(Debug, Clone, Default)]
pub struct OpenAITranslator;

impl MessageTranslator for OpenAITranslator {
    fn translate_request(
        &self,
        model_id: &str,
        messages: &[ChatMessage],
    ) -> Result<serde_json::Value, TranslationError> {
        ensure_translatable(model_id, messages)?;

        let mut payload = ChatPayload::streaming(model_id, messages);
        if model_id.contains("search") {
            payload.tools = Some(web_search_tool());
        }

        Ok(serde_json::to_value(payload)?)
    }
}
