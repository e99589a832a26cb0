//! Google Gemini translator implementation
//!
//! Gemini has no system role in `contents`, so the system prompt is folded into
//! the first user part. The model id is not part of the body; the transport
//! places it in the URL path instead.

use serde::Serialize;

use super::{
    anthropic::extract_system_prompt, ensure_translatable, MessageTranslator, TranslationError,
};
use crate::types::{ChatMessage, Role};

/// Sampling temperature sent with every request
pub const TEMPERATURE: f32 = 0.7;

/// Output token ceiling sent with every request
pub const MAX_OUTPUT_TOKENS: u32 = 8192;

/// `-1` lets the model size its own thinking budget
pub const DYNAMIC_THINKING_BUDGET: i32 = -1;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratePayload {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    tools: [Tool; 1],
}

#[derive(Debug, Serialize, PartialEq)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, PartialEq)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: i32,
    include_thoughts: bool,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: serde_json::Map<String, serde_json::Value>,
}

/// Gemini `streamGenerateContent` translator
#[derive(Debug, Clone, Default)]
pub struct GoogleTranslator;

fn build_contents(messages: &[ChatMessage]) -> Vec<Content> {
    let system = extract_system_prompt(messages);

    let mut contents: Vec<Content> = messages
        .iter()
        .filter_map(|m| {
            let role = match m.role {
                Role::System => return None,
                Role::User => "user",
                Role::Assistant => "model",
            };
            Some(Content {
                role,
                parts: vec![Part {
                    text: m.content.clone(),
                }],
            })
        })
        .collect();

    if system.is_empty() {
        return contents;
    }

    match contents.iter_mut().find(|c| c.role == "user") {
        Some(first_user) => {
            let part = &mut first_user.parts[0];
            part.text = format!("{}\n\n{}", system, part.text);
        }
        None => contents.insert(
            0,
            Content {
                role: "user",
                parts: vec![Part {
                    text: system.to_string(),
                }],
            },
        ),
    }

    contents
}

impl MessageTranslator for GoogleTranslator {
    fn translate_request(
        &self,
        model_id: &str,
        messages: &[ChatMessage],
    ) -> Result<serde_json::Value, TranslationError> {
        ensure_translatable(model_id, messages)?;

        let payload = GeneratePayload {
            contents: build_contents(messages),
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                thinking_config: ThinkingConfig {
                    thinking_budget: DYNAMIC_THINKING_BUDGET,
                    include_thoughts: true,
                },
            },
            tools: [Tool {
                google_search: serde_json::Map::new(),
            }],
        };

        Ok(serde_json::to_value(payload)?)
    }
}
