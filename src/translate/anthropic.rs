//! Anthropic translator implementation
//!
//! Anthropic takes the system prompt as a top-level field rather than a message,
//! and this gateway always sends a single user turn: every user message is
//! joined with a blank line. Extended thinking is always requested.

use serde::Serialize;

use super::{ensure_translatable, MessageTranslator, TranslationError};
use crate::types::{ChatMessage, Role};

/// Output token ceiling sent with every request
pub const MAX_TOKENS: u32 = 16_000;

/// Token budget for the extended-thinking block
pub const THINKING_BUDGET_TOKENS: u32 = 10_000;

#[derive(Debug, Serialize)]
struct MessagesPayload<'a> {
    model: &'a str,
    messages: [UserTurn; 1],
    system: &'a str,
    stream: bool,
    max_tokens: u32,
    thinking: Thinking,
}

#[derive(Debug, Serialize)]
struct UserTurn {
    role: Role,
    content: String,
}

#[derive(Debug, Serialize)]
struct Thinking {
    #[serde(rename = "type")]
    kind: &'static str,
    budget_tokens: u32,
}

/// Anthropic Messages API translator
#[derive(Debug, Clone, Default)]
pub struct AnthropicTranslator;

/// Text of the first system message, or empty if there is none
pub fn extract_system_prompt(messages: &[ChatMessage]) -> &str {
    messages
        .iter()
        .find(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .unwrap_or("")
}

/// All user message contents joined by a blank line
pub fn merge_user_messages(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

impl MessageTranslator for AnthropicTranslator {
    fn translate_request(
        &self,
        model_id: &str,
        messages: &[ChatMessage],
    ) -> Result<serde_json::Value, TranslationError> {
        ensure_translatable(model_id, messages)?;

        let payload = MessagesPayload {
            model: model_id,
            messages: [UserTurn {
                role: Role::User,
                content: merge_user_messages(messages),
            }],
            system: extract_system_prompt(messages),
            stream: true,
            max_tokens: MAX_TOKENS,
            thinking: Thinking {
                kind: "enabled",
                budget_tokens: THINKING_BUDGET_TOKENS,
            },
        };

        Ok(serde_json::to_value(payload)?)
    }
}
