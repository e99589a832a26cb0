//! Channel accumulation and canonical event emission
//!
//! Every delta event carries the full text accumulated on its channel so far,
//! so a consumer can always render the latest event without keeping state.

use super::DecodedEvent;
use crate::gateway::GatewayError;
use crate::types::NormalizedEvent;

/// Per-session channel buffers
#[derive(Debug, Default)]
pub struct EventNormalizer {
    thinking: String,
    output: String,
    legacy: String,
}

/// What a decoded unit means for the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Emit this delta and keep reading
    Delta(NormalizedEvent),
    /// Nothing to emit
    Skip,
    /// Vendor ended the stream; call [`EventNormalizer::finish`]
    End,
    /// Vendor reported an error inline
    Fail(GatewayError),
}

impl EventNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one decoded unit into the buffers
    pub fn apply(&mut self, event: DecodedEvent) -> Normalized {
        match event {
            DecodedEvent::Thinking(text) if !text.is_empty() => {
                self.thinking.push_str(&text);
                Normalized::Delta(NormalizedEvent::ThinkingDelta(self.thinking.clone()))
            }
            DecodedEvent::Output(text) if !text.is_empty() => {
                self.output.push_str(&text);
                Normalized::Delta(NormalizedEvent::MessageDelta(self.output.clone()))
            }
            DecodedEvent::Legacy(text) => {
                self.legacy.push_str(&text);
                Normalized::Skip
            }
            DecodedEvent::Thinking(_) | DecodedEvent::Output(_) => Normalized::Skip,
            DecodedEvent::End => Normalized::End,
            DecodedEvent::InlineError(message) => {
                Normalized::Fail(GatewayError::VendorInlineError(message))
            }
        }
    }

    /// Final text for the Done event, or `EmptyResult` when nothing arrived
    pub fn finish(&self) -> Result<String, GatewayError> {
        if !self.output.is_empty() {
            Ok(self.output.clone())
        } else if !self.legacy.is_empty() {
            Ok(self.legacy.clone())
        } else {
            Err(GatewayError::EmptyResult)
        }
    }
}
