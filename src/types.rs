//! Core message types for the gateway
//!
//! Defines the normalized request shape every calling feature assembles and the
//! canonical event stream every session produces, independent of the vendor.

use serde::{Deserialize, Serialize};

/// Role of a message participant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message providing instructions or context
    System,
    /// User message from the human
    User,
    /// Assistant message from the AI
    Assistant,
}

/// A chat message with role and plain-text content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// The role of the message author
    pub role: Role,
    /// The content of the message
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One normalized completion request
///
/// `model_id` may be empty, in which case the gateway uses the model stored in
/// the profile named by `profile_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRequest {
    /// Messages in the conversation, in order
    pub messages: Vec<ChatMessage>,
    /// Model identifier, also used to select the provider
    #[serde(default)]
    pub model_id: String,
    /// Profile supplying the model fallback and credential overrides
    pub profile_id: String,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>, profile_id: impl Into<String>) -> Self {
        Self {
            messages,
            model_id: String::new(),
            profile_id: profile_id.into(),
        }
    }

    /// Set an explicit model, overriding the profile's model
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }
}

/// Canonical event produced by a gateway session.
///
/// Delta payloads are cumulative: each one carries the full text accumulated on
/// its channel so far, never just the newest fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedEvent {
    /// Accumulated reasoning text
    ThinkingDelta(String),
    /// Accumulated answer text
    MessageDelta(String),
    /// Terminal success with the final answer
    Done(String),
    /// Terminal failure
    Error(String),
}

impl NormalizedEvent {
    /// Whether this event ends the session
    pub fn is_terminal(&self) -> bool {
        matches!(self, NormalizedEvent::Done(_) | NormalizedEvent::Error(_))
    }

    /// SSE event name used on the HTTP surface
    pub fn name(&self) -> &'static str {
        match self {
            NormalizedEvent::ThinkingDelta(_) => "thinking",
            NormalizedEvent::MessageDelta(_) => "message",
            NormalizedEvent::Done(_) => "done",
            NormalizedEvent::Error(_) => "error",
        }
    }
}
