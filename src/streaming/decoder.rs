//! Per-provider incremental stream decoder
//!
//! Turns raw body chunks into vendor-neutral decoded units. The decoder never
//! fails as a whole: a malformed line becomes a `DecodeFault` step and decoding
//! continues with the next line. Only an inline vendor error or an explicit end
//! marker stops it.

use serde::Deserialize;
use thiserror::Error;

use super::{truncate_chars, BufferedLine, SseLineBuffer, MAX_LINE_BYTES};
use crate::provider::ProviderKind;

/// Prefix every payload line carries
pub const DATA_MARKER: &str = "data: ";

/// Payload that ends an OpenAI-style stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// Raw body bytes inspected for a whole-body JSON error before any `data:` line
const PREAMBLE_LIMIT: usize = 64 * 1024;

/// Longest line excerpt kept in a fault
const FAULT_EXCERPT_CHARS: usize = 500;

/// One unit of vendor output, already routed to a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEvent {
    /// Reasoning fragment
    Thinking(String),
    /// Answer fragment
    Output(String),
    /// Text in a shape outside the channel table
    Legacy(String),
    /// Vendor signalled the end of the stream
    End,
    /// Vendor reported an error inside the stream
    InlineError(String),
}

/// A payload line that could not be decoded; the line is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to decode stream line: {reason}")]
pub struct DecodeFault {
    /// Offending line, truncated
    pub line: String,
    /// Parser diagnostic
    pub reason: String,
}

impl DecodeFault {
    fn new(line: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            line: truncate_chars(line, FAULT_EXCERPT_CHARS).to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result of decoding one unit
pub type DecodeStep = Result<DecodedEvent, DecodeFault>;

/// Anthropic content block currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Text,
    Thinking,
    Other,
}

/// Stateful decoder for one session's response body
#[derive(Debug)]
pub struct StreamDecoder {
    provider: ProviderKind,
    lines: SseLineBuffer,
    /// Raw body seen before the first `data:` line; `None` once one arrives
    preamble: Option<Vec<u8>>,
    open_block: Option<BlockKind>,
    finished: bool,
}

impl StreamDecoder {
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            lines: SseLineBuffer::new(),
            preamble: Some(Vec::new()),
            open_block: None,
            finished: false,
        }
    }

    /// Whether an end marker or inline error has been decoded
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Decode one body chunk
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<DecodeStep> {
        if self.finished {
            return Vec::new();
        }

        if let Some(message) = self.check_preamble(chunk) {
            self.finished = true;
            return vec![Ok(DecodedEvent::InlineError(message))];
        }

        let lines = self.lines.feed(chunk);
        self.decode_lines(lines)
    }

    /// Flush the carry-over buffer once the body has closed
    pub fn finish(&mut self) -> Vec<DecodeStep> {
        if self.finished {
            return Vec::new();
        }

        let steps = match self.lines.take_remaining() {
            Some(line) => self.decode_lines(vec![Ok(line)]),
            None => Vec::new(),
        };
        self.finished = true;
        steps
    }

    /// Some vendors answer with a bare JSON error body instead of a stream.
    fn check_preamble(&mut self, chunk: &[u8]) -> Option<String> {
        let preamble = self.preamble.as_mut()?;
        if preamble.len() >= PREAMBLE_LIMIT {
            return None;
        }
        preamble.extend_from_slice(chunk);

        let body = skip_comment_lines(preamble);
        let value: serde_json::Value = serde_json::from_slice(body).ok()?;
        inline_error(&value)
    }

    fn decode_lines(&mut self, lines: Vec<BufferedLine>) -> Vec<DecodeStep> {
        let mut steps = Vec::new();
        for line in lines {
            if self.finished {
                break;
            }
            match line {
                Ok(line) => self.decode_line(&line, &mut steps),
                Err(oversized) => steps.push(Err(DecodeFault::new(
                    &oversized.excerpt,
                    format!("line exceeds {} bytes", MAX_LINE_BYTES),
                ))),
            }
        }
        steps
    }

    fn decode_line(&mut self, line: &str, steps: &mut Vec<DecodeStep>) {
        let Some(payload) = line.strip_prefix(DATA_MARKER) else {
            return;
        };
        self.preamble = None;

        let payload = payload.trim();
        if self.provider.is_openai_family() && payload == DONE_SENTINEL {
            self.finished = true;
            steps.push(Ok(DecodedEvent::End));
            return;
        }

        let value: serde_json::Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(e) => {
                steps.push(Err(DecodeFault::new(payload, e)));
                return;
            }
        };

        if let Some(message) = inline_error(&value) {
            self.finished = true;
            steps.push(Ok(DecodedEvent::InlineError(message)));
            return;
        }

        let decoded = match self.provider {
            ProviderKind::Anthropic => self.decode_anthropic(value),
            ProviderKind::Google => decode_google(value),
            kind => decode_chat(kind, value),
        };

        match decoded {
            Ok(events) => {
                for event in events {
                    if matches!(event, DecodedEvent::End | DecodedEvent::InlineError(_)) {
                        self.finished = true;
                    }
                    steps.push(Ok(event));
                }
            }
            Err(e) => steps.push(Err(DecodeFault::new(payload, e))),
        }
    }

    fn decode_anthropic(
        &mut self,
        value: serde_json::Value,
    ) -> Result<Vec<DecodedEvent>, serde_json::Error> {
        let event: AnthropicEvent = serde_json::from_value(value)?;
        let mut events = Vec::new();

        match event.kind.as_str() {
            "content_block_start" => {
                let block = event.content_block.unwrap_or_default();
                let kind = match block.kind.as_str() {
                    "text" => BlockKind::Text,
                    "thinking" => BlockKind::Thinking,
                    _ => BlockKind::Other,
                };
                self.open_block = Some(kind);

                match kind {
                    BlockKind::Text => push_text(&mut events, DecodedEvent::Output, block.text),
                    BlockKind::Thinking => {
                        push_text(&mut events, DecodedEvent::Thinking, block.thinking)
                    }
                    BlockKind::Other => {}
                }
            }
            "content_block_delta" => {
                let delta = event.delta.unwrap_or_default();
                match delta.kind.as_deref() {
                    Some("text_delta") => push_text(&mut events, DecodedEvent::Output, delta.text),
                    Some("thinking_delta") => {
                        push_text(&mut events, DecodedEvent::Thinking, delta.thinking)
                    }
                    Some(_) => {}
                    // Untyped delta: follow the open block, else keep it aside
                    None => {
                        let route = match self.open_block {
                            Some(BlockKind::Text) => DecodedEvent::Output,
                            Some(BlockKind::Thinking) => DecodedEvent::Thinking,
                            _ => DecodedEvent::Legacy,
                        };
                        push_text(&mut events, route, delta.text);
                    }
                }
            }
            "content_block_stop" => self.open_block = None,
            "message_stop" => events.push(DecodedEvent::End),
            _ => {}
        }

        Ok(events)
    }
}

fn push_text(
    events: &mut Vec<DecodedEvent>,
    route: fn(String) -> DecodedEvent,
    text: Option<String>,
) {
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        events.push(route(text));
    }
}

/// Message of a top-level `error` field, if the payload carries one
fn inline_error(value: &serde_json::Value) -> Option<String> {
    let error = value.as_object()?.get("error")?;
    let message = match error {
        serde_json::Value::Null => return None,
        serde_json::Value::String(s) => s.clone(),
        other => other
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    };
    Some(message)
}

/// Skip leading SSE comment lines (`: ...`) and blank lines
fn skip_comment_lines(mut body: &[u8]) -> &[u8] {
    loop {
        let start = body
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(body.len());
        body = &body[start..];
        if !body.starts_with(b":") {
            return body;
        }
        body = match body.iter().position(|b| *b == b'\n') {
            Some(pos) => &body[pos + 1..],
            None => &[],
        };
    }
}

// ============================================================================
// OpenAI-compatible chunks (OpenAI, OpenRouter, Perplexity, xAI)
// ============================================================================

#[derive(Debug, Deserialize, Default)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize, Default)]
struct ChatChoice {
    #[serde(default)]
    delta: ChatDelta,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ChatDelta {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    reasoning_content: Option<String>,
    #[serde(default)]
    reasoning: Option<String>,
}

fn decode_chat(
    provider: ProviderKind,
    value: serde_json::Value,
) -> Result<Vec<DecodedEvent>, serde_json::Error> {
    let chunk: ChatChunk = serde_json::from_value(value)?;
    let mut events = Vec::new();

    let Some(choice) = chunk.choices.into_iter().next() else {
        return Ok(events);
    };

    if provider == ProviderKind::XAI {
        let reasoning = choice.delta.reasoning_content.or(choice.delta.reasoning);
        push_text(&mut events, DecodedEvent::Thinking, reasoning);
    }
    push_text(&mut events, DecodedEvent::Output, choice.delta.content);
    push_text(&mut events, DecodedEvent::Legacy, choice.text);

    Ok(events)
}

// ============================================================================
// Anthropic events
// ============================================================================

#[derive(Debug, Deserialize)]
struct AnthropicEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content_block: Option<AnthropicBlock>,
    #[serde(default)]
    delta: Option<AnthropicDelta>,
}

#[derive(Debug, Deserialize, Default)]
struct AnthropicBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thinking: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct AnthropicDelta {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thinking: Option<String>,
}

// ============================================================================
// Google Gemini chunks
// ============================================================================

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GeminiChunk {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize, Default)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize, Default)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize, Default)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

fn decode_google(value: serde_json::Value) -> Result<Vec<DecodedEvent>, serde_json::Error> {
    let chunk: GeminiChunk = serde_json::from_value(value)?;
    let mut events = Vec::new();

    if chunk.candidates.is_empty() {
        if let Some(reason) = chunk.prompt_feedback.and_then(|f| f.block_reason) {
            events.push(DecodedEvent::InlineError(format!(
                "Prompt blocked by Google: {}",
                reason
            )));
        }
        return Ok(events);
    }

    let parts = chunk
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default();

    for part in parts {
        let route = if part.thought == Some(true) {
            DecodedEvent::Thinking
        } else {
            DecodedEvent::Output
        };
        push_text(&mut events, route, part.text);
    }

    Ok(events)
}
