//! SSE (Server-Sent Events) streaming utilities
//!
//! Provides the carry-over line buffer, the per-provider stream decoder, the
//! channel normalizer and the outgoing SSE encoder used by the HTTP surface.

pub mod decoder;
pub mod normalizer;
pub mod sse;

pub use decoder::{DecodeFault, DecodedEvent, StreamDecoder};
pub use normalizer::EventNormalizer;

/// Longest line held across chunks, in bytes
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Bytes of a dropped line kept for diagnostics
const OVERSIZED_EXCERPT_BYTES: usize = 512;

/// A line dropped for growing past [`MAX_LINE_BYTES`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OversizedLine {
    /// Start of the dropped line
    pub excerpt: String,
}

/// A complete line, or a line that was too long to keep
pub type BufferedLine = Result<String, OversizedLine>;

/// Buffer for accumulating incomplete SSE lines across chunk boundaries.
///
/// SSE data arrives as byte chunks that may not align with line boundaries.
/// Bytes after the last `\n` are held and prefixed onto the next chunk. The
/// carry is kept as raw bytes so a multi-byte UTF-8 sequence split across two
/// chunks still decodes correctly.
///
/// A line that outgrows [`MAX_LINE_BYTES`] is reported once as
/// [`OversizedLine`] and the rest of it is skipped up to the next newline.
///
/// # Example
/// ```
/// use prism::streaming::SseLineBuffer;
///
/// let mut buffer = SseLineBuffer::new();
///
/// // First chunk contains partial line
/// let lines1 = buffer.feed(b"data: {\"content\":\"hel");
/// assert!(lines1.is_empty()); // No complete lines yet
///
/// // Second chunk completes the line
/// let lines2 = buffer.feed(b"lo\"}\n");
/// assert_eq!(lines2, vec![Ok("data: {\"content\":\"hello\"}".to_string())]);
/// ```
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    /// Accumulated incomplete line bytes
    incomplete: Vec<u8>,
    /// Skipping the tail of an oversized line until the next `\n`
    discarding: bool,
}

impl SseLineBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes into the buffer and return any complete lines.
    ///
    /// Complete lines are those ending with `\n`. The newline and any trailing
    /// `\r` are stripped, and empty lines are skipped. Incomplete trailing
    /// data is retained for the next call. Only the new bytes are scanned.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<BufferedLine> {
        let mut lines = Vec::new();
        let mut rest = bytes;

        while let Some(pos) = rest.iter().position(|b| *b == b'\n') {
            let head = &rest[..pos];
            rest = &rest[pos + 1..];

            if self.discarding {
                self.discarding = false;
                continue;
            }
            if self.incomplete.len() + head.len() > MAX_LINE_BYTES {
                lines.push(Err(self.drop_line(head)));
                continue;
            }

            self.incomplete.extend_from_slice(head);
            let line = decode_line(&std::mem::take(&mut self.incomplete));
            if !line.is_empty() {
                lines.push(Ok(line));
            }
        }

        if !self.discarding && !rest.is_empty() {
            if self.incomplete.len() + rest.len() > MAX_LINE_BYTES {
                lines.push(Err(self.drop_line(rest)));
                self.discarding = true;
            } else {
                self.incomplete.extend_from_slice(rest);
            }
        }

        lines
    }

    /// Take the remaining unterminated line, leaving the buffer empty.
    ///
    /// Call this at end of stream: a body that closes without a trailing
    /// newline still delivers its last line.
    pub fn take_remaining(&mut self) -> Option<String> {
        self.discarding = false;
        let line = decode_line(&std::mem::take(&mut self.incomplete));
        (!line.is_empty()).then_some(line)
    }

    /// Discard the held bytes plus `tail`, keeping a short excerpt
    fn drop_line(&mut self, tail: &[u8]) -> OversizedLine {
        let held = std::mem::take(&mut self.incomplete);
        let start = if held.is_empty() { tail } else { &held[..] };
        let excerpt = &start[..start.len().min(OVERSIZED_EXCERPT_BYTES)];
        OversizedLine {
            excerpt: String::from_utf8_lossy(excerpt).into_owned(),
        }
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Longest prefix of `text` holding at most `max_chars` characters.
///
/// Used to bound vendor text that ends up in logs and error messages.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
