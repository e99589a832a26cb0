//! Per-session read loop
//!
//! `StreamSession` owns the decoder and channel buffers for one open response
//! body. It reads one chunk at a time, checks liveness around every read and
//! emits through an `EventSink`, which guarantees at most one terminal event.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use secrecy::SecretString;
use tokio::sync::mpsc;

use super::cancel::{CancelHandle, CancellationMonitor};
use super::GatewayError;
use crate::routes::metrics::record_decode_fault;
use crate::streaming::decoder::DecodeStep;
use crate::streaming::normalizer::Normalized;
use crate::streaming::{EventNormalizer, StreamDecoder};
use crate::transport::{redact, SessionContext};
use crate::types::NormalizedEvent;

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed(&'static str),
    Cancelled,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Done => "done",
            Outcome::Failed(kind) => kind,
            Outcome::Cancelled => "cancelled",
        }
    }
}

/// Sending half of a session's event channel
#[derive(Clone, Debug)]
pub struct EventSink {
    sender: mpsc::Sender<NormalizedEvent>,
    terminal: Arc<AtomicBool>,
    monitor: CancellationMonitor,
}

impl EventSink {
    pub fn new(sender: mpsc::Sender<NormalizedEvent>, cancel: CancelHandle) -> Self {
        Self {
            monitor: CancellationMonitor::new(cancel, sender.clone()),
            sender,
            terminal: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn monitor(&self) -> &CancellationMonitor {
        &self.monitor
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal.load(Ordering::Acquire)
    }

    /// Send a delta. Returns false when the session should stop reading.
    pub async fn emit(&self, event: NormalizedEvent) -> bool {
        if self.is_terminal() || !self.monitor.is_live() {
            return false;
        }
        self.send(event).await
    }

    /// Send the one terminal event. A cancelled session gets none; a second
    /// call is a no-op.
    pub async fn finish(&self, event: NormalizedEvent) -> bool {
        if !self.monitor.is_live() {
            return false;
        }
        if self
            .terminal
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        self.send(event).await
    }

    async fn send(&self, event: NormalizedEvent) -> bool {
        // A full channel must not pin the task once the consumer is gone
        tokio::select! {
            sent = self.sender.send(event) => sent.is_ok(),
            _ = self.monitor.gone() => false,
        }
    }
}

/// Decoder, buffers and sink for one open response body
pub struct StreamSession {
    ctx: SessionContext,
    api_key: SecretString,
    decoder: StreamDecoder,
    normalizer: EventNormalizer,
    sink: EventSink,
    chunks: usize,
}

impl StreamSession {
    pub fn new(ctx: SessionContext, api_key: SecretString, sink: EventSink) -> Self {
        Self {
            decoder: StreamDecoder::new(ctx.provider),
            ctx,
            api_key,
            normalizer: EventNormalizer::new(),
            sink,
            chunks: 0,
        }
    }

    /// Number of body chunks read so far
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    /// Read `body` to completion, cancellation or failure
    pub async fn drive<S, E>(&mut self, mut body: S) -> Outcome
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: Display,
    {
        loop {
            if !self.sink.monitor().is_live() {
                return self.cancelled();
            }

            let monitor = self.sink.monitor().clone();
            let read = tokio::select! {
                biased;
                _ = monitor.gone() => None,
                item = body.next() => Some(item),
            };

            // A read that resolved after cancellation is discarded
            let Some(item) = read.filter(|_| monitor.is_live()) else {
                return self.cancelled();
            };

            match item {
                Some(Ok(chunk)) => {
                    self.chunks += 1;
                    let steps = self.decoder.feed(&chunk);
                    if let Some(outcome) = self.apply_all(steps).await {
                        return outcome;
                    }
                }
                Some(Err(e)) => {
                    return self
                        .fail(GatewayError::TransportFailure {
                            status: None,
                            message: format!("Stream read failed: {}", e),
                        })
                        .await;
                }
                None => {
                    let steps = self.decoder.finish();
                    if let Some(outcome) = self.apply_all(steps).await {
                        return outcome;
                    }
                    return self.complete().await;
                }
            }
        }
    }

    async fn apply_all(&mut self, steps: Vec<DecodeStep>) -> Option<Outcome> {
        for step in steps {
            let event = match step {
                Ok(event) => event,
                Err(fault) => {
                    self.ctx
                        .log_decode_fault(&redact(&fault.line, &self.api_key), &fault.reason);
                    record_decode_fault(self.ctx.provider.slug());
                    continue;
                }
            };

            match self.normalizer.apply(event) {
                Normalized::Delta(event) => {
                    if !self.sink.emit(event).await {
                        return Some(self.cancelled());
                    }
                }
                Normalized::Skip => {}
                Normalized::End => return Some(self.complete().await),
                Normalized::Fail(err) => return Some(self.fail(err).await),
            }
        }
        None
    }

    async fn complete(&mut self) -> Outcome {
        match self.normalizer.finish() {
            Ok(text) => {
                if self.sink.finish(NormalizedEvent::Done(text)).await {
                    Outcome::Done
                } else {
                    self.cancelled()
                }
            }
            Err(err) => self.fail(err).await,
        }
    }

    /// Emit `err` as the terminal event, redacted
    pub async fn fail(&mut self, err: GatewayError) -> Outcome {
        let message = redact(&err.to_string(), &self.api_key);
        self.ctx.log_error(err.kind(), &message);

        if self.sink.finish(NormalizedEvent::Error(message)).await {
            Outcome::Failed(err.kind())
        } else {
            self.cancelled()
        }
    }

    fn cancelled(&self) -> Outcome {
        self.ctx.log_cancelled();
        Outcome::Cancelled
    }
}
