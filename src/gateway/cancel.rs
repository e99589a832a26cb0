//! Cancellation handles and session liveness
//!
//! A session is live until its consumer drops the event receiver or calls
//! [`CancelHandle::cancel`]. Cancellation is advisory: the session notices it
//! before and after each body read and then stops without a terminal event.

use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::types::NormalizedEvent;

/// A handle that can be used to request cancellation of one session.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Request cancellation. Dropping the upstream body closes the HTTP
    /// connection so the vendor stops generating tokens.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when cancellation is requested.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// Guard that cancels when dropped
    pub fn drop_guard(self) -> DropGuard {
        self.token.drop_guard()
    }
}

/// Liveness view of one session
#[derive(Clone, Debug)]
pub struct CancellationMonitor {
    handle: CancelHandle,
    sender: mpsc::Sender<NormalizedEvent>,
}

impl CancellationMonitor {
    pub fn new(handle: CancelHandle, sender: mpsc::Sender<NormalizedEvent>) -> Self {
        Self { handle, sender }
    }

    /// False once the consumer cancelled or went away
    pub fn is_live(&self) -> bool {
        !self.handle.is_cancelled() && !self.sender.is_closed()
    }

    /// Resolves when the session stops being live
    pub async fn gone(&self) {
        tokio::select! {
            _ = self.handle.cancelled() => {}
            _ = self.sender.closed() => {}
        }
    }
}
