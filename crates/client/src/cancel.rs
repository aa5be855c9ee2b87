//! Cancellation token usable across async tasks.
//!
//! Responsibilities:
//! - Let the embedding process (Ctrl-C handler, deadline watchdog) stop a
//!   run; the runner checks and awaits the token at suspension points.
//!
//! Does NOT handle:
//! - Installing signal handlers; that stays with the binary.
//!
//! Invariants:
//! - Once canceled, a token stays canceled forever.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::Notify;

/// Lightweight clonable cancellation token.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    canceled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancellationToken {
    /// A new, non-canceled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token (idempotent).
    pub fn cancel(&self) {
        let was_canceled = self.canceled.swap(true, Ordering::SeqCst);
        if !was_canceled {
            self.notify.notify_waiters();
        }
    }

    /// True once cancellation has been requested.
    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }

    /// Await cancellation.
    ///
    /// The `notified()` future is created before the atomic check so a
    /// cancel between check and await cannot be missed.
    pub async fn canceled(&self) {
        let notified = self.notify.notified();
        if self.is_canceled() {
            return;
        }
        notified.await;
    }
}
