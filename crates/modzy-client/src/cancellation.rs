//! Cooperative cancellation for client operations.
//!
//! Cancelling drops the token's channel sender, which disconnects the shared
//! receiver. A blocking waiter can therefore `select!` on [`CancellationToken::signal`]
//! next to a timer and wake up as soon as any clone of the token is cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam::channel::{self, Receiver, Sender};

/// Cancellation token passed to every client operation
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    trigger: Arc<Mutex<Option<Sender<()>>>>,
    signal: Receiver<()>,
}

impl CancellationToken {
    /// Create a new cancellation token
    pub fn new() -> Self {
        let (trigger, signal) = channel::bounded(0);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            trigger: Arc::new(Mutex::new(Some(trigger))),
            signal,
        }
    }

    /// Cancel every operation observing this token or one of its clones.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let mut trigger = self
            .trigger
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        trigger.take();
    }

    /// Check if cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Receiver that becomes ready (disconnected) once the token is cancelled.
    /// Nothing is ever sent on it.
    pub fn signal(&self) -> &Receiver<()> {
        &self.signal
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
