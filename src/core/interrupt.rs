//! External cancellation of a run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct InterruptState {
    fired: AtomicBool,
    notify: Notify,
}

/// Cloneable one-shot interrupt. Once triggered it stays triggered.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    inner: Arc<InterruptState>,
}

impl Interrupt {
    /// Create an untriggered interrupt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the interrupt and wake every waiter.
    pub fn trigger(&self) {
        self.inner.fired.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    /// Whether the interrupt has fired.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.inner.fired.load(Ordering::Acquire)
    }

    /// Resolve once the interrupt has fired.
    pub async fn triggered(&self) {
        loop {
            // Register before checking the flag so a concurrent trigger is not missed.
            let notified = self.inner.notify.notified();
            if self.is_triggered() {
                return;
            }
            notified.await;
        }
    }
}
