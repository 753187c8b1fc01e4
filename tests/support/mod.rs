//! Shared helpers for booking integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use slot_booker::config::Credentials;
use slot_booker::core::{BookingManager, RetryPolicy, Sleeper};
use slot_booker::infra::{InMemoryNotifier, ScriptedFactory};

/// Sleeper that records every requested wait and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().push(duration);
        tokio::task::yield_now().await;
    }
}

pub fn credentials() -> Credentials {
    Credentials::new("shopper@example.com", "correct horse battery staple")
}

pub fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts, Duration::from_secs(5), Duration::from_secs(15))
}

pub fn manager(
    factory: &ScriptedFactory,
) -> (
    BookingManager<ScriptedFactory, InMemoryNotifier, RecordingSleeper>,
    InMemoryNotifier,
    RecordingSleeper,
) {
    let notifier = InMemoryNotifier::new();
    let sleeper = RecordingSleeper::default();
    let manager = BookingManager::with_sleeper(factory.clone(), notifier.clone(), sleeper.clone());
    (manager, notifier, sleeper)
}
