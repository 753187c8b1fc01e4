//! Wait abstraction for backoff.

use std::time::Duration;

use async_trait::async_trait;

/// Suspends the run between attempts.
///
/// The production implementation is [`crate::runtime::TokioSleeper`]; tests
/// substitute one that records durations and returns immediately.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}
