//! Tokio timer implementation of [`Sleeper`].

use std::time::Duration;

use async_trait::async_trait;

use crate::core::Sleeper;

/// Sleeper backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
