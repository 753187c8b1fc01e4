//! Booking run configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::backoff::{DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_WAIT, DEFAULT_MIN_WAIT};
use crate::core::booking_manager::{DEFAULT_MAX_SESSION_REBUILDS, DEFAULT_NOTIFY_REPEAT};
use crate::core::diagnostics::DEFAULT_SNAPSHOT_EVERY;
use crate::core::{AppResult, DiagnosticSchedule, RetryPolicy};

/// Tunables for one booking run. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Polling attempts before giving up.
    pub max_attempts: u32,
    /// Shortest wait between attempts, in seconds.
    pub min_wait_secs: u64,
    /// Longest wait between attempts, in seconds.
    pub max_wait_secs: u64,
    /// Periodic snapshot cadence in attempts (0 disables).
    pub snapshot_every: u32,
    /// How many times the booked alert is repeated.
    pub notify_repeat: u32,
    /// Session rebuilds allowed while checking for an existing reservation.
    pub max_session_rebuilds: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_wait_secs: DEFAULT_MIN_WAIT.as_secs(),
            max_wait_secs: DEFAULT_MAX_WAIT.as_secs(),
            snapshot_every: DEFAULT_SNAPSHOT_EVERY,
            notify_repeat: DEFAULT_NOTIFY_REPEAT,
            max_session_rebuilds: DEFAULT_MAX_SESSION_REBUILDS,
        }
    }
}

impl BookingConfig {
    /// Validate configuration values through the retry policy they describe.
    pub fn validate(&self) -> Result<(), String> {
        self.retry_policy().validate()
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading booking config {}", path.display()))?;
        Self::from_json_str(&raw)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid booking config {}", path.display()))
    }

    /// Retry policy described by this configuration.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_secs(self.min_wait_secs),
            Duration::from_secs(self.max_wait_secs),
        )
    }

    /// Snapshot schedule described by this configuration.
    #[must_use]
    pub const fn schedule(&self) -> DiagnosticSchedule {
        DiagnosticSchedule::new(self.snapshot_every)
    }
}
