//! Snapshot scheduling and naming.

use std::fmt;

use crate::util::clock::now_ms;

/// Default cadence: one snapshot every fifth attempt.
pub const DEFAULT_SNAPSHOT_EVERY: u32 = 5;

/// Why a snapshot is being taken. Renders as a file-name-safe label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotLabel {
    /// Periodic capture at a scheduled attempt.
    Cadence {
        /// Attempt index.
        attempt: u32,
    },
    /// Capture after a recoverable failure, before the session is replaced.
    Recoverable {
        /// Attempt index (0 before polling starts).
        attempt: u32,
        /// Capture time.
        at_ms: u128,
    },
    /// Capture after a fatal failure.
    Fatal {
        /// Capture time.
        at_ms: u128,
    },
    /// Capture after a successful booking.
    Booked {
        /// Capture time.
        at_ms: u128,
    },
    /// Capture after an interrupt landed during submission.
    Interrupted {
        /// Capture time.
        at_ms: u128,
    },
}

impl SnapshotLabel {
    /// Periodic label.
    #[must_use]
    pub const fn cadence(attempt: u32) -> Self {
        Self::Cadence { attempt }
    }

    /// Recoverable-failure label stamped now.
    #[must_use]
    pub fn recoverable(attempt: u32) -> Self {
        Self::Recoverable {
            attempt,
            at_ms: now_ms(),
        }
    }

    /// Fatal-failure label stamped now.
    #[must_use]
    pub fn fatal() -> Self {
        Self::Fatal { at_ms: now_ms() }
    }

    /// Success label stamped now.
    #[must_use]
    pub fn booked() -> Self {
        Self::Booked { at_ms: now_ms() }
    }

    /// Interrupt label stamped now.
    #[must_use]
    pub fn interrupted() -> Self {
        Self::Interrupted { at_ms: now_ms() }
    }

    /// Whether the snapshot documents a failure.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::Recoverable { .. } | Self::Fatal { .. } | Self::Interrupted { .. }
        )
    }
}

impl fmt::Display for SnapshotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cadence { attempt } => write!(f, "attempt-{attempt}"),
            Self::Recoverable { attempt, at_ms } => write!(f, "recoverable-{attempt}-{at_ms}"),
            Self::Fatal { at_ms } => write!(f, "error-{at_ms}"),
            Self::Booked { at_ms } => write!(f, "booking-{at_ms}"),
            Self::Interrupted { at_ms } => write!(f, "interrupted-{at_ms}"),
        }
    }
}

/// Fixed-cadence snapshot schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticSchedule {
    every: u32,
}

impl Default for DiagnosticSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_EVERY)
    }
}

impl DiagnosticSchedule {
    /// Snapshot every `every` attempts. Zero disables periodic snapshots.
    #[must_use]
    pub const fn new(every: u32) -> Self {
        Self { every }
    }

    /// Cadence in attempts.
    #[must_use]
    pub const fn every(&self) -> u32 {
        self.every
    }

    /// Whether a periodic snapshot is due at this attempt.
    #[must_use]
    pub const fn is_due(&self, attempt: u32) -> bool {
        self.every != 0 && attempt != 0 && attempt % self.every == 0
    }
}
