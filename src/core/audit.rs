//! Attempt audit trail.
//!
//! Every polling cycle produces one [`Attempt`]; sinks decide where it goes.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// How one polling cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// A candidate was reserved.
    Booked,
    /// The listing was empty.
    NoneAvailable,
    /// The session was invalidated and rebuilt.
    RecoverableError,
    /// The run terminated with an error.
    FatalError,
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Booked => write!(f, "booked"),
            Self::NoneAvailable => write!(f, "none_available"),
            Self::RecoverableError => write!(f, "recoverable_error"),
            Self::FatalError => write!(f, "fatal_error"),
        }
    }
}

/// One polling cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    /// 1-based attempt index.
    pub index: u32,
    /// Start time (ms since epoch).
    pub started_at_ms: u128,
    /// How the cycle ended.
    pub outcome: AttemptOutcome,
}

impl Attempt {
    /// Build a record for an attempt that started at `started_at_ms`.
    #[must_use]
    pub const fn new(index: u32, started_at_ms: u128, outcome: AttemptOutcome) -> Self {
        Self {
            index,
            started_at_ms,
            outcome,
        }
    }
}

/// Audit sink abstraction.
pub trait AuditSink: Send + Sync {
    /// Record a finished attempt.
    fn record(&mut self, attempt: Attempt);
}

/// In-memory ring buffer of attempts. Clones share the same buffer.
#[derive(Debug, Clone)]
pub struct InMemoryAuditSink {
    attempts: Arc<Mutex<VecDeque<Attempt>>>,
    max_attempts: usize,
}

impl InMemoryAuditSink {
    /// Create a sink that keeps the most recent `max_attempts` records.
    #[must_use]
    pub fn new(max_attempts: usize) -> Self {
        Self {
            attempts: Arc::new(Mutex::new(VecDeque::with_capacity(max_attempts.min(1024)))),
            max_attempts,
        }
    }

    /// Snapshot of stored attempts, oldest first.
    #[must_use]
    pub fn attempts(&self) -> Vec<Attempt> {
        self.attempts.lock().iter().cloned().collect()
    }

    /// Number of stored attempts with the given outcome.
    #[must_use]
    pub fn count(&self, outcome: AttemptOutcome) -> usize {
        self.attempts
            .lock()
            .iter()
            .filter(|a| a.outcome == outcome)
            .count()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, attempt: Attempt) {
        if self.max_attempts == 0 {
            return;
        }
        let mut attempts = self.attempts.lock();
        if attempts.len() >= self.max_attempts {
            attempts.pop_front();
        }
        attempts.push_back(attempt);
    }
}
