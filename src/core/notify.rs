//! Terminal-outcome notification contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{BookingError, BookingPhase, Reservation};

/// Reported when a run gives up without a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExhaustionSummary {
    /// Attempts consumed.
    pub attempts_used: u32,
    /// Wall-clock run time in seconds.
    pub elapsed_secs: f64,
}

impl ExhaustionSummary {
    /// Elapsed time in hours, the unit users usually think in for these runs.
    #[must_use]
    pub fn elapsed_hours(&self) -> f64 {
        self.elapsed_secs / 3600.0
    }
}

/// Where a fatal error happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureContext {
    /// State-machine phase at the time of failure.
    pub phase: BookingPhase,
    /// Attempt index (0 before polling starts).
    pub attempt: u32,
    /// Session generation (0 if no session was open).
    pub generation: u32,
    /// Last-known source location.
    pub location: Option<String>,
}

/// Receives the terminal outcome of a run. Calls are fire-and-forget.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// A reservation was made. `repeat_count` is how many times to repeat the alert.
    async fn booked(&self, reservation: &Reservation, repeat_count: u32);

    /// The account already held a reservation; no polling happened.
    async fn already_reserved(&self, reservation: &Reservation);

    /// Attempts ran out.
    async fn exhausted(&self, summary: &ExhaustionSummary);

    /// The run failed fatally.
    async fn failed(&self, error: &BookingError, context: &FailureContext);
}
