//! Serializable run reports for logs, dashboards and process exit codes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{BookingError, BookingRun, Reservation};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// A slot was booked by this run.
    Booked,
    /// The account already held a reservation.
    AlreadyReserved,
    /// No slot appeared within the attempt budget.
    Exhausted,
    /// A fatal error ended the run.
    Failed,
    /// The run was interrupted before anything was submitted.
    Cancelled,
}

/// Flat summary of a [`BookingRun`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier.
    pub run_id: Uuid,
    /// Outcome category.
    pub outcome: RunOutcome,
    /// The reservation, when there is one.
    pub reservation: Option<Reservation>,
    /// Attempts consumed.
    pub attempts_used: u32,
    /// Sessions replaced.
    pub session_rebuilds: u32,
    /// Wall-clock run time in seconds.
    pub elapsed_secs: f64,
    /// Error text for failed runs.
    pub error: Option<String>,
}

impl From<&BookingRun> for RunReport {
    fn from(run: &BookingRun) -> Self {
        let (outcome, reservation, error) = match &run.outcome {
            Ok(Some(r)) if run.already_reserved => (RunOutcome::AlreadyReserved, Some(r.clone()), None),
            Ok(Some(r)) => (RunOutcome::Booked, Some(r.clone()), None),
            Ok(None) => (RunOutcome::Exhausted, None, None),
            Err(BookingError::Cancelled) => (
                RunOutcome::Cancelled,
                None,
                Some(BookingError::Cancelled.to_string()),
            ),
            Err(e) => (RunOutcome::Failed, None, Some(e.to_string())),
        };
        Self {
            run_id: run.run_id,
            outcome,
            reservation,
            attempts_used: run.attempts_used,
            session_rebuilds: run.session_rebuilds,
            elapsed_secs: run.elapsed.as_secs_f64(),
            error,
        }
    }
}

impl RunReport {
    /// Serialize to a single JSON line.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Process exit code for a report: 0 unless the run failed or was cancelled.
#[must_use]
pub const fn exit_code(report: &RunReport) -> i32 {
    match report.outcome {
        RunOutcome::Booked | RunOutcome::AlreadyReserved | RunOutcome::Exhausted => 0,
        RunOutcome::Failed | RunOutcome::Cancelled => 1,
    }
}
