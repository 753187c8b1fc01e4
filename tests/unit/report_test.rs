//! Tests for run reports

use std::time::Duration;

use slot_booker::core::{BookingError, BookingRun, Reservation, SourceError};
use slot_booker::runtime::{exit_code, RunOutcome, RunReport};
use uuid::Uuid;

fn run(outcome: Result<Option<Reservation>, BookingError>, already_reserved: bool) -> BookingRun {
    BookingRun {
        run_id: Uuid::new_v4(),
        outcome,
        already_reserved,
        attempts_used: 3,
        session_rebuilds: 1,
        elapsed: Duration::from_millis(2_500),
    }
}

#[test]
fn test_booked_report() {
    let report = RunReport::from(&run(Ok(Some(Reservation::new("Sat 10:00"))), false));
    assert_eq!(report.outcome, RunOutcome::Booked);
    assert_eq!(report.reservation.map(|r| r.label).as_deref(), Some("Sat 10:00"));
    assert!(report.error.is_none());
    assert!((report.elapsed_secs - 2.5).abs() < f64::EPSILON);
}

#[test]
fn test_already_reserved_report() {
    let report = RunReport::from(&run(Ok(Some(Reservation::new("Sat 10:00"))), true));
    assert_eq!(report.outcome, RunOutcome::AlreadyReserved);
    assert_eq!(exit_code(&report), 0);
}

#[test]
fn test_exit_codes() {
    let exhausted = RunReport::from(&run(Ok(None), false));
    assert_eq!(exhausted.outcome, RunOutcome::Exhausted);
    assert_eq!(exit_code(&exhausted), 0);

    let failed = RunReport::from(&run(
        Err(BookingError::Submission(SourceError::submission("rejected"))),
        false,
    ));
    assert_eq!(failed.outcome, RunOutcome::Failed);
    assert_eq!(exit_code(&failed), 1);
    assert!(failed.error.as_deref().is_some_and(|e| e.contains("rejected")));

    let cancelled = RunReport::from(&run(Err(BookingError::Cancelled), false));
    assert_eq!(cancelled.outcome, RunOutcome::Cancelled);
    assert_eq!(exit_code(&cancelled), 1);
}

#[test]
fn test_report_json() {
    let report = RunReport::from(&run(Ok(None), false));
    let json: serde_json::Value =
        serde_json::from_str(&report.to_json().expect("serialize")).expect("parse");
    assert_eq!(json["outcome"], "exhausted");
    assert_eq!(json["attempts_used"], 3);
    assert_eq!(json["session_rebuilds"], 1);
}
