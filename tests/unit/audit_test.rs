//! Tests for audit sink

use slot_booker::core::{Attempt, AttemptOutcome, AuditSink, InMemoryAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    sink.record(Attempt::new(1, 1_000, AttemptOutcome::NoneAvailable));
    sink.record(Attempt::new(2, 2_000, AttemptOutcome::Booked));

    let attempts = sink.attempts();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].index, 1);
    assert_eq!(attempts[1].outcome, AttemptOutcome::Booked);
    assert_eq!(sink.count(AttemptOutcome::NoneAvailable), 1);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(Attempt::new(1, 1, AttemptOutcome::NoneAvailable));
    sink.record(Attempt::new(2, 2, AttemptOutcome::RecoverableError));
    sink.record(Attempt::new(3, 3, AttemptOutcome::NoneAvailable));

    let attempts = sink.attempts();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].index, 2); // oldest dropped
    assert_eq!(attempts[1].index, 3);
}

#[test]
fn test_zero_capacity_keeps_nothing() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(Attempt::new(1, 1, AttemptOutcome::FatalError));
    assert!(sink.attempts().is_empty());
}

#[test]
fn test_clones_share_buffer() {
    let sink = InMemoryAuditSink::new(4);
    let mut writer = sink.clone();
    writer.record(Attempt::new(1, 5, AttemptOutcome::Booked));
    assert_eq!(sink.attempts().len(), 1);
    assert_eq!(sink.attempts()[0].started_at_ms, 5);
}

#[test]
fn test_attempt_serialization() {
    let json = serde_json::to_value(Attempt::new(7, 42, AttemptOutcome::RecoverableError))
        .expect("serialize");
    assert_eq!(json["index"], 7);
    assert_eq!(json["outcome"], "recoverable_error");
    assert_eq!(AttemptOutcome::NoneAvailable.to_string(), "none_available");
}
