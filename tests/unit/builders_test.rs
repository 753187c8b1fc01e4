//! Tests for the manager builder

use std::time::Duration;

use slot_booker::builders::ManagerBuilder;
use slot_booker::config::{BookingConfig, Credentials};
use slot_booker::core::{BookingError, InMemoryAuditSink, Interrupt};
use slot_booker::infra::{InMemoryNotifier, NotificationEvent, ScriptedFactory};

fn quick_config() -> BookingConfig {
    BookingConfig {
        max_attempts: 4,
        min_wait_secs: 0,
        max_wait_secs: 0,
        snapshot_every: 2,
        notify_repeat: 3,
        max_session_rebuilds: 1,
    }
}

#[test]
fn test_builder_exposes_policy() {
    let builder = ManagerBuilder::new(quick_config());
    let policy = builder.retry_policy();
    assert_eq!(policy.max_attempts, 4);
    assert_eq!(policy.max_wait, Duration::ZERO);
    assert_eq!(builder.config().notify_repeat, 3);
}

#[test]
fn test_builder_rejects_invalid_config() {
    let config = BookingConfig {
        max_attempts: 0,
        ..quick_config()
    };
    let result = ManagerBuilder::new(config).build(ScriptedFactory::new(), InMemoryNotifier::new());
    assert!(matches!(result, Err(BookingError::Config(_))));
}

#[tokio::test]
async fn test_built_manager_applies_config() {
    let factory = ScriptedFactory::new().empty(3).offer(&["Mon 09:00"]);
    let notifier = InMemoryNotifier::new();
    let audit = InMemoryAuditSink::new(8);
    let builder = ManagerBuilder::new(quick_config())
        .interrupt(Interrupt::new())
        .audit(Box::new(audit.clone()));
    let policy = builder.retry_policy();
    let manager = builder
        .build(factory.clone(), notifier.clone())
        .expect("valid config");

    let reservation = manager
        .run(&policy, &Credentials::new("shopper", "secret"))
        .await
        .expect("ok")
        .expect("booked");

    assert_eq!(reservation.label, "Mon 09:00");
    assert_eq!(audit.attempts().len(), 4);
    let snapshots = factory.stats().snapshots;
    assert_eq!(snapshots[..2], ["attempt-2".to_string(), "attempt-4".to_string()]);
    assert!(matches!(
        notifier.events().as_slice(),
        [NotificationEvent::Booked { repeat_count: 3, .. }]
    ));
}
