//! Tests for notification sinks

use slot_booker::core::{
    BookingError, BookingPhase, ExhaustionSummary, FailureContext, NotificationSink, Reservation,
    SourceError,
};
use slot_booker::infra::{InMemoryNotifier, NotificationEvent, TracingNotifier};

fn context() -> FailureContext {
    FailureContext {
        phase: BookingPhase::Poll,
        attempt: 4,
        generation: 2,
        location: Some("https://shop/slots".to_string()),
    }
}

#[tokio::test]
async fn test_in_memory_notifier_records_in_order() {
    let notifier = InMemoryNotifier::new();
    let reservation = Reservation::new("Sun 12:00");

    notifier.booked(&reservation, 6).await;
    notifier
        .exhausted(&ExhaustionSummary {
            attempts_used: 10,
            elapsed_secs: 7_200.0,
        })
        .await;
    notifier
        .failed(&BookingError::Unknown(SourceError::unknown("?")), &context())
        .await;

    let events = notifier.events();
    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], NotificationEvent::Booked { repeat_count: 6, .. }));
    assert!(matches!(&events[1], NotificationEvent::Exhausted(s) if s.attempts_used == 10));
    assert!(matches!(&events[2], NotificationEvent::Failed { context, .. } if context.attempt == 4));
    assert_eq!(notifier.booked_reservations(), vec![reservation]);
}

#[test]
fn test_exhaustion_hours() {
    let summary = ExhaustionSummary {
        attempts_used: 1000,
        elapsed_secs: 5_400.0,
    };
    assert!((summary.elapsed_hours() - 1.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_tracing_notifier_accepts_every_event() {
    let notifier = TracingNotifier;
    let reservation = Reservation::new("Sun 12:00").with_details("order 991");
    notifier.booked(&reservation, 2).await;
    notifier.already_reserved(&reservation).await;
    notifier
        .exhausted(&ExhaustionSummary {
            attempts_used: 1,
            elapsed_secs: 0.0,
        })
        .await;
    notifier.failed(&BookingError::Cancelled, &context()).await;
}
