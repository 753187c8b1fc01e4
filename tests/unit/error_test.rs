//! Tests for error types

use slot_booker::core::{BookingError, SourceError, SourceErrorKind};

#[test]
fn test_source_error_display() {
    let err = SourceError::stale_session("execution context was destroyed");
    assert_eq!(
        format!("{}", err),
        "stale_session: execution context was destroyed"
    );
}

#[test]
fn test_source_error_location() {
    let err = SourceError::navigation_timeout("30s elapsed").at("https://shop/slots");
    assert_eq!(err.kind, SourceErrorKind::NavigationTimeout);
    assert_eq!(err.location.as_deref(), Some("https://shop/slots"));
}

#[test]
fn test_conversion_follows_kind() {
    assert!(matches!(
        BookingError::from(SourceError::auth("bad password")),
        BookingError::Auth(_)
    ));
    assert!(matches!(
        BookingError::from(SourceError::navigation_timeout("slow")),
        BookingError::NavigationTimeout(_)
    ));
    assert!(matches!(
        BookingError::from(SourceError::stale_session("detached")),
        BookingError::StaleSession(_)
    ));
    assert!(matches!(
        BookingError::from(SourceError::submission("rejected")),
        BookingError::Submission(_)
    ));
    assert!(matches!(
        BookingError::from(SourceError::unknown("?")),
        BookingError::Unknown(_)
    ));
}

#[test]
fn test_submission_wraps_any_kind() {
    let err = BookingError::submission(SourceError::stale_session("detached"));
    assert!(matches!(err, BookingError::Submission(_)));
    assert_eq!(
        err.source_error().map(|e| e.kind),
        Some(SourceErrorKind::StaleSession)
    );
}

#[test]
fn test_booking_error_display() {
    assert_eq!(
        format!("{}", BookingError::Auth(SourceError::auth("locked"))),
        "authentication failed: auth: locked"
    );
    assert_eq!(format!("{}", BookingError::Cancelled), "booking run cancelled");
    assert_eq!(
        format!(
            "{}",
            BookingError::InterruptedDuringSubmit {
                candidate: "Sat 10:00".to_string()
            }
        ),
        "interrupted during submission of `Sat 10:00`"
    );
    assert_eq!(
        format!("{}", BookingError::Config("max_attempts must be greater than 0".into())),
        "configuration error: max_attempts must be greater than 0"
    );
}

#[test]
fn test_only_cancellation_is_not_fatal() {
    assert!(!BookingError::Cancelled.is_fatal());
    assert!(BookingError::InterruptedDuringSubmit {
        candidate: "x".into()
    }
    .is_fatal());
    assert!(BookingError::Config("bad".into()).is_fatal());
    assert!(BookingError::SessionUnavailable(SourceError::unknown("no browser")).is_fatal());
}
