//! Booking orchestration: the state machine and the contracts it drives.

pub mod audit;
pub mod backoff;
pub mod booking_manager;
pub mod diagnostics;
pub mod error;
pub mod interrupt;
pub mod notify;
pub mod recovery;
pub mod sleeper;
pub mod slot_source;

pub use audit::{Attempt, AttemptOutcome, AuditSink, InMemoryAuditSink};
pub use backoff::{BackoffPolicy, RetryPolicy};
pub use booking_manager::{BookingManager, BookingPhase, BookingRun};
pub use diagnostics::{DiagnosticSchedule, SnapshotLabel};
pub use error::{AppResult, BookingError, SourceError, SourceErrorKind};
pub use interrupt::Interrupt;
pub use notify::{ExhaustionSummary, FailureContext, NotificationSink};
pub use recovery::{
    classify, classify_in, FailureClass, LiveSession, SessionRecovery, SessionValidity,
};
pub use sleeper::Sleeper;
pub use slot_source::{Candidate, CandidateHandle, Reservation, SessionFactory, SlotSource};
