//! In-memory notification sink.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{BookingError, ExhaustionSummary, FailureContext, NotificationSink, Reservation};

/// One delivered notification.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    /// A slot was booked.
    Booked {
        /// The reservation.
        reservation: Reservation,
        /// Requested alert repetitions.
        repeat_count: u32,
    },
    /// A reservation already existed.
    AlreadyReserved(Reservation),
    /// Attempts ran out.
    Exhausted(ExhaustionSummary),
    /// The run failed.
    Failed {
        /// The error.
        error: BookingError,
        /// Where it happened.
        context: FailureContext,
    },
}

/// Records notifications for later inspection. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifier {
    events: Arc<Mutex<Vec<NotificationEvent>>>,
}

impl InMemoryNotifier {
    /// Create an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of delivered events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().clone()
    }

    /// Reservations delivered through `booked`.
    #[must_use]
    pub fn booked_reservations(&self) -> Vec<Reservation> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                NotificationEvent::Booked { reservation, .. } => Some(reservation.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: NotificationEvent) {
        self.events.lock().push(event);
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotifier {
    async fn booked(&self, reservation: &Reservation, repeat_count: u32) {
        self.push(NotificationEvent::Booked {
            reservation: reservation.clone(),
            repeat_count,
        });
    }

    async fn already_reserved(&self, reservation: &Reservation) {
        self.push(NotificationEvent::AlreadyReserved(reservation.clone()));
    }

    async fn exhausted(&self, summary: &ExhaustionSummary) {
        self.push(NotificationEvent::Exhausted(*summary));
    }

    async fn failed(&self, error: &BookingError, context: &FailureContext) {
        self.push(NotificationEvent::Failed {
            error: error.clone(),
            context: context.clone(),
        });
    }
}
