//! Notification sink that reports through `tracing`.

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::core::{BookingError, ExhaustionSummary, FailureContext, NotificationSink, Reservation};

/// Logs terminal outcomes. The booked alert is emitted `repeat_count` times
/// so it stands out in a long unattended log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl NotificationSink for TracingNotifier {
    async fn booked(&self, reservation: &Reservation, repeat_count: u32) {
        for alert in 1..=repeat_count.max(1) {
            info!(
                target: "slot_booker::alert",
                alert,
                slot = %reservation.label,
                details = reservation.details.as_deref().unwrap_or(""),
                "available slot found and booked"
            );
        }
    }

    async fn already_reserved(&self, reservation: &Reservation) {
        info!(
            target: "slot_booker::alert",
            slot = %reservation.label,
            "a slot is already booked for this account"
        );
    }

    async fn exhausted(&self, summary: &ExhaustionSummary) {
        warn!(
            target: "slot_booker::alert",
            attempts = summary.attempts_used,
            hours = %format!("{:.2}", summary.elapsed_hours()),
            "tried booking a slot, none became available"
        );
    }

    async fn failed(&self, err: &BookingError, context: &FailureContext) {
        error!(
            target: "slot_booker::alert",
            phase = %context.phase,
            attempt = context.attempt,
            generation = context.generation,
            location = context.location.as_deref().unwrap_or("unknown"),
            error = %err,
            "booking run failed"
        );
    }
}
