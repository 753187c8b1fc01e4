//! Slot-source capability interface and the values that cross it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Credentials;
use crate::core::{SnapshotLabel, SourceError};
use crate::util::clock::now_ms;

/// Opaque token a source uses to find a candidate again on submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateHandle(pub String);

/// A reservable unit surfaced by one listing.
///
/// Candidates are moved into [`SlotSource::submit`], so the orchestrator never
/// holds more than one and never reuses one across attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Human-readable label, e.g. `"Sat 18 Apr 10:00-11:00"`.
    pub label: String,
    /// Source-specific submission handle.
    pub handle: CandidateHandle,
}

impl Candidate {
    /// Create a candidate.
    pub fn new(label: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            handle: CandidateHandle(handle.into()),
        }
    }
}

/// A confirmed reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Label of the reserved slot.
    pub label: String,
    /// Extra confirmation text, if the source reports any.
    pub details: Option<String>,
    /// When the reservation was observed (ms since epoch).
    pub reserved_at_ms: u128,
}

impl Reservation {
    /// Create a reservation stamped with the current time.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            details: None,
            reserved_at_ms: now_ms(),
        }
    }

    /// Attach confirmation details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Operations available on one live session of a target site.
///
/// Implementations carry the site-specific scraping. Every failure must be
/// tagged with a [`crate::core::SourceErrorKind`].
#[async_trait]
pub trait SlotSource: Send {
    /// Log in. Called once per session before any polling.
    async fn authenticate(&mut self, credentials: &Credentials) -> Result<(), SourceError>;

    /// Load (or reload) the listing page.
    async fn navigate_to_listing(&mut self) -> Result<(), SourceError>;

    /// Report a reservation that already exists for this account.
    async fn existing_reservation(&mut self) -> Result<Option<Reservation>, SourceError>;

    /// List the candidates currently visible, in listing order.
    async fn list_candidates(&mut self) -> Result<Vec<Candidate>, SourceError>;

    /// Reserve the candidate.
    async fn submit(&mut self, candidate: Candidate) -> Result<Reservation, SourceError>;

    /// Capture a diagnostic snapshot. Best-effort: failures are swallowed by the source.
    async fn capture_snapshot(&mut self, label: &SnapshotLabel);

    /// Last-known location, used as failure context.
    fn location(&self) -> Option<String> {
        None
    }

    /// Release the underlying browsing context.
    async fn close(&mut self) {}
}

/// Produces fresh, unauthenticated sessions.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Session type produced by this factory.
    type Session: SlotSource;

    /// Open a new session.
    async fn open(&self) -> Result<Self::Session, SourceError>;
}
