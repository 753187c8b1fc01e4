//! Failure classification and session replacement.
//!
//! Only failures that mean "the browsing context is gone" are recoverable.
//! Everything else, including anything a source could not categorize, ends
//! the run so that real faults are never masked by a retry.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Credentials;
use crate::core::{BookingError, BookingPhase, SessionFactory, SlotSource, SourceError, SourceErrorKind};

/// Recovery decision for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// Replace the session and keep polling.
    Recoverable,
    /// Snapshot, report and stop.
    Fatal,
}

/// Classify a source failure by its kind alone.
#[must_use]
pub const fn classify(err: &SourceError) -> FailureClass {
    match err.kind {
        SourceErrorKind::StaleSession | SourceErrorKind::NavigationTimeout => {
            FailureClass::Recoverable
        }
        SourceErrorKind::Auth | SourceErrorKind::Submission | SourceErrorKind::Unknown => {
            FailureClass::Fatal
        }
    }
}

/// Classify a failure raised while the run was in `phase`.
///
/// Opening, authenticating and submitting are never retried, whatever the kind.
#[must_use]
pub const fn classify_in(phase: BookingPhase, err: &SourceError) -> FailureClass {
    match phase {
        BookingPhase::Start | BookingPhase::Authenticate | BookingPhase::Submit => {
            FailureClass::Fatal
        }
        _ => classify(err),
    }
}

/// Whether a session can still be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionValidity {
    /// Usable.
    Valid,
    /// Its context has been invalidated; it must be replaced.
    Invalid,
}

/// The single live session, tagged with its generation.
#[derive(Debug)]
pub struct LiveSession<S> {
    source: S,
    generation: u32,
    validity: SessionValidity,
}

impl<S: SlotSource> LiveSession<S> {
    /// Wrap a freshly opened session.
    pub const fn new(source: S, generation: u32) -> Self {
        Self {
            source,
            generation,
            validity: SessionValidity::Valid,
        }
    }

    /// 1 for the first session, incremented on every replacement.
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Current validity.
    pub const fn validity(&self) -> SessionValidity {
        self.validity
    }

    /// Mark the session unusable.
    pub fn invalidate(&mut self) {
        self.validity = SessionValidity::Invalid;
    }

    /// Shared access to the source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Exclusive access to the source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Close and drop the session.
    pub async fn close(mut self) {
        debug!(generation = self.generation, "closing session");
        self.source.close().await;
    }
}

/// Opens sessions and replaces invalidated ones.
pub struct SessionRecovery<F> {
    factory: F,
    rebuilds: u32,
}

impl<F: SessionFactory> SessionRecovery<F> {
    /// Create a recovery helper around a session factory.
    pub const fn new(factory: F) -> Self {
        Self {
            factory,
            rebuilds: 0,
        }
    }

    /// Number of replacements performed (the initial open is not counted).
    pub const fn rebuilds(&self) -> u32 {
        self.rebuilds
    }

    /// Put a fresh session into `slot`, closing whatever was there first.
    ///
    /// The old session is closed and dropped before the new one is opened, so
    /// two sessions are never alive together. Whenever this future is dropped
    /// at an await point, every opened session is in `slot`, so closing the
    /// slot afterwards releases it. Sources must tolerate `close` being called
    /// again on a session whose close was interrupted.
    ///
    /// The new session is marked invalid until authentication succeeds (or
    /// immediately valid when no `credentials` are given); if authentication
    /// fails it stays in the slot, still invalid, so the caller can snapshot it.
    pub async fn replace(
        &mut self,
        slot: &mut Option<LiveSession<F::Session>>,
        credentials: Option<&Credentials>,
    ) -> Result<(), BookingError> {
        let generation = slot.as_ref().map_or(1, |s| s.generation() + 1);
        if let Some(old) = slot.as_mut() {
            debug!(generation = old.generation(), "closing session");
            old.source_mut().close().await;
            *slot = None;
            self.rebuilds += 1;
        }

        let source = self.factory.open().await.map_err(|e| {
            warn!(generation, error = %e, "failed to open session");
            BookingError::SessionUnavailable(e)
        })?;
        let fresh = slot.insert(LiveSession::new(source, generation));

        if let Some(credentials) = credentials {
            fresh.invalidate();
            if let Err(e) = fresh.source_mut().authenticate(credentials).await {
                warn!(generation, error = %e, "re-authentication failed");
                return Err(e.into());
            }
            fresh.validity = SessionValidity::Valid;
        }

        info!(generation, authenticated = credentials.is_some(), "session ready");
        Ok(())
    }
}
