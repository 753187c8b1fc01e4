//! Error types for slot-source operations and booking runs.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure signature reported by a slot source.
///
/// Sources tag every failure with a kind before it crosses into the
/// orchestrator, so classification never depends on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorKind {
    /// Credentials were rejected or the login flow failed.
    Auth,
    /// A navigation did not settle in time.
    NavigationTimeout,
    /// The browsing context was destroyed or went stale mid-operation.
    StaleSession,
    /// The reservation submission failed.
    Submission,
    /// Anything the source could not categorize.
    Unknown,
}

impl fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth => write!(f, "auth"),
            Self::NavigationTimeout => write!(f, "navigation_timeout"),
            Self::StaleSession => write!(f, "stale_session"),
            Self::Submission => write!(f, "submission"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Error raised at the slot-source boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct SourceError {
    /// Failure signature.
    pub kind: SourceErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Last-known location (URL or page name) when the failure happened.
    pub location: Option<String>,
}

impl SourceError {
    /// Create an error of the given kind.
    pub fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
        }
    }

    /// Attach the location the source was at.
    #[must_use]
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Shorthand for [`SourceErrorKind::Auth`].
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Auth, message)
    }

    /// Shorthand for [`SourceErrorKind::NavigationTimeout`].
    pub fn navigation_timeout(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::NavigationTimeout, message)
    }

    /// Shorthand for [`SourceErrorKind::StaleSession`].
    pub fn stale_session(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::StaleSession, message)
    }

    /// Shorthand for [`SourceErrorKind::Submission`].
    pub fn submission(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Submission, message)
    }

    /// Shorthand for [`SourceErrorKind::Unknown`].
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unknown, message)
    }
}

/// Errors that end a booking run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookingError {
    /// Authentication failed.
    #[error("authentication failed: {0}")]
    Auth(SourceError),
    /// Navigation timed out and could not be recovered.
    #[error("navigation timed out: {0}")]
    NavigationTimeout(SourceError),
    /// The session went stale and could not be recovered.
    #[error("stale session: {0}")]
    StaleSession(SourceError),
    /// Submitting the reservation failed. Never retried.
    #[error("submission failed: {0}")]
    Submission(SourceError),
    /// Unclassified source failure.
    #[error("unknown source error: {0}")]
    Unknown(SourceError),
    /// A fresh session could not be opened or rebuilt.
    #[error("session unavailable: {0}")]
    SessionUnavailable(SourceError),
    /// The run was interrupted at a safe suspension point.
    #[error("booking run cancelled")]
    Cancelled,
    /// The run was interrupted while a submission was in flight.
    #[error("interrupted during submission of `{candidate}`")]
    InterruptedDuringSubmit {
        /// Label of the candidate being submitted.
        candidate: String,
    },
    /// Invalid configuration or credentials.
    #[error("configuration error: {0}")]
    Config(String),
}

impl BookingError {
    /// Wrap any source error as a submission failure, whatever its kind.
    #[must_use]
    pub fn submission(err: SourceError) -> Self {
        Self::Submission(err)
    }

    /// Whether this error terminates the run with a failure indication.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// The underlying source error, if any.
    #[must_use]
    pub const fn source_error(&self) -> Option<&SourceError> {
        match self {
            Self::Auth(e)
            | Self::NavigationTimeout(e)
            | Self::StaleSession(e)
            | Self::Submission(e)
            | Self::Unknown(e)
            | Self::SessionUnavailable(e) => Some(e),
            Self::Cancelled | Self::InterruptedDuringSubmit { .. } | Self::Config(_) => None,
        }
    }
}

impl From<SourceError> for BookingError {
    fn from(err: SourceError) -> Self {
        match err.kind {
            SourceErrorKind::Auth => Self::Auth(err),
            SourceErrorKind::NavigationTimeout => Self::NavigationTimeout(err),
            SourceErrorKind::StaleSession => Self::StaleSession(err),
            SourceErrorKind::Submission => Self::Submission(err),
            SourceErrorKind::Unknown => Self::Unknown(err),
        }
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
