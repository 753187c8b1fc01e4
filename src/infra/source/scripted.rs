//! Deterministic, script-driven slot source.
//!
//! Each listing call consumes the next scripted step; once the script runs
//! out every listing is empty. All sessions opened by one factory share the
//! script and the counters, so a test can follow the run across recoveries.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::config::Credentials;
use crate::core::{
    Candidate, Reservation, SessionFactory, SlotSource, SnapshotLabel, SourceError,
};

/// Counters observed by a scripted factory and its sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptStats {
    /// Sessions opened.
    pub sessions_opened: u32,
    /// Sessions closed explicitly.
    pub sessions_closed: u32,
    /// Highest number of sessions alive at once.
    pub max_live_sessions: u32,
    /// Authentication calls.
    pub authentications: u32,
    /// Existing-reservation checks.
    pub existing_checks: u32,
    /// Listing navigations.
    pub navigations: u32,
    /// Candidate listings.
    pub listings: u32,
    /// Labels of submitted candidates, in order.
    pub submissions: Vec<String>,
    /// Rendered snapshot labels, in order.
    pub snapshots: Vec<String>,
}

#[derive(Debug, Default)]
struct ScriptState {
    listings: VecDeque<Result<Vec<Candidate>, SourceError>>,
    navigations: VecDeque<Result<(), SourceError>>,
    existing: VecDeque<Result<Option<Reservation>, SourceError>>,
    auth_results: VecDeque<Result<(), SourceError>>,
    open_error: Option<SourceError>,
    submit_error: Option<SourceError>,
    submit_delay: Option<Duration>,
    reauth_delay: Option<Duration>,
    listing_delay: Option<Duration>,
    location: Option<String>,
    live_sessions: u32,
    stats: ScriptStats,
}

/// Factory for [`ScriptedSource`] sessions. Clones share the script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFactory {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedFactory {
    /// Create a factory with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `count` empty listings.
    #[must_use]
    pub fn empty(self, count: usize) -> Self {
        {
            let mut state = self.state.lock();
            for _ in 0..count {
                state.listings.push_back(Ok(Vec::new()));
            }
        }
        self
    }

    /// Queue a listing showing these candidates, in order.
    #[must_use]
    pub fn offer(self, labels: &[&str]) -> Self {
        let candidates = labels
            .iter()
            .enumerate()
            .map(|(i, label)| Candidate::new(*label, format!("slot-{i}")))
            .collect();
        self.state.lock().listings.push_back(Ok(candidates));
        self
    }

    /// Queue a failing listing.
    #[must_use]
    pub fn fail(self, err: SourceError) -> Self {
        self.state.lock().listings.push_back(Err(err));
        self
    }

    /// Queue a failing navigation. Navigations without a queued result succeed.
    #[must_use]
    pub fn fail_navigation(self, err: SourceError) -> Self {
        self.state.lock().navigations.push_back(Err(err));
        self
    }

    /// Queue a result for the next existing-reservation check.
    #[must_use]
    pub fn existing(self, result: Result<Option<Reservation>, SourceError>) -> Self {
        self.state.lock().existing.push_back(result);
        self
    }

    /// Queue a result for the next authentication.
    #[must_use]
    pub fn auth_result(self, result: Result<(), SourceError>) -> Self {
        self.state.lock().auth_results.push_back(result);
        self
    }

    /// Make every open after the first fail. Set before the run starts.
    #[must_use]
    pub fn open_error(self, err: SourceError) -> Self {
        self.state.lock().open_error = Some(err);
        self
    }

    /// Make every submission fail.
    #[must_use]
    pub fn submit_error(self, err: SourceError) -> Self {
        self.state.lock().submit_error = Some(err);
        self
    }

    /// Delay every submission.
    #[must_use]
    pub fn submit_delay(self, delay: Duration) -> Self {
        self.state.lock().submit_delay = Some(delay);
        self
    }

    /// Delay every authentication after the first.
    #[must_use]
    pub fn reauth_delay(self, delay: Duration) -> Self {
        self.state.lock().reauth_delay = Some(delay);
        self
    }

    /// Delay every listing.
    #[must_use]
    pub fn listing_delay(self, delay: Duration) -> Self {
        self.state.lock().listing_delay = Some(delay);
        self
    }

    /// Location reported by sessions.
    #[must_use]
    pub fn location(self, location: impl Into<String>) -> Self {
        self.state.lock().location = Some(location.into());
        self
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> ScriptStats {
        self.state.lock().stats.clone()
    }
}

#[async_trait]
impl SessionFactory for ScriptedFactory {
    type Session = ScriptedSource;

    async fn open(&self) -> Result<Self::Session, SourceError> {
        let mut state = self.state.lock();
        if state.stats.sessions_opened > 0 {
            if let Some(err) = state.open_error.clone() {
                return Err(err);
            }
        }
        state.stats.sessions_opened += 1;
        state.live_sessions += 1;
        state.stats.max_live_sessions = state.stats.max_live_sessions.max(state.live_sessions);
        Ok(ScriptedSource {
            state: Arc::clone(&self.state),
            closed: false,
        })
    }
}

/// One session of a [`ScriptedFactory`].
#[derive(Debug)]
pub struct ScriptedSource {
    state: Arc<Mutex<ScriptState>>,
    closed: bool,
}

#[async_trait]
impl SlotSource for ScriptedSource {
    async fn authenticate(&mut self, _credentials: &Credentials) -> Result<(), SourceError> {
        let delay = {
            let state = self.state.lock();
            state.reauth_delay.filter(|_| state.stats.authentications > 0)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.lock();
        state.stats.authentications += 1;
        state.auth_results.pop_front().unwrap_or(Ok(()))
    }

    async fn navigate_to_listing(&mut self) -> Result<(), SourceError> {
        let mut state = self.state.lock();
        state.stats.navigations += 1;
        state.navigations.pop_front().unwrap_or(Ok(()))
    }

    async fn existing_reservation(&mut self) -> Result<Option<Reservation>, SourceError> {
        let mut state = self.state.lock();
        state.stats.existing_checks += 1;
        state.existing.pop_front().unwrap_or(Ok(None))
    }

    async fn list_candidates(&mut self) -> Result<Vec<Candidate>, SourceError> {
        let delay = self.state.lock().listing_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.lock();
        state.stats.listings += 1;
        state.listings.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn submit(&mut self, candidate: Candidate) -> Result<Reservation, SourceError> {
        let delay = self.state.lock().submit_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.lock();
        state.stats.submissions.push(candidate.label.clone());
        if let Some(err) = state.submit_error.clone() {
            return Err(err);
        }
        Ok(Reservation::new(candidate.label).with_details(candidate.handle.0))
    }

    async fn capture_snapshot(&mut self, label: &SnapshotLabel) {
        self.state.lock().stats.snapshots.push(label.to_string());
    }

    fn location(&self) -> Option<String> {
        self.state.lock().location.clone()
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let mut state = self.state.lock();
        state.stats.sessions_closed += 1;
        state.live_sessions = state.live_sessions.saturating_sub(1);
    }
}

impl Drop for ScriptedSource {
    fn drop(&mut self) {
        if !self.closed {
            let mut state = self.state.lock();
            state.live_sessions = state.live_sessions.saturating_sub(1);
        }
    }
}
