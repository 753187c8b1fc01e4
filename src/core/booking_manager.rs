//! The booking loop.
//!
//! One [`BookingManager`] drives one run: open a session, short-circuit on an
//! existing reservation, authenticate, then poll the listing until a candidate
//! appears, attempts run out, or something fatal happens.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

use crate::config::Credentials;
use crate::core::{
    classify_in, Attempt, AttemptOutcome, AuditSink, BookingError, Candidate, DiagnosticSchedule,
    ExhaustionSummary, FailureClass, FailureContext, Interrupt, LiveSession, NotificationSink,
    Reservation, RetryPolicy, SessionFactory, SessionRecovery, SessionValidity, Sleeper,
    SlotSource, SnapshotLabel, SourceError,
};
use crate::runtime::TokioSleeper;
use crate::util::clock::now_ms;

/// Default number of times the booked alert is repeated.
pub const DEFAULT_NOTIFY_REPEAT: u32 = 6;
/// Default bound on session rebuilds before polling starts.
pub const DEFAULT_MAX_SESSION_REBUILDS: u32 = 3;

/// States of the booking state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingPhase {
    /// Opening the first session.
    Start,
    /// Looking for a reservation the account already holds.
    CheckExisting,
    /// Logging in.
    Authenticate,
    /// Listing candidates.
    Poll,
    /// Reserving the chosen candidate.
    Submit,
    /// Replacing an invalidated session.
    Recover,
    /// Terminal: booked.
    Success,
    /// Terminal: attempts used up.
    Exhausted,
    /// Terminal: failed.
    Fatal,
}

impl fmt::Display for BookingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::CheckExisting => "check_existing",
            Self::Authenticate => "authenticate",
            Self::Poll => "poll",
            Self::Submit => "submit",
            Self::Recover => "recover",
            Self::Success => "success",
            Self::Exhausted => "exhausted",
            Self::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// Everything known about a finished run.
#[derive(Debug)]
pub struct BookingRun {
    /// Identifier attached to every log line of the run.
    pub run_id: Uuid,
    /// `Some` when booked or already reserved, `None` when exhausted.
    pub outcome: Result<Option<Reservation>, BookingError>,
    /// True when the reservation predates the run.
    pub already_reserved: bool,
    /// Polling attempts consumed.
    pub attempts_used: u32,
    /// Session replacements performed.
    pub session_rebuilds: u32,
    /// Wall-clock duration.
    pub elapsed: Duration,
}

enum Terminal {
    Booked(Reservation),
    AlreadyReserved(Reservation),
    Exhausted,
}

struct RunState<S> {
    session: Option<LiveSession<S>>,
    attempt: u32,
    phase: BookingPhase,
    attempt_started_ms: Option<u128>,
    last_location: Option<String>,
}

impl<S: SlotSource> RunState<S> {
    const fn new() -> Self {
        Self {
            session: None,
            attempt: 0,
            phase: BookingPhase::Start,
            attempt_started_ms: None,
            last_location: None,
        }
    }

    /// The current session, if it is still usable.
    fn live_mut(&mut self) -> Result<&mut S, BookingError> {
        match self.session.as_mut() {
            Some(session) if session.validity() == SessionValidity::Valid => {
                Ok(session.source_mut())
            }
            Some(session) => Err(BookingError::SessionUnavailable(SourceError::stale_session(
                format!("session generation {} was invalidated", session.generation()),
            ))),
            None => Err(BookingError::SessionUnavailable(SourceError::unknown(
                "no live session",
            ))),
        }
    }

    fn generation(&self) -> u32 {
        self.session.as_ref().map_or(0, LiveSession::generation)
    }

    fn begin_attempt(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt_started_ms = Some(now_ms());
        self.phase = BookingPhase::Poll;
        self.attempt
    }

    fn finish_attempt(&mut self, outcome: AttemptOutcome) -> Option<Attempt> {
        self.attempt_started_ms
            .take()
            .map(|started| Attempt::new(self.attempt, started, outcome))
    }

    fn note_failure(&mut self, err: &SourceError) {
        self.last_location = err
            .location
            .clone()
            .or_else(|| self.session.as_ref().and_then(|s| s.source().location()));
    }

    async fn snapshot(&mut self, label: SnapshotLabel) {
        if let Some(session) = self.session.as_mut() {
            debug!(%label, generation = session.generation(), "capturing snapshot");
            session.source_mut().capture_snapshot(&label).await;
        }
    }

    /// Snapshot and invalidate the session after a recoverable failure.
    async fn absorb(&mut self, err: &SourceError) {
        warn!(
            attempt = self.attempt,
            generation = self.generation(),
            error = %err,
            "session invalidated"
        );
        self.note_failure(err);
        if let Some(session) = self.session.as_mut() {
            session.invalidate();
        }
        self.snapshot(SnapshotLabel::recoverable(self.attempt)).await;
    }

    fn context(&self, phase: BookingPhase) -> FailureContext {
        FailureContext {
            phase,
            attempt: self.attempt,
            generation: self.generation(),
            location: self
                .last_location
                .clone()
                .or_else(|| self.session.as_ref().and_then(|s| s.source().location())),
        }
    }

    async fn close(&mut self) {
        if let Some(session) = self.session.take() {
            session.close().await;
        }
    }
}

async fn guarded<T>(interrupt: &Interrupt, fut: impl Future<Output = T>) -> Result<T, BookingError> {
    tokio::select! {
        biased;
        () = interrupt.triggered() => Err(BookingError::Cancelled),
        value = fut => Ok(value),
    }
}

async fn refresh_listing<S: SlotSource>(source: &mut S) -> Result<Vec<Candidate>, SourceError> {
    source.navigate_to_listing().await?;
    source.list_candidates().await
}

/// Orchestrates polling, backoff, recovery and termination for one run.
pub struct BookingManager<F, N, Z = TokioSleeper>
where
    F: SessionFactory,
{
    recovery: SessionRecovery<F>,
    notifier: N,
    sleeper: Z,
    schedule: DiagnosticSchedule,
    notify_repeat: u32,
    max_session_rebuilds: u32,
    interrupt: Interrupt,
    audit: Option<Box<dyn AuditSink>>,
}

impl<F, N> BookingManager<F, N, TokioSleeper>
where
    F: SessionFactory,
    N: NotificationSink,
{
    /// Create a manager that waits on the tokio timer.
    pub fn new(factory: F, notifier: N) -> Self {
        Self::with_sleeper(factory, notifier, TokioSleeper)
    }
}

impl<F, N, Z> BookingManager<F, N, Z>
where
    F: SessionFactory,
    N: NotificationSink,
    Z: Sleeper,
{
    /// Create a manager with a custom sleeper.
    pub fn with_sleeper(factory: F, notifier: N, sleeper: Z) -> Self {
        Self {
            recovery: SessionRecovery::new(factory),
            notifier,
            sleeper,
            schedule: DiagnosticSchedule::default(),
            notify_repeat: DEFAULT_NOTIFY_REPEAT,
            max_session_rebuilds: DEFAULT_MAX_SESSION_REBUILDS,
            interrupt: Interrupt::new(),
            audit: None,
        }
    }

    /// Override the periodic snapshot schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: DiagnosticSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// How many times the booked alert should be repeated.
    #[must_use]
    pub fn with_notify_repeat(mut self, repeat: u32) -> Self {
        self.notify_repeat = repeat;
        self
    }

    /// Bound session rebuilds while checking for an existing reservation.
    #[must_use]
    pub fn with_max_session_rebuilds(mut self, rebuilds: u32) -> Self {
        self.max_session_rebuilds = rebuilds;
        self
    }

    /// Use an externally owned interrupt.
    #[must_use]
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Handle that cancels this run when triggered.
    #[must_use]
    pub fn interrupt(&self) -> Interrupt {
        self.interrupt.clone()
    }

    /// Run to completion and return the reservation, if any.
    ///
    /// `Ok(None)` means every attempt came back empty.
    pub async fn run(
        self,
        policy: &RetryPolicy,
        credentials: &Credentials,
    ) -> Result<Option<Reservation>, BookingError> {
        self.execute(policy, credentials).await.outcome
    }

    /// Run to completion and return the outcome with run statistics.
    pub async fn execute(self, policy: &RetryPolicy, credentials: &Credentials) -> BookingRun {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "booking_run",
            %run_id,
            max_attempts = policy.max_attempts
        );
        self.execute_inner(run_id, policy, credentials)
            .instrument(span)
            .await
    }

    async fn execute_inner(
        mut self,
        run_id: Uuid,
        policy: &RetryPolicy,
        credentials: &Credentials,
    ) -> BookingRun {
        let started = Instant::now();
        let mut run = RunState::new();

        let result = match policy.validate().and_then(|()| credentials.validate()) {
            Ok(()) => self.drive(&mut run, policy, credentials).await,
            Err(msg) => Err(BookingError::Config(msg)),
        };
        let already_reserved = matches!(result, Ok(Terminal::AlreadyReserved(_)));
        let outcome = self.finish(&mut run, result, started).await;
        run.close().await;

        BookingRun {
            run_id,
            outcome,
            already_reserved,
            attempts_used: run.attempt,
            session_rebuilds: self.recovery.rebuilds(),
            elapsed: started.elapsed(),
        }
    }

    async fn drive(
        &mut self,
        run: &mut RunState<F::Session>,
        policy: &RetryPolicy,
        credentials: &Credentials,
    ) -> Result<Terminal, BookingError> {
        info!("starting booking run");
        guarded(&self.interrupt, self.recovery.replace(&mut run.session, None)).await??;

        run.phase = BookingPhase::CheckExisting;
        let mut rebuilds = 0;
        loop {
            let source = run.live_mut()?;
            match guarded(&self.interrupt, source.existing_reservation()).await? {
                Ok(Some(reservation)) => {
                    info!(slot = %reservation.label, "account already holds a reservation");
                    return Ok(Terminal::AlreadyReserved(reservation));
                }
                Ok(None) => break,
                Err(e) => {
                    if classify_in(run.phase, &e) == FailureClass::Fatal
                        || rebuilds >= self.max_session_rebuilds
                    {
                        run.note_failure(&e);
                        return Err(e.into());
                    }
                    rebuilds += 1;
                    run.absorb(&e).await;
                    guarded(&self.interrupt, self.recovery.replace(&mut run.session, None))
                        .await??;
                }
            }
        }

        run.phase = BookingPhase::Authenticate;
        let source = run.live_mut()?;
        if let Err(e) = guarded(&self.interrupt, source.authenticate(credentials)).await? {
            run.note_failure(&e);
            return Err(e.into());
        }
        info!(generation = run.generation(), "authenticated");

        let backoff = policy.backoff().map_err(BookingError::Config)?;
        loop {
            let attempt = run.begin_attempt();
            debug!(attempt, generation = run.generation(), "polling for candidates");
            if self.schedule.is_due(attempt) {
                run.snapshot(SnapshotLabel::cadence(attempt)).await;
            }

            let source = run.live_mut()?;
            let outcome = match guarded(&self.interrupt, refresh_listing(source)).await? {
                Ok(mut candidates) => {
                    let listed = candidates.len();
                    if let Some(candidate) = candidates.pop() {
                        drop(candidates);
                        info!(attempt, listed, slot = %candidate.label, "candidate found");
                        run.phase = BookingPhase::Submit;
                        let reservation = self.submit(run, candidate).await?;
                        run.snapshot(SnapshotLabel::booked()).await;
                        self.record(run.finish_attempt(AttemptOutcome::Booked));
                        return Ok(Terminal::Booked(reservation));
                    }
                    debug!(attempt, "no candidates available");
                    AttemptOutcome::NoneAvailable
                }
                Err(e) => {
                    if classify_in(run.phase, &e) == FailureClass::Fatal {
                        run.note_failure(&e);
                        return Err(e.into());
                    }
                    run.absorb(&e).await;
                    if attempt >= policy.max_attempts {
                        self.record(run.finish_attempt(AttemptOutcome::RecoverableError));
                        return Ok(Terminal::Exhausted);
                    }
                    run.phase = BookingPhase::Recover;
                    guarded(
                        &self.interrupt,
                        self.recovery.replace(&mut run.session, Some(credentials)),
                    )
                    .await??;
                    run.phase = BookingPhase::Poll;
                    AttemptOutcome::RecoverableError
                }
            };
            self.record(run.finish_attempt(outcome));

            if attempt >= policy.max_attempts {
                return Ok(Terminal::Exhausted);
            }

            let wait = backoff.next_delay();
            info!(
                attempt,
                outcome = %outcome,
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                "waiting before next attempt"
            );
            guarded(&self.interrupt, self.sleeper.sleep(wait)).await?;
        }
    }

    async fn submit(
        &self,
        run: &mut RunState<F::Session>,
        candidate: Candidate,
    ) -> Result<Reservation, BookingError> {
        if self.interrupt.is_triggered() {
            return Err(BookingError::Cancelled);
        }
        let label = candidate.label.clone();
        info!(attempt = run.attempt, slot = %label, "submitting reservation");
        let source = run.live_mut()?;
        let result = tokio::select! {
            biased;
            () = self.interrupt.triggered() => {
                return Err(BookingError::InterruptedDuringSubmit { candidate: label });
            }
            result = source.submit(candidate) => result,
        };
        result.map_err(|e| {
            run.note_failure(&e);
            BookingError::submission(e)
        })
    }

    fn record(&mut self, attempt: Option<Attempt>) {
        if let (Some(audit), Some(attempt)) = (self.audit.as_mut(), attempt) {
            audit.record(attempt);
        }
    }

    async fn finish(
        &mut self,
        run: &mut RunState<F::Session>,
        result: Result<Terminal, BookingError>,
        started: Instant,
    ) -> Result<Option<Reservation>, BookingError> {
        match result {
            Ok(Terminal::Booked(reservation)) => {
                run.phase = BookingPhase::Success;
                info!(
                    attempt = run.attempt,
                    slot = %reservation.label,
                    "slot booked"
                );
                self.notifier
                    .booked(&reservation, self.notify_repeat)
                    .await;
                Ok(Some(reservation))
            }
            Ok(Terminal::AlreadyReserved(reservation)) => {
                run.phase = BookingPhase::Success;
                self.notifier.already_reserved(&reservation).await;
                Ok(Some(reservation))
            }
            Ok(Terminal::Exhausted) => {
                run.phase = BookingPhase::Exhausted;
                let summary = ExhaustionSummary {
                    attempts_used: run.attempt,
                    elapsed_secs: started.elapsed().as_secs_f64(),
                };
                warn!(
                    attempts = summary.attempts_used,
                    elapsed_hours = %format!("{:.2}", summary.elapsed_hours()),
                    "no slots became available"
                );
                self.notifier.exhausted(&summary).await;
                Ok(None)
            }
            Err(BookingError::Cancelled) => {
                run.attempt_started_ms = None;
                info!(attempt = run.attempt, phase = %run.phase, "booking run cancelled");
                Err(BookingError::Cancelled)
            }
            Err(err) => {
                let failed_in = run.phase;
                run.phase = BookingPhase::Fatal;
                let label = match err {
                    BookingError::InterruptedDuringSubmit { .. } => SnapshotLabel::interrupted(),
                    _ => SnapshotLabel::fatal(),
                };
                run.snapshot(label).await;
                let attempt = run.finish_attempt(AttemptOutcome::FatalError);
                self.record(attempt);

                let context = run.context(failed_in);
                error!(
                    phase = %context.phase,
                    attempt = context.attempt,
                    location = context.location.as_deref().unwrap_or("unknown"),
                    error = %err,
                    "booking run failed"
                );
                self.notifier.failed(&err, &context).await;
                Err(err)
            }
        }
    }
}
