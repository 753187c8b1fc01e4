//! Assemble a [`BookingManager`] from a [`BookingConfig`].

use crate::config::BookingConfig;
use crate::core::{
    AuditSink, BookingError, BookingManager, Interrupt, NotificationSink, RetryPolicy,
    SessionFactory, Sleeper,
};
use crate::runtime::TokioSleeper;

/// Builder that applies configuration to a manager and its collaborators.
pub struct ManagerBuilder<Z = TokioSleeper> {
    config: BookingConfig,
    sleeper: Z,
    interrupt: Option<Interrupt>,
    audit: Option<Box<dyn AuditSink>>,
}

impl ManagerBuilder<TokioSleeper> {
    /// Start from a configuration; waits use the tokio timer.
    #[must_use]
    pub fn new(config: BookingConfig) -> Self {
        Self {
            config,
            sleeper: TokioSleeper,
            interrupt: None,
            audit: None,
        }
    }
}

impl<Z: Sleeper> ManagerBuilder<Z> {
    /// Configuration being applied.
    #[must_use]
    pub const fn config(&self) -> &BookingConfig {
        &self.config
    }

    /// Retry policy the built manager should be run with.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.config.retry_policy()
    }

    /// Replace the sleeper.
    pub fn sleeper<Z2: Sleeper>(self, sleeper: Z2) -> ManagerBuilder<Z2> {
        ManagerBuilder {
            config: self.config,
            sleeper,
            interrupt: self.interrupt,
            audit: self.audit,
        }
    }

    /// Share an interrupt with the built manager.
    #[must_use]
    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Validate the configuration and build the manager.
    pub fn build<F, N>(self, factory: F, notifier: N) -> Result<BookingManager<F, N, Z>, BookingError>
    where
        F: SessionFactory,
        N: NotificationSink,
    {
        self.config.validate().map_err(BookingError::Config)?;

        let mut manager = BookingManager::with_sleeper(factory, notifier, self.sleeper)
            .with_schedule(self.config.schedule())
            .with_notify_repeat(self.config.notify_repeat)
            .with_max_session_rebuilds(self.config.max_session_rebuilds);
        if let Some(interrupt) = self.interrupt {
            manager = manager.with_interrupt(interrupt);
        }
        if let Some(audit) = self.audit {
            manager = manager.with_audit(audit);
        }
        Ok(manager)
    }
}
