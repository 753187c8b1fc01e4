//! Randomized inter-attempt backoff.
//!
//! Waits are drawn uniformly from a closed range instead of growing
//! exponentially: the polled resource refreshes on its own schedule, and a
//! fixed cadence is easy for it to spot.

use std::time::Duration;

use rand::Rng;

/// Default number of polling attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;
/// Default lower wait bound.
pub const DEFAULT_MIN_WAIT: Duration = Duration::from_secs(5);
/// Default upper wait bound.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(15);

/// Uniform random wait in `min..=max`, sampled at millisecond granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    min: Duration,
    max: Duration,
}

impl BackoffPolicy {
    /// Create a policy.
    ///
    /// This is the only place the wait range is checked: `min > max` is
    /// rejected here and by every validator built on it.
    pub fn new(min: Duration, max: Duration) -> Result<Self, String> {
        if min > max {
            return Err(format!(
                "min wait ({}ms) must not exceed max wait ({}ms)",
                min.as_millis(),
                max.as_millis()
            ));
        }
        Ok(Self { min, max })
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> Duration {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Draw a wait using the supplied RNG.
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let lo = u64::try_from(self.min.as_millis()).unwrap_or(u64::MAX);
        let hi = u64::try_from(self.max.as_millis()).unwrap_or(u64::MAX);
        if lo >= hi {
            return Duration::from_millis(lo);
        }
        Duration::from_millis(rng.random_range(lo..=hi))
    }

    /// Draw a wait using the thread-local RNG.
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        self.sample_with(&mut rand::rng())
    }
}

/// How long to keep polling and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum polling attempts before giving up.
    pub max_attempts: u32,
    /// Shortest wait between attempts.
    pub min_wait: Duration,
    /// Longest wait between attempts.
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::brisk()
    }
}

impl RetryPolicy {
    /// Create a policy with explicit values.
    #[must_use]
    pub const fn new(max_attempts: u32, min_wait: Duration, max_wait: Duration) -> Self {
        Self {
            max_attempts,
            min_wait,
            max_wait,
        }
    }

    /// 1000 attempts, 5-15s apart.
    #[must_use]
    pub const fn brisk() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_WAIT, DEFAULT_MAX_WAIT)
    }

    /// 480 attempts, 20-60s apart. Roughly an eight-hour horizon.
    #[must_use]
    pub const fn relaxed() -> Self {
        Self::new(480, Duration::from_secs(20), Duration::from_secs(60))
    }

    /// Backoff sampler for this policy. Fails on a reversed wait range.
    pub fn backoff(&self) -> Result<BackoffPolicy, String> {
        BackoffPolicy::new(self.min_wait, self.max_wait)
    }

    /// Upper bound on total waiting time across a full run.
    #[must_use]
    pub fn worst_case_wait(&self) -> Duration {
        self.max_wait
            .saturating_mul(self.max_attempts.saturating_sub(1))
    }

    /// Validate policy values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".into());
        }
        self.backoff().map(|_| ())
    }
}
