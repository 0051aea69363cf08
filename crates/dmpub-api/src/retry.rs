//! Backoff decisions for token negotiation.
//!
//! Pure policy, no I/O: the caller asks whether a failure is worth another
//! attempt and how long to wait, then performs the wait itself. The
//! schedule doubles from the initial delay with no jitter and no cap.

use std::time::Duration;

use crate::error::Error;

/// Retry budget and backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait before the first retry. Default: 3000 ms.
    pub initial_delay: Duration,
    /// Retries after the first attempt. Default: 2 (3 attempts total).
    pub max_retries: u32,
}

impl RetryPolicy {
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(3000);
    pub const DEFAULT_MAX_RETRIES: u32 = 2;

    pub fn new(initial_delay: Duration, max_retries: u32) -> Self {
        Self {
            initial_delay,
            max_retries,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, 0)
    }

    /// Total attempts this policy allows, including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Whether `error` warrants another attempt given the remaining budget.
    ///
    /// Only server-side transient failures (HTTP 5xx) qualify.
    pub fn should_retry(&self, error: &Error, attempts_remaining: u32) -> bool {
        attempts_remaining > 0 && error.is_transient()
    }

    /// The wait that follows `current`: twice as long.
    pub fn next_delay(&self, current: Duration) -> Duration {
        current.saturating_mul(2)
    }

    /// Every wait this policy can produce, in order.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> + '_ {
        std::iter::successors(Some(self.initial_delay), |d| Some(self.next_delay(*d)))
            .take(usize::try_from(self.max_retries).unwrap_or(usize::MAX))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_DELAY, Self::DEFAULT_MAX_RETRIES)
    }
}
