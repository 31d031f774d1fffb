//! Backoff policies applied when the service answers with a retryable status.
//!
//! Only HTTP statuses are ever retried, see [`is_retryable`]. Requests that fail
//! before a status is received are never sent again.

use crate::constants::{RETRYABLE_STATUSES, THROTTLED_STATUS};
use std::fmt::Debug;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Check whether the given status is worth sending again.
pub fn is_retryable(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// RetryStrategy decides how long to wait before the next attempt.
///
/// A single strategy instance may be shared by many concurrent calls, so
/// implementations must be stateless or internally synchronized.
pub trait RetryStrategy: Debug + Send + Sync + 'static {
    /// Time to wait before retry number `retry` (starting at 0) of a call
    /// that was answered with `status`.
    fn wait_time(&self, retry: u32, status: u16) -> Duration;

    /// Max retries after the first attempt.
    fn max_retries(&self) -> u32;

    /// Change max retries for every call that uses this strategy from now on.
    fn set_max_retries(&self, max_retries: u32);
}

/// Doubles the delay for every retry: `initial * 2^retry`, capped by a max.
///
/// Throttled responses (429) follow their own curve.
#[derive(Debug)]
pub struct ExponentialRetryStrategy {
    max_retries: AtomicU32,
    initial_delay: Duration,
    initial_throttling_delay: Duration,
    max_delay: Duration,
    max_throttling_delay: Duration,
}

impl ExponentialRetryStrategy {
    /// Create a strategy that uses `initial_delay` for both curves and no cap.
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries: AtomicU32::new(max_retries),
            initial_delay,
            initial_throttling_delay: initial_delay,
            max_delay: Duration::MAX,
            max_throttling_delay: Duration::MAX,
        }
    }

    /// Use a different initial delay for throttled responses.
    pub fn with_initial_throttling_delay(mut self, delay: Duration) -> Self {
        self.initial_throttling_delay = delay;
        self
    }

    /// Cap the delay of non-throttled retries.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Cap the delay of throttled retries.
    pub fn with_max_throttling_delay(mut self, delay: Duration) -> Self {
        self.max_throttling_delay = delay;
        self
    }
}

fn exponential(initial: Duration, retry: u32) -> Duration {
    2u32.checked_pow(retry)
        .and_then(|factor| initial.checked_mul(factor))
        .unwrap_or(Duration::MAX)
}

impl RetryStrategy for ExponentialRetryStrategy {
    fn wait_time(&self, retry: u32, status: u16) -> Duration {
        if status == THROTTLED_STATUS {
            exponential(self.initial_throttling_delay, retry).min(self.max_throttling_delay)
        } else {
            exponential(self.initial_delay, retry).min(self.max_delay)
        }
    }

    fn max_retries(&self) -> u32 {
        self.max_retries.load(Ordering::Relaxed)
    }

    fn set_max_retries(&self, max_retries: u32) {
        self.max_retries.store(max_retries, Ordering::Relaxed);
    }
}

/// 3 retries, waiting 2s, 4s and 8s whatever the status.
#[derive(Debug)]
pub struct DefaultRetryStrategy(ExponentialRetryStrategy);

impl DefaultRetryStrategy {
    /// Default max retries.
    pub const MAX_RETRIES: u32 = 3;
    /// Default initial delay.
    pub const INITIAL_DELAY: Duration = Duration::from_millis(2000);
}

impl Default for DefaultRetryStrategy {
    fn default() -> Self {
        Self(ExponentialRetryStrategy::new(
            Self::MAX_RETRIES,
            Self::INITIAL_DELAY,
        ))
    }
}

impl RetryStrategy for DefaultRetryStrategy {
    fn wait_time(&self, retry: u32, status: u16) -> Duration {
        self.0.wait_time(retry, status)
    }

    fn max_retries(&self) -> u32 {
        self.0.max_retries()
    }

    fn set_max_retries(&self, max_retries: u32) {
        self.0.set_max_retries(max_retries)
    }
}
