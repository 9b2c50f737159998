//! Retry bookkeeping for the Overpass client.
//!
//! [`RetryPolicy`] is immutable configuration; [`RetryState`] tracks a single
//! `execute` call and decides after every failed attempt whether to try the
//! next mirror or give up.

use std::time::Duration;

use super::UpstreamError;

/// HTTP statuses that indicate a busy or unavailable mirror.
pub const RETRYABLE_STATUSES: [u16; 4] = [429, 502, 503, 504];

/// Attempt budget, backoff and mirror rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
    endpoint_count: usize,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` and `endpoint_count` are clamped to at
    /// least one.
    #[must_use]
    pub fn new(max_attempts: u32, backoff_base: Duration, endpoint_count: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
            endpoint_count: endpoint_count.max(1),
        }
    }

    /// Total attempts allowed per call.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Index of the mirror used for zero-based `attempt`.
    #[must_use]
    pub fn endpoint_for(&self, attempt: u32) -> usize {
        usize::try_from(attempt).map_or(0, |attempt| attempt % self.endpoint_count)
    }

    /// Delay after the `attempt_number`-th failure (one-based); linear, no
    /// jitter.
    #[must_use]
    pub fn backoff_for(&self, attempt_number: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt_number)
    }

    /// Begin tracking a new call.
    #[must_use]
    pub const fn start(&self) -> RetryState {
        RetryState {
            policy: *self,
            attempt: 0,
        }
    }
}

/// What the client should do after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for `delay`, then run zero-based attempt `next_attempt`.
    Retry {
        /// Backoff before the next attempt.
        delay: Duration,
        /// Zero-based index of the next attempt.
        next_attempt: u32,
    },
    /// Stop and return the error to the caller.
    Fail(UpstreamError),
}

/// Progress of one `execute` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    policy: RetryPolicy,
    attempt: u32,
}

impl RetryState {
    /// Zero-based index of the current attempt.
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Mirror index for the current attempt.
    #[must_use]
    pub fn endpoint(&self) -> usize {
        self.policy.endpoint_for(self.attempt)
    }

    /// Record a failed attempt and decide what happens next.
    ///
    /// Non-retryable errors fail immediately. Once the attempt budget is
    /// spent the last error is logged and replaced by
    /// [`UpstreamError::Exhausted`].
    pub fn on_failure(&mut self, error: UpstreamError) -> RetryDecision {
        if !error.is_retryable() {
            return RetryDecision::Fail(error);
        }
        let attempts_made = self.attempt.saturating_add(1);
        if attempts_made >= self.policy.max_attempts {
            log::error!("Overpass failed after {attempts_made} attempts; last error: {error}");
            return RetryDecision::Fail(UpstreamError::Exhausted {
                attempts: attempts_made,
            });
        }
        self.attempt = attempts_made;
        RetryDecision::Retry {
            delay: self.policy.backoff_for(attempts_made),
            next_attempt: attempts_made,
        }
    }
}
