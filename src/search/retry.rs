// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounded retry with exponential backoff
//!
//! Used at the network boundary only. Parsing is deterministic for a given
//! page and is never retried.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Retry policy for one logical operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (at least 1)
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Growth factor applied per retry
    pub backoff_multiplier: f64,
    /// Cap on any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            ..Self::default()
        }
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Effective attempt count; a zero policy still runs the operation once
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay between attempt `attempt` and `attempt + 1` (0-indexed):
    /// `min(base_delay * multiplier^attempt, max_delay)`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let millis = self.base_delay.as_secs_f64() * 1000.0 * self.backoff_multiplier.powi(exponent);
        if !millis.is_finite() || millis < 0.0 {
            return self.max_delay;
        }
        Duration::from_secs_f64(millis / 1000.0).min(self.max_delay)
    }
}

/// Run `operation` until it succeeds or the policy's attempts are exhausted
///
/// Retries unconditionally. `on_retry` receives the 1-based number of the
/// failed attempt and its error before the backoff sleep; it only observes.
/// When every attempt fails the last error is returned.
pub async fn retry_with_backoff<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    operation: F,
    on_retry: R,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    R: FnMut(u32, &E),
{
    run(policy, operation, |_: &E| true, on_retry).await
}

/// Like [`retry_with_backoff`], but an error rejected by `should_retry` is
/// returned immediately: no delay, no observer call, no further attempts.
pub async fn retry_if<T, E, F, Fut, P, R>(
    policy: &RetryPolicy,
    operation: F,
    should_retry: P,
    on_retry: R,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: FnMut(&E) -> bool,
    R: FnMut(u32, &E),
{
    run(policy, operation, should_retry, on_retry).await
}

async fn run<T, E, F, Fut, P, R>(
    policy: &RetryPolicy,
    mut operation: F,
    mut should_retry: P,
    mut on_retry: R,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: FnMut(&E) -> bool,
    R: FnMut(u32, &E),
{
    let attempts = policy.attempts();
    let mut attempt: u32 = 0;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !should_retry(&err) {
            debug!(attempt = attempt + 1, error = %err, "Error not retryable, aborting");
            return Err(err);
        }

        if attempt + 1 >= attempts {
            return Err(err);
        }

        let delay = policy.delay_for(attempt);
        debug!(
            attempt = attempt + 1,
            max_attempts = attempts,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Retrying after backoff"
        );
        on_retry(attempt + 1, &err);

        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
