//! Retry policy for search API calls
//!
//! Every remote call the job client makes goes through [`RetryPolicy::run`].
//! A failed attempt is classified first: statuses listed as fatal abort at
//! once, everything else waits and tries again until the attempt cap (if any)
//! is reached or shutdown is requested.

use super::shutdown::{sleep_or_shutdown, ShutdownSignal};
use crate::config::RetryConfig;
use crate::domain::{ApiError, Result, SumoError};
use std::future::Future;
use std::time::Duration;

/// Retry policy with optional attempt cap and exponential backoff
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: Option<u32>,
    initial_delay: Duration,
    backoff_multiplier: f64,
    max_delay: Duration,
    fatal_statuses: Vec<u16>,
}

impl RetryPolicy {
    /// Retry forever, pausing `delay` between attempts
    pub fn fixed(delay: Duration) -> Self {
        Self {
            max_attempts: None,
            initial_delay: delay,
            backoff_multiplier: 1.0,
            max_delay: delay,
            fatal_statuses: vec![401, 403],
        }
    }

    /// Build a policy from the `[api.retry]` section
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: (config.max_attempts > 0).then_some(config.max_attempts),
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            backoff_multiplier: config.backoff_multiplier.max(1.0),
            max_delay: Duration::from_millis(config.max_delay_ms.max(config.initial_delay_ms)),
            fatal_statuses: config.fatal_statuses.clone(),
        }
    }

    /// Cap the number of attempts per call
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = (max_attempts > 0).then_some(max_attempts);
        self
    }

    /// Grow the delay geometrically up to `max_delay`
    pub fn with_backoff(mut self, multiplier: f64, max_delay: Duration) -> Self {
        self.backoff_multiplier = multiplier.max(1.0);
        self.max_delay = max_delay.max(self.initial_delay);
        self
    }

    pub fn with_fatal_statuses(mut self, statuses: Vec<u16>) -> Self {
        self.fatal_statuses = statuses;
        self
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Delay after the given failed attempt (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(64) as i32;
        let delay_ms =
            self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let capped = delay_ms.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    /// Whether retrying cannot help
    pub fn is_fatal(&self, error: &ApiError) -> bool {
        error
            .status()
            .is_some_and(|status| self.fatal_statuses.contains(&status))
    }

    /// Run `call` until it succeeds
    ///
    /// # Errors
    ///
    /// - [`SumoError::Fatal`] when an attempt fails with a fatal status
    /// - [`SumoError::RetriesExhausted`] when the attempt cap is reached
    /// - [`SumoError::Interrupted`] when shutdown is requested
    pub async fn run<T, F, Fut>(
        &self,
        operation: &str,
        shutdown: &ShutdownSignal,
        mut call: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, ApiError>>,
    {
        let mut attempt: u32 = 0;

        loop {
            if super::shutdown::is_shutdown(shutdown) {
                return Err(SumoError::Interrupted);
            }

            attempt = attempt.saturating_add(1);
            let error = match call().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(operation, attempt, "Succeeded after retrying");
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if self.is_fatal(&error) {
                tracing::error!(operation, error = %error, "Non-retryable API error");
                return Err(SumoError::Fatal {
                    operation: operation.to_string(),
                    source: error,
                });
            }

            if self.max_attempts.is_some_and(|max| attempt >= max) {
                tracing::error!(operation, attempts = attempt, error = %error, "Giving up");
                return Err(SumoError::RetriesExhausted {
                    operation: operation.to_string(),
                    attempts: attempt,
                    source: error,
                });
            }

            let delay = self.delay_for(attempt);
            crate::log_retry_attempt!(operation, attempt, self.max_attempts, delay, error);
            sleep_or_shutdown(delay, shutdown).await?;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
