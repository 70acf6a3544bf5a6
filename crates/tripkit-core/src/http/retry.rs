//! Retry with exponential backoff
//!
//! The pipeline itself never retries beyond the single refresh-and-retry.
//! Services that want to ride out transient failures (the weather lookup)
//! wrap their calls in [`execute_with_retry`].

use std::future::Future;
use std::time::Duration;

use backoff::{backoff::Backoff, ExponentialBackoff};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: u32,
    /// Initial backoff delay in milliseconds
    pub base_delay_ms: u64,
    /// Ceiling for a single backoff delay in milliseconds
    pub max_delay_ms: u64,
    /// Randomize delays to avoid synchronized retries
    pub jitter: bool,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 5_000,
            jitter: true,
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    pub fn with_base_delay(mut self, millis: u64) -> Self {
        self.base_delay_ms = millis;
        self
    }

    pub fn with_max_delay(mut self, millis: u64) -> Self {
        self.max_delay_ms = millis;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Policy that tries once and never waits
    pub fn none() -> Self {
        Self::new(1).with_base_delay(0).with_jitter(false)
    }

    pub fn create_backoff(&self) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff {
            current_interval: Duration::from_millis(self.base_delay_ms),
            initial_interval: Duration::from_millis(self.base_delay_ms),
            max_interval: Duration::from_millis(self.max_delay_ms),
            multiplier: self.multiplier,
            // attempts are capped by max_attempts instead
            max_elapsed_time: None,
            ..Default::default()
        };

        if !self.jitter {
            backoff.randomization_factor = 0.0;
        }

        backoff
    }
}

/// Decision on whether to retry a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry { delay: Duration },
    NoRetry,
}

/// Tracks attempts for one logical call
#[derive(Debug)]
pub struct RetryHandler {
    policy: RetryPolicy,
    attempts: u32,
    backoff: ExponentialBackoff,
}

impl RetryHandler {
    pub fn new(policy: RetryPolicy) -> Self {
        let backoff = policy.create_backoff();
        Self {
            policy,
            attempts: 1,
            backoff,
        }
    }

    /// Decide after a failed attempt
    pub fn should_retry(&mut self, error: &ApiError) -> RetryDecision {
        if self.attempts >= self.policy.max_attempts || !error.is_transient() {
            return RetryDecision::NoRetry;
        }

        self.attempts += 1;
        let delay = self
            .backoff
            .next_backoff()
            .unwrap_or(Duration::from_millis(self.policy.max_delay_ms));

        RetryDecision::Retry { delay }
    }

    /// Attempts made so far, the first one included
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// Run `request_fn` until it succeeds, fails permanently, or the policy is
/// exhausted. The last error is returned.
pub async fn execute_with_retry<F, Fut, T>(mut request_fn: F, policy: RetryPolicy) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut handler = RetryHandler::new(policy);

    loop {
        match request_fn().await {
            Ok(value) => return Ok(value),
            Err(error) => match handler.should_retry(&error) {
                RetryDecision::Retry { delay } => {
                    tracing::warn!(
                        attempt = handler.attempts(),
                        delay = ?delay,
                        error = %error,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::NoRetry => {
                    tracing::debug!(attempts = handler.attempts(), error = %error, "Giving up");
                    return Err(error);
                }
            },
        }
    }
}
