use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use crate::config::{FeedbackConfig, MAX_ATTEMPTS};
use crate::error::FeedbackError;

/// Bounded retry loop for remote feedback.
///
/// Every attempt is capped by `request_timeout`, attempt `n` is followed by a
/// `backoff_base * 2^(n - 1)` sleep unless it was the last one, and the whole
/// loop runs under a deadline equal to [`RetryPolicy::worst_case_latency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub request_timeout: Duration,
}

/// Result of [`RetryPolicy::run`] plus the number of attempts started.
#[derive(Debug)]
pub struct RetryOutcome<T> {
    pub result: Result<T, FeedbackError>,
    pub attempts: u32,
}

fn scaled(base: Duration, factor: u64) -> Duration {
    let nanos = base.as_nanos().saturating_mul(u128::from(factor));
    let secs = u64::try_from(nanos / 1_000_000_000).unwrap_or(u64::MAX);
    if secs == u64::MAX {
        return Duration::MAX;
    }
    let subsec = u32::try_from(nanos % 1_000_000_000).unwrap_or(0);
    Duration::new(secs, subsec)
}

impl RetryPolicy {
    pub fn from_config(config: &FeedbackConfig) -> Self {
        Self {
            max_retries: config.max_retries.clamp(1, MAX_ATTEMPTS),
            backoff_base: config.backoff_base(),
            request_timeout: config.request_timeout(),
        }
    }

    /// Sleep after failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = 2_u32.checked_pow(exponent).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }

    /// All sleeps of a run where every attempt fails.
    pub fn delays(&self) -> Vec<Duration> {
        (1..self.max_retries).map(|a| self.delay_after(a)).collect()
    }

    /// Attempt timeouts plus every sleep, saturating at [`Duration::MAX`].
    ///
    /// Closed form over the sleeps, so the cost does not grow with
    /// `max_retries`.
    pub fn worst_case_latency(&self) -> Duration {
        let sleeps = u64::from(self.max_retries.saturating_sub(1));
        // Factors double up to 2^31, then stay at u32::MAX (see `delay_after`).
        let doubling = sleeps.min(32);
        let factor = ((1_u64 << doubling) - 1)
            .saturating_add(sleeps.saturating_sub(32).saturating_mul(u64::from(u32::MAX)));
        scaled(self.backoff_base, factor)
            .saturating_add(self.request_timeout.saturating_mul(self.max_retries))
    }

    /// Run `op` until it succeeds or the attempts run out.
    ///
    /// `op` receives the 1-based attempt number. The last error is returned;
    /// earlier ones are only logged.
    pub async fn run<F, Fut, T>(&self, mut op: F) -> RetryOutcome<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, FeedbackError>>,
    {
        let budget = self.worst_case_latency();
        let started = AtomicU32::new(0);

        let attempts_loop = async {
            let mut last_err = FeedbackError::Unconfigured;
            for attempt in 1..=self.max_retries {
                started.store(attempt, Ordering::Relaxed);
                let outcome = match tokio::time::timeout(self.request_timeout, op(attempt)).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(FeedbackError::Timeout(self.request_timeout)),
                };

                match outcome {
                    Ok(value) => {
                        if attempt > 1 {
                            tracing::info!(attempt, "feedback: remote recovered after retries");
                        }
                        return Ok(value);
                    }
                    Err(err) => {
                        if attempt < self.max_retries {
                            let delay = self.delay_after(attempt);
                            tracing::warn!(
                                attempt,
                                max_retries = self.max_retries,
                                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                                error = %err,
                                "feedback: remote attempt failed, retrying"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        last_err = err;
                    }
                }
            }
            Err(last_err)
        };

        let result = match tokio::time::timeout(budget, attempts_loop).await {
            Ok(result) => result,
            Err(_) => Err(FeedbackError::BudgetExhausted(budget)),
        };

        RetryOutcome {
            result,
            attempts: started.load(Ordering::Relaxed),
        }
    }
}
