// Retry with exponential backoff for every backend call
use crate::config::RetryConfig;
use crate::error::GenerationError;
use backoff::backoff::Backoff;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::warn;

/// Fixed-length doubling schedule with no jitter: `retries` delays starting at
/// `initial_delay`, each `multiplier` times the previous.
#[derive(Debug, Clone)]
pub struct DoublingBackoff {
    config: RetryConfig,
    remaining: u32,
    next_delay: Duration,
}

impl DoublingBackoff {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            remaining: config.retries,
            next_delay: config.initial_delay,
        }
    }
}

impl Backoff for DoublingBackoff {
    fn reset(&mut self) {
        self.remaining = self.config.retries;
        self.next_delay = self.config.initial_delay;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let delay = self.next_delay;
        self.next_delay = delay.saturating_mul(self.config.multiplier);
        Some(delay)
    }
}

/// Runs an operation until it succeeds, fails permanently, or the budget is spent.
///
/// Transient errors (see [`GenerationError::is_transient`]) are retried; every
/// other error is returned after the first attempt. Each call starts a fresh
/// budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct Retrier {
    config: RetryConfig,
}

impl Retrier {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> RetryConfig {
        self.config
    }

    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, GenerationError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GenerationError>>,
    {
        let attempts = AtomicU32::new(0);

        let result = backoff::future::retry_notify(
            DoublingBackoff::new(self.config),
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                let fut = operation();
                async move {
                    fut.await.map_err(|e| {
                        if e.is_transient() {
                            backoff::Error::transient(e)
                        } else {
                            backoff::Error::permanent(e)
                        }
                    })
                }
            },
            |err: GenerationError, delay: Duration| {
                warn!(
                    operation = label,
                    attempt = attempts.load(Ordering::SeqCst),
                    retries_left = retries_left(self.config.retries, attempts.load(Ordering::SeqCst)),
                    retry_in_ms = delay.as_millis() as u64,
                    "API call failed, retrying: {}",
                    err
                );
            },
        )
        .await;

        if let Err(e) = &result {
            let tries = attempts.load(Ordering::SeqCst);
            if tries > 1 {
                warn!(operation = label, attempts = tries, "Giving up after retries: {}", e);
            }
        }

        result
    }
}

/// Retries still available once `attempts` calls have failed
fn retries_left(retries: u32, attempts: u32) -> u32 {
    retries.saturating_add(1).saturating_sub(attempts)
}
