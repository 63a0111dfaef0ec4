//! Exponential backoff retry logic for Ollama requests.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use tracing::warn;

/// Configuration: 4 total attempts (1 + 3 retries), waits of 1s, 2s, 4s.
pub const MAX_ATTEMPTS: u32 = 4;
const INITIAL_INTERVAL_SECS: u64 = 1;
const MAX_INTERVAL_SECS: u64 = 30;

/// Retry schedule for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            initial_interval: Duration::from_secs(INITIAL_INTERVAL_SECS),
            max_interval: Duration::from_secs(MAX_INTERVAL_SECS),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_interval,
            current_interval: self.initial_interval,
            max_interval: self.max_interval,
            randomization_factor: 0.0,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

/// Retry an async operation with exponential backoff.
///
/// `attempt` receives the 1-based attempt number and is called up to
/// `policy.max_attempts` times. An error for which `is_retryable` returns
/// false is returned immediately; otherwise the last error is returned once
/// attempts run out.
pub async fn retry_with_backoff<T, E, Fut, F, P>(
    policy: RetryPolicy,
    mut attempt: F,
    is_retryable: P,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut backoff = policy.backoff();
    let mut attempts = 0;

    loop {
        attempts += 1;

        match attempt(attempts).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempts >= policy.max_attempts || !is_retryable(&e) {
                    return Err(e);
                }

                let wait = backoff.next_backoff().unwrap_or(policy.max_interval);
                warn!(
                    "Attempt {}/{} failed: {}. Retrying in {:?}...",
                    attempts, policy.max_attempts, e, wait
                );
                tokio::time::sleep(wait).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, PartialEq)]
    enum TestError {
        Transient,
        Fatal,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    fn retryable(e: &TestError) -> bool {
        *e == TestError::Transient
    }

    #[test]
    fn test_default_schedule_doubles_from_one_second() {
        let mut backoff = RetryPolicy::default().backoff();
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(1)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(2)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(4)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_succeeds_on_first_attempt() {
        let result: Result<&str, TestError> =
            retry_with_backoff(RetryPolicy::default(), |_| async { Ok("ok") }, retryable).await;
        assert_eq!(result.unwrap(), "ok");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhausts_after_max_attempts() {
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = count.clone();

        let result: Result<(), TestError> = retry_with_backoff(
            RetryPolicy::default(),
            move |_| {
                let c = count_clone.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err(TestError::Transient)
                }
            },
            retryable,
        )
        .await;

        assert_eq!(result, Err(TestError::Transient));
        assert_eq!(count.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_stops_immediately() {
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = count.clone();

        let result: Result<(), TestError> = retry_with_backoff(
            RetryPolicy::default(),
            move |_| {
                let c = count_clone.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err(TestError::Fatal)
                }
            },
            retryable,
        )
        .await;

        assert_eq!(result, Err(TestError::Fatal));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_succeeds_after_failures_with_attempt_numbers() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let result: Result<&str, TestError> = retry_with_backoff(
            RetryPolicy::default(),
            move |n| {
                let s = seen_clone.clone();
                async move {
                    s.lock().unwrap().push(n);
                    if n < 3 { Err(TestError::Transient) } else { Ok("recovered") }
                }
            },
            retryable,
        )
        .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }
}
