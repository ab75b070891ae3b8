//! Retry logic with exponential backoff
//!
//! Transient transport failures can be retried with exponential backoff and
//! optional jitter. The pipeline ships with retry disabled
//! (`max_attempts = 0`): the baseline contract is fail-without-retry, and
//! hosts opt in through [`RetryConfig`].
//!
//! # Example
//!
//! ```no_run
//! use maven_dl::retry::{IsRetryable, fetch_with_retry};
//! use maven_dl::RetryConfig;
//!
//! #[derive(Debug)]
//! enum MyError {
//!     Transient,
//!     Permanent,
//! }
//!
//! impl std::fmt::Display for MyError {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         write!(f, "{self:?}")
//!     }
//! }
//!
//! impl IsRetryable for MyError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, MyError::Transient)
//!     }
//! }
//!
//! # async fn example() -> Result<(), MyError> {
//! let config = RetryConfig { max_attempts: 3, ..Default::default() };
//! let value = fetch_with_retry(&config, || async {
//!     Ok::<_, MyError>(())
//! }).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::RetryConfig;
use crate::error::{Error, TransportError};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Trait for errors that can be classified as retryable or not
///
/// Transient failures (timeouts, connection resets, server overload) should
/// return `true`. Permanent failures (missing artifacts, checksum
/// mismatches, invalid descriptors) should return `false`.
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(e) => match e {
                TransportError::Request { .. } | TransportError::BodyRead { .. } => true,
                // Server-side and throttling statuses are worth another try;
                // 404 and friends are not.
                TransportError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
                TransportError::DeadlineExceeded { .. } | TransportError::TaskFailed { .. } => {
                    false
                }
            },
            Error::Network(e) => e.is_timeout() || e.is_connect(),
            Error::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::NotConnected
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::Interrupted
            ),
            // A mismatching or unverifiable artifact will not fix itself by
            // re-asking the same server; corruption re-download is a separate
            // policy on the fetcher.
            Error::Integrity(_) => false,
            Error::Validation(_) => false,
            Error::Config { .. } => false,
            Error::Injection(_) => false,
            Error::Other(_) => false,
        }
    }
}

/// Execute an async operation with exponential backoff retry logic
///
/// # Arguments
///
/// * `config` - Retry configuration (max attempts, delays, backoff multiplier, jitter)
/// * `operation` - Async closure returning `Result<T, E>` where `E: IsRetryable`
///
/// # Returns
///
/// The successful result, or the last error once attempts are exhausted.
/// With `max_attempts = 0` the operation runs exactly once.
pub async fn fetch_with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + std::fmt::Display,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    tracing::info!(attempts = attempt + 1, "operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if e.is_retryable() && attempt < config.max_attempts => {
                attempt += 1;

                tracing::warn!(
                    error = %e,
                    attempt = attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis(),
                    "operation failed, retrying"
                );

                let jittered_delay = if config.jitter {
                    add_jitter(delay)
                } else {
                    delay
                };

                tokio::time::sleep(jittered_delay).await;

                let next_delay =
                    Duration::from_secs_f64(delay.as_secs_f64() * config.backoff_multiplier);
                delay = next_delay.min(config.max_delay);
            }
            Err(e) => {
                if attempt > 0 {
                    tracing::warn!(
                        error = %e,
                        attempts = attempt + 1,
                        "operation failed after all retry attempts exhausted"
                    );
                }
                return Err(e);
            }
        }
    }
}

/// Add random jitter to a delay to prevent thundering herd
///
/// Jitter is uniformly distributed between 0% and 100% of the delay, so the
/// actual delay lies between `delay` and `2 * delay`.
fn add_jitter(delay: Duration) -> Duration {
    let mut rng = rand::thread_rng();
    let jitter_factor: f64 = rng.gen_range(0.0..=1.0);
    let jittered_secs = delay.as_secs_f64() * (1.0 + jitter_factor);
    Duration::from_secs_f64(jittered_secs)
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntegrityError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    enum TestError {
        Transient,
        Permanent,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                TestError::Transient => write!(f, "transient error"),
                TestError::Permanent => write!(f, "permanent error"),
            }
        }
    }

    impl IsRetryable for TestError {
        fn is_retryable(&self) -> bool {
            matches!(self, TestError::Transient)
        }
    }

    fn quick_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }

    #[tokio::test]
    async fn success_needs_no_retry() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = fetch_with_retry(&quick_config(3), || {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, TestError>(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 1, "should only call once");
    }

    #[tokio::test]
    async fn default_config_runs_exactly_once() {
        // RetryConfig::default has max_attempts = 0: fail-without-retry
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = fetch_with_retry(&RetryConfig::default(), || {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(TestError::Transient)
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(
            counter.load(Ordering::SeqCst),
            1,
            "retry is disabled by default"
        );
    }

    #[tokio::test]
    async fn transient_error_retries_then_succeeds() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = fetch_with_retry(&quick_config(3), || {
            let counter = counter_clone.clone();
            async move {
                let count = counter.fetch_add(1, Ordering::SeqCst);
                if count < 2 {
                    Err(TestError::Transient)
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(
            counter.load(Ordering::SeqCst),
            3,
            "should retry twice before success"
        );
    }

    #[tokio::test]
    async fn exhausted_attempts_return_last_error() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = fetch_with_retry(&quick_config(2), || {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(TestError::Transient)
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(
            counter.load(Ordering::SeqCst),
            3,
            "should try initial + 2 retries"
        );
    }

    #[tokio::test]
    async fn permanent_error_is_not_retried() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = fetch_with_retry(&quick_config(3), || {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(TestError::Permanent)
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(
            counter.load(Ordering::SeqCst),
            1,
            "should not retry permanent error"
        );
    }

    #[tokio::test]
    async fn backoff_delays_grow_until_capped() {
        let config = RetryConfig {
            max_attempts: 3,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(20),
            backoff_multiplier: 10.0,
            jitter: false,
        };

        let start = std::time::Instant::now();
        let _result =
            fetch_with_retry(&config, || async { Err::<i32, _>(TestError::Transient) }).await;
        let elapsed = start.elapsed();

        // 10ms + 20ms (capped) + 20ms (capped) = 50ms minimum
        assert!(
            elapsed >= Duration::from_millis(50),
            "should wait at least 50ms, waited {elapsed:?}"
        );
        assert!(
            elapsed < Duration::from_secs(2),
            "cap should keep delays short, waited {elapsed:?}"
        );
    }

    #[test]
    fn add_jitter_stays_within_bounds() {
        let delay = Duration::from_millis(50);
        for i in 0..200 {
            let jittered = add_jitter(delay);
            assert!(
                jittered >= delay,
                "iteration {i}: jittered {jittered:?} < base delay {delay:?}"
            );
            assert!(
                jittered <= delay * 2,
                "iteration {i}: jittered {jittered:?} > 2x base delay"
            );
        }
    }

    // -----------------------------------------------------------------------
    // IsRetryable classification for the crate error type
    // -----------------------------------------------------------------------

    #[test]
    fn transport_request_and_body_errors_are_retryable() {
        let request = Error::Transport(TransportError::Request {
            url: "https://repo.example/a.jar".into(),
            reason: "connection reset".into(),
        });
        assert!(request.is_retryable());

        let body = Error::Transport(TransportError::BodyRead {
            url: "https://repo.example/a.jar".into(),
            reason: "broken stream".into(),
        });
        assert!(body.is_retryable());
    }

    #[test]
    fn http_5xx_and_429_are_retryable_4xx_is_not() {
        let status = |status| {
            Error::Transport(TransportError::HttpStatus {
                url: "https://repo.example/a.jar".into(),
                status,
            })
        };
        assert!(status(500).is_retryable());
        assert!(status(503).is_retryable());
        assert!(status(429).is_retryable());
        assert!(!status(404).is_retryable());
        assert!(!status(403).is_retryable());
    }

    #[test]
    fn deadline_and_task_failures_are_not_retryable() {
        let deadline = Error::Transport(TransportError::DeadlineExceeded {
            coordinate: "org.example:lib:1.0.0".into(),
        });
        assert!(!deadline.is_retryable());

        let task = Error::Transport(TransportError::TaskFailed {
            coordinate: "org.example:lib:1.0.0".into(),
            reason: "panicked".into(),
        });
        assert!(!task.is_retryable());
    }

    #[test]
    fn integrity_errors_are_never_retryable() {
        let mismatch = Error::Integrity(IntegrityError::ChecksumMismatch {
            url: "https://repo.example/a.jar".into(),
            expected: "aa".into(),
            actual: "bb".into(),
        });
        assert!(
            !mismatch.is_retryable(),
            "corruption re-download is a fetcher policy, not a transport retry"
        );

        let sidecar = Error::Integrity(IntegrityError::SidecarUnavailable {
            url: "https://repo.example/a.jar.sha1".into(),
            reason: "HTTP 404".into(),
        });
        assert!(!sidecar.is_retryable());
    }

    #[test]
    fn io_timeout_is_retryable_not_found_is_not() {
        let timeout = Error::Io(std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout"));
        assert!(timeout.is_retryable());

        let not_found = Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "not found",
        ));
        assert!(!not_found.is_retryable());
    }
}
