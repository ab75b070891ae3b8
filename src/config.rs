//! Configuration types for maven-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fetch behavior configuration (concurrency, deadlines, corruption policy)
///
/// Groups settings related to how artifact batches are acquired.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum concurrent artifact fetches in a batch (default: 4)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_fetches: usize,

    /// Overall batch deadline (None = wait for every artifact)
    ///
    /// When the deadline elapses, still-running acquisitions are cancelled
    /// and reported as failed; completed artifacts keep their outcomes.
    #[serde(default)]
    pub batch_deadline: Option<Duration>,

    /// Re-download once when a freshly downloaded artifact fails
    /// verification (default: false)
    ///
    /// The baseline pipeline deletes a corrupt download and reports failure
    /// without retrying. Enabling this performs exactly one automatic
    /// re-download + re-verify cycle; a second corruption is terminal.
    #[serde(default)]
    pub redownload_on_corruption: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: default_max_concurrent(),
            batch_deadline: None,
            redownload_on_corruption: false,
        }
    }
}

/// HTTP client configuration
///
/// Applied to the single shared `reqwest` client used for both artifact
/// bodies and checksum sidecars.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// TCP connect timeout (default: 10s)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Duration,

    /// Total per-request timeout, including body transfer (default: 120s)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Retry behavior for transient transport failures
///
/// Disabled by default (`max_attempts = 0`): the baseline pipeline fails an
/// artifact on the first transport error. Hosts that want resilience against
/// flaky mirrors opt in by raising `max_attempts`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum retry attempts after the initial try (default: 0 = disabled)
    #[serde(default)]
    pub max_attempts: u32,

    /// Delay before the first retry (default: 500ms)
    #[serde(default = "default_initial_delay")]
    pub initial_delay: Duration,

    /// Upper bound on any single retry delay (default: 30s)
    #[serde(default = "default_max_delay")]
    pub max_delay: Duration,

    /// Multiplier applied to the delay after each attempt (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays to avoid thundering herd (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// Main configuration for the acquisition pipeline
///
/// Fields are organized into logical sub-configs:
/// - [`fetch`](FetchConfig) - concurrency, deadline, corruption policy
/// - [`http`](HttpConfig) - client timeouts and user agent
/// - [`retry`](RetryConfig) - opt-in transport retry
///
/// Sub-config fields are flattened for serialization, so the JSON/TOML
/// format stays flat (no nesting).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Fetch behavior settings
    #[serde(flatten)]
    pub fetch: FetchConfig,

    /// HTTP client settings
    #[serde(flatten)]
    pub http: HttpConfig,

    /// Transport retry settings
    #[serde(flatten)]
    pub retry: RetryConfig,

    /// Capacity of the event broadcast channel (default: 256)
    #[serde(default = "default_event_capacity")]
    pub event_channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
            event_channel_capacity: default_event_capacity(),
        }
    }
}

impl Config {
    /// Validate settings that have no sensible interpretation when out of range
    pub fn validate(&self) -> Result<()> {
        if self.fetch.max_concurrent_fetches == 0 {
            return Err(Error::Config {
                message: "max_concurrent_fetches must be at least 1".into(),
                key: Some("max_concurrent_fetches".into()),
            });
        }
        if self.event_channel_capacity == 0 {
            return Err(Error::Config {
                message: "event_channel_capacity must be at least 1".into(),
                key: Some("event_channel_capacity".into()),
            });
        }
        Ok(())
    }
}

fn default_max_concurrent() -> usize {
    4
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_user_agent() -> String {
    concat!("maven-dl/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

fn default_event_capacity() -> usize {
    256
}
