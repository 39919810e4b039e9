//! Runner configuration
//!
//! Defines the tunable parameters of a build run: where the build service
//! lives, how often logs and status are polled, how long a single request
//! and the whole wait may take, and how much log history is kept for
//! duplicate suppression.

use std::time::Duration;

/// Pause after a log fetch that returned no new data
pub const DEFAULT_IDLE_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Pause between log fetches that returned data
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Pause between build status queries
pub const DEFAULT_WAIT_POLL_INTERVAL: Duration = Duration::from_secs(6);

/// Number of status queries before giving up on a build
pub const DEFAULT_MAX_WAIT_ATTEMPTS: u32 = 100;

/// Upper bound on a single request to the build service
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Number of recently printed log lines remembered for duplicate suppression
pub const DEFAULT_DEDUP_CAPACITY: usize = 1024;

/// Runner configuration
///
/// All intervals are configurable so tests and slow environments can tune
/// them without touching the engine.
#[derive(Debug, Clone)]
pub struct Config {
    /// Build service base URL (e.g., "http://localhost:8080")
    pub service_url: String,

    /// How long to wait before re-reading logs when nothing new arrived
    pub idle_poll_interval: Duration,

    /// How long to wait between log reads that produced data
    pub poll_interval: Duration,

    /// How long to wait between build status queries
    pub wait_poll_interval: Duration,

    /// Maximum number of build status queries
    pub max_wait_attempts: u32,

    /// Capacity of the log deduplication cache
    pub dedup_capacity: usize,

    /// Per-request timeout; also bounds how long stopping the tailer can take
    pub request_timeout: Duration,

    /// Treat a failure of the log tailer as a failure of the run
    pub fail_on_log_error: bool,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(service_url: String) -> Self {
        Self {
            service_url,
            idle_poll_interval: DEFAULT_IDLE_POLL_INTERVAL,
            poll_interval: DEFAULT_POLL_INTERVAL,
            wait_poll_interval: DEFAULT_WAIT_POLL_INTERVAL,
            max_wait_attempts: DEFAULT_MAX_WAIT_ATTEMPTS,
            dedup_capacity: DEFAULT_DEDUP_CAPACITY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            fail_on_log_error: false,
        }
    }

    /// Applies the optional tuning variables on top of the current values
    ///
    /// Recognized variables:
    /// - CBUILD_IDLE_POLL_MS (milliseconds, default: 2000)
    /// - CBUILD_POLL_MS (milliseconds, default: 5000)
    /// - CBUILD_WAIT_POLL_MS (milliseconds, default: 6000)
    /// - CBUILD_MAX_WAIT_ATTEMPTS (default: 100)
    /// - CBUILD_DEDUP_CAPACITY (default: 1024)
    /// - CBUILD_REQUEST_TIMEOUT_MS (milliseconds, default: 60000)
    /// - CBUILD_FAIL_ON_LOG_ERROR ("true"/"1", default: false)
    ///
    /// Unparseable values are ignored and the current value is kept.
    pub fn apply_env_overrides(&mut self) {
        if let Some(ms) = env_parse::<u64>("CBUILD_IDLE_POLL_MS") {
            self.idle_poll_interval = Duration::from_millis(ms);
        }

        if let Some(ms) = env_parse::<u64>("CBUILD_POLL_MS") {
            self.poll_interval = Duration::from_millis(ms);
        }

        if let Some(ms) = env_parse::<u64>("CBUILD_WAIT_POLL_MS") {
            self.wait_poll_interval = Duration::from_millis(ms);
        }

        if let Some(attempts) = env_parse::<u32>("CBUILD_MAX_WAIT_ATTEMPTS") {
            self.max_wait_attempts = attempts;
        }

        if let Some(capacity) = env_parse::<usize>("CBUILD_DEDUP_CAPACITY") {
            self.dedup_capacity = capacity;
        }

        if let Some(ms) = env_parse::<u64>("CBUILD_REQUEST_TIMEOUT_MS") {
            self.request_timeout = Duration::from_millis(ms);
        }

        if let Ok(value) = std::env::var("CBUILD_FAIL_ON_LOG_ERROR") {
            self.fail_on_log_error = matches!(value.as_str(), "1" | "true" | "TRUE" | "yes");
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_url.is_empty() {
            return Err(ConfigError::Invalid("service_url cannot be empty"));
        }

        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "service_url must start with http:// or https://",
            ));
        }

        if self.idle_poll_interval.is_zero() {
            return Err(ConfigError::Invalid("idle_poll_interval must be greater than 0"));
        }

        if self.poll_interval.is_zero() {
            return Err(ConfigError::Invalid("poll_interval must be greater than 0"));
        }

        if self.wait_poll_interval.is_zero() {
            return Err(ConfigError::Invalid("wait_poll_interval must be greater than 0"));
        }

        if self.max_wait_attempts == 0 {
            return Err(ConfigError::Invalid("max_wait_attempts must be greater than 0"));
        }

        if self.dedup_capacity == 0 {
            return Err(ConfigError::Invalid("dedup_capacity must be greater than 0"));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid("request_timeout must be greater than 0"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8080".to_string())
    }
}

/// Configuration problems, detected before any remote call
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse::<T>().ok())
}
