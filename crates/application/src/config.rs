//! Harness configuration
//!
//! The base URL of the echo service and the verification policy are
//! injected through [`HarnessConfig`]; nothing is read from process-wide
//! state here. Reading the environment is left to the infrastructure layer,
//! which passes a lookup function to [`HarnessConfig::from_lookup`].

use thiserror::Error;
use url::Url;

/// Default echo service.
pub const DEFAULT_BASE_URL: &str = "https://httpbin.org";

/// Default upper bound for the round-trip time check, in milliseconds.
pub const DEFAULT_MAX_DURATION_MS: u64 = 1000;

/// Environment key for the base URL.
pub const ENV_BASE_URL: &str = "ECHOCHECK_BASE_URL";

/// Environment key for the duration threshold.
pub const ENV_MAX_DURATION_MS: &str = "ECHOCHECK_MAX_DURATION_MS";

/// Environment key for the stop-on-failure policy.
pub const ENV_STOP_ON_FAILURE: &str = "ECHOCHECK_STOP_ON_FAILURE";

/// Errors raised while building a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The base URL is not an absolute http(s) URL.
    #[error("invalid base URL '{value}': {reason}")]
    InvalidBaseUrl {
        /// Rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A numeric setting could not be parsed.
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidNumber {
        /// Setting name.
        key: String,
        /// Rejected value.
        value: String,
    },

    /// A boolean setting could not be parsed.
    #[error("{key} must be true or false, got '{value}'")]
    InvalidBool {
        /// Setting name.
        key: String,
        /// Rejected value.
        value: String,
    },
}

/// Configuration shared by every scenario of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    base_url: String,
    max_duration_ms: u64,
    stop_on_failure: bool,
}

impl HarnessConfig {
    /// Creates a configuration for the given base URL with default policy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the URL is not an absolute
    /// http or https URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = validate_base_url(base_url.into())?;
        Ok(Self {
            base_url,
            max_duration_ms: DEFAULT_MAX_DURATION_MS,
            stop_on_failure: true,
        })
    }

    /// Builds a configuration from a key lookup, falling back to defaults for
    /// missing keys.
    ///
    /// # Errors
    ///
    /// Returns an error if a present value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base_url)?;

        if let Some(raw) = lookup(ENV_MAX_DURATION_MS) {
            config.max_duration_ms = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| ConfigError::InvalidNumber {
                    key: ENV_MAX_DURATION_MS.to_string(),
                    value: raw.clone(),
                })?;
        }

        if let Some(raw) = lookup(ENV_STOP_ON_FAILURE) {
            config.stop_on_failure = parse_bool(&raw).ok_or_else(|| ConfigError::InvalidBool {
                key: ENV_STOP_ON_FAILURE.to_string(),
                value: raw.clone(),
            })?;
        }

        Ok(config)
    }

    /// Sets the duration threshold.
    #[must_use]
    pub const fn with_max_duration_ms(mut self, max_duration_ms: u64) -> Self {
        self.max_duration_ms = max_duration_ms;
        self
    }

    /// Sets whether a failing hard assertion stops its scenario's checklist.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Base URL of the echo service, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upper bound for the round-trip time check.
    #[must_use]
    pub const fn max_duration_ms(&self) -> u64 {
        self.max_duration_ms
    }

    /// Whether a failing hard assertion stops its scenario's checklist.
    #[must_use]
    pub const fn stop_on_failure(&self) -> bool {
        self.stop_on_failure
    }

    /// Joins a route such as `/get` onto the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_duration_ms: DEFAULT_MAX_DURATION_MS,
            stop_on_failure: true,
        }
    }
}

fn validate_base_url(raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/').to_string();
    let parsed = Url::parse(&trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        value: raw.clone(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            value: raw,
            reason: "scheme must be http or https".to_string(),
        });
    }

    Ok(trimmed)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
