//! Client configuration resolved from the environment.
//!
//! # Responsibility
//! - Collect API endpoint, timeout and logging settings in one value.
//! - Reject malformed values instead of silently falling back.
//!
//! # Invariants
//! - Unset or blank variables use defaults; set-but-invalid values are errors.
//! - `base_url` never ends with `/`.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_URL: &str = "ACTIVITIES_API_URL";
pub const ENV_API_TIMEOUT_SECS: &str = "ACTIVITIES_API_TIMEOUT_SECS";
pub const ENV_API_DELAY_MS: &str = "ACTIVITIES_API_DELAY_MS";
pub const ENV_LOG_LEVEL: &str = "ACTIVITIES_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ACTIVITIES_LOG_DIR";

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_DIR_NAME: &str = "activities-logs";

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration value rejected during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable is set but cannot be parsed.
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "invalid value `{value}` for {key}; expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved settings for the API client and logging bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:5000/api`.
    pub base_url: String,
    /// Per-request timeout applied by the HTTP client.
    pub timeout: Duration,
    /// Artificial pause before every request.
    pub request_delay: Duration,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            request_delay: Duration::ZERO,
            log_level: default_log_level().to_string(),
            log_dir: std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
        }
    }
}

impl ClientConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, which maps a variable name to
    /// its raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let mut config = Self::default();

        if let Some(raw) = value(ENV_API_URL) {
            config.base_url = normalize_base_url(ENV_API_URL, &raw)?;
        }
        if let Some(raw) = value(ENV_API_TIMEOUT_SECS) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_API_TIMEOUT_SECS,
                        value: raw,
                        expected: "a positive number of seconds",
                    })
                }
            }
        }
        if let Some(raw) = value(ENV_API_DELAY_MS) {
            let millis = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_API_DELAY_MS,
                value: raw.clone(),
                expected: "a non-negative number of milliseconds",
            })?;
            config.request_delay = Duration::from_millis(millis);
        }
        if let Some(raw) = value(ENV_LOG_LEVEL) {
            config.log_level = raw;
        }
        if let Some(raw) = value(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(raw);
        }

        Ok(config)
    }

    /// Replaces the API root, applying the same checks as `from_env`.
    pub fn with_base_url(mut self, base_url: &str) -> ConfigResult<Self> {
        self.base_url = normalize_base_url(ENV_API_URL, base_url.trim())?;
        Ok(self)
    }
}

fn normalize_base_url(key: &'static str, raw: &str) -> ConfigResult<String> {
    let trimmed = raw.trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    if !has_scheme {
        return Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            expected: "an http:// or https:// url",
        });
    }
    Ok(trimmed.to_string())
}
