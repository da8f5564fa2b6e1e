//! Client configuration.
//!
//! Loaded from environment variables (a `.env` file is honoured by the
//! binary), then overridden by command-line flags.

use crate::error::ConfigError;
use crate::types::UserId;
use std::env;
use std::time::Duration;

/// Default base URL of the todo API
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

/// Default time a notice stays visible
pub const DEFAULT_ERROR_DISPLAY: Duration = Duration::from_millis(3000);

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Configuration of the todo client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the todo API, without trailing slash
    pub api_url: String,
    /// User whose todos are shown
    pub user_id: UserId,
    /// How long a notice stays before it dismisses itself
    pub error_display: Duration,
    /// Timeout for each remote request
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the user
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_id,
            error_display: DEFAULT_ERROR_DISPLAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Load configuration from environment variables
    ///
    /// - `TODOS_API_URL` (default [`DEFAULT_API_URL`])
    /// - `TODOS_USER_ID` (required)
    /// - `TODOS_ERROR_DISPLAY_MS` (default 3000)
    /// - `TODOS_REQUEST_TIMEOUT_MS` (default 10000)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the user id is missing or a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_id = lookup("TODOS_USER_ID")
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingUserId)
            .and_then(|value| parse_user_id(&value))?;

        let mut config = Self::new(user_id);

        if let Some(url) = lookup("TODOS_API_URL") {
            config = config.with_api_url(&url)?;
        }
        if let Some(value) = lookup("TODOS_ERROR_DISPLAY_MS") {
            config.error_display = parse_millis("TODOS_ERROR_DISPLAY_MS", &value)?;
        }
        if let Some(value) = lookup("TODOS_REQUEST_TIMEOUT_MS") {
            config.request_timeout = parse_millis("TODOS_REQUEST_TIMEOUT_MS", &value)?;
        }

        Ok(config)
    }

    /// Set the API base URL
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] unless `url` is an absolute
    /// `http` or `https` URL.
    pub fn with_api_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let trimmed = url.trim().trim_end_matches('/');
        let parsed =
            reqwest::Url::parse(trimmed).map_err(|_| ConfigError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }
        self.api_url = trimmed.to_string();
        Ok(self)
    }

    /// Set the user
    #[must_use]
    pub const fn with_user_id(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    /// Set how long notices stay visible
    #[must_use]
    pub const fn with_error_display(mut self, duration: Duration) -> Self {
        self.error_display = duration;
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub const fn with_request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = duration;
        self
    }
}

/// Parse a user id; ids are positive
///
/// # Errors
///
/// Returns [`ConfigError::InvalidNumber`] for anything but a positive integer.
pub fn parse_user_id(value: &str) -> Result<UserId, ConfigError> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .map(UserId::new)
        .ok_or_else(|| ConfigError::InvalidNumber {
            name: "TODOS_USER_ID",
            value: value.to_string(),
        })
}

fn parse_millis(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        })
}
