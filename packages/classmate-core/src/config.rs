//! Client configuration.
//!
//! Backend location, credentials and timing knobs, loadable from
//! environment variables.

use std::env;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default backend gateway.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Quiet period before a batch of preference edits is saved.
pub const DEFAULT_PREFERENCE_DEBOUNCE: Duration = Duration::from_millis(150);

/// Per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Capacity of the client event broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Configuration for the client core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the backend gateway, without trailing slash.
    pub base_url: String,
    /// Bearer token attached to every request. Token storage belongs to
    /// the host application.
    pub auth_token: Option<String>,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Quiet period for the preference synchronizer.
    pub preference_debounce: Duration,
    /// Capacity of the [`EventBus`](crate::events::EventBus).
    pub event_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            preference_debounce: DEFAULT_PREFERENCE_DEBOUNCE,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `CLASSMATE_API_URL` | `base_url` |
    /// | `CLASSMATE_TOKEN` | `auth_token` |
    /// | `CLASSMATE_TIMEOUT_SECS` | `request_timeout` |
    /// | `CLASSMATE_DEBOUNCE_MS` | `preference_debounce` |
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: env::var("CLASSMATE_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            auth_token: env::var("CLASSMATE_TOKEN").ok().filter(|t| !t.is_empty()),
            request_timeout: env::var("CLASSMATE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            preference_debounce: env::var("CLASSMATE_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.preference_debounce),
            event_capacity: defaults.event_capacity,
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the bearer token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the preference quiet period.
    pub fn with_preference_debounce(mut self, debounce: Duration) -> Self {
        self.preference_debounce = debounce;
        self
    }

    /// Check the configuration before building clients from it.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::InvalidConfig("request_timeout must be non-zero".into()));
        }
        if self.event_capacity == 0 {
            return Err(Error::InvalidConfig("event_capacity must be non-zero".into()));
        }
        Ok(())
    }
}
