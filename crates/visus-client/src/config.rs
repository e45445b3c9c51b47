//! Configuration for the array client.

use std::time::Duration;

use reqwest::Url;
use seaview_common::{FieldError, FieldResult};

/// Default array server, as started by the reference Flask service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/";

/// Configuration for [`crate::VisusClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Array server endpoint the query string is appended to
    pub base_url: String,
    /// Whole-request timeout, including reading the body
    pub request_timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            // Remote datasets are read through on a cache miss; large cuts are slow.
            request_timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SEAVIEW_BASE_URL") {
            config.base_url = val;
        }

        if let Ok(val) = std::env::var("SEAVIEW_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.request_timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(val) = std::env::var("SEAVIEW_CONNECT_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.connect_timeout = Duration::from_secs(secs);
            }
        }

        config
    }

    /// Parse the base URL.
    pub fn parsed_base_url(&self) -> FieldResult<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| FieldError::config(format!("invalid base URL '{}': {}", self.base_url, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(FieldError::config(format!(
                "base URL scheme must be http or https, got '{}'",
                other
            ))),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> FieldResult<()> {
        self.parsed_base_url()?;

        if self.request_timeout.is_zero() {
            return Err(FieldError::config("request_timeout must be > 0"));
        }

        if self.connect_timeout.is_zero() {
            return Err(FieldError::config("connect_timeout must be > 0"));
        }

        Ok(())
    }
}
