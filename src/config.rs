//! Configuration options for the fitportal client

use std::time::Duration;

use crate::error::{Error, Result};

/// Origin used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Uniform timeout applied to every request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable holding the backend origin
pub const ENV_API_URL: &str = "FITPORTAL_API_URL";

/// Environment variable overriding the request timeout, in seconds
pub const ENV_TIMEOUT_SECS: &str = "FITPORTAL_TIMEOUT_SECS";

/// Configuration options for the fitportal client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The backend origin every request is issued against
    pub base_url: String,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Whether cookies set by the backend are stored and replayed
    pub cookie_store: bool,

    /// Sent as `X-Client-Info` on every request
    pub client_info: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            cookie_store: true,
            client_info: format!("fitportal-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientOptions {
    /// Load options from the process environment.
    ///
    /// Unset variables keep their defaults; malformed values are an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load options through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            if url.trim().is_empty() {
                return Err(Error::config(format!("{} cannot be empty", ENV_API_URL)));
            }
            options.base_url = url.trim().to_string();
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                Error::config(format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))
            })?;
            // 0 disables the timeout
            options.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(options)
    }

    /// Set the backend origin
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set whether the cookie store is enabled
    pub fn with_cookie_store(mut self, value: bool) -> Self {
        self.cookie_store = value;
        self
    }

    /// Set the `X-Client-Info` value
    pub fn with_client_info(mut self, value: &str) -> Self {
        self.client_info = value.to_string();
        self
    }
}
