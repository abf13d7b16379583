//! Client configuration.

use std::time::Duration;

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api.financialdatasets.ai";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`FdClient`](crate::FdClient).
///
/// The API key is optional: a handful of tickers are served without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FdConfig {
    /// Sent as the `X-API-KEY` header when set.
    pub api_key: Option<String>,
    /// API host, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for FdConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl FdConfig {
    /// Configuration with the given API key and default endpoints.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Point the client at another host, e.g. a mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
