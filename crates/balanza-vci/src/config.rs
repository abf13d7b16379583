//! Client configuration.

use std::time::Duration;

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://trading.vietcap.com.vn/api";

/// Default path of the financial ratio endpoint. `{ticker}` is substituted.
pub const DEFAULT_RATIO_PATH: &str = "/company/{ticker}/financial-ratio";

/// Settings for [`VciClient`](crate::VciClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VciConfig {
    /// API host, without a trailing slash.
    pub base_url: String,
    /// Ratio endpoint path template.
    pub ratio_path: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for VciConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            ratio_path: DEFAULT_RATIO_PATH.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl VciConfig {
    /// Point the client at another host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use another ratio endpoint.
    #[must_use]
    pub fn with_ratio_path(mut self, ratio_path: impl Into<String>) -> Self {
        self.ratio_path = ratio_path.into();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn ratio_path_for(&self, ticker: &str) -> String {
        self.ratio_path.replace("{ticker}", ticker)
    }
}
