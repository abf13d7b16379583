//! Error types for the financialdatasets.ai client.

use balanza_traits::BalanzaError;
use thiserror::Error;

use crate::PROVIDER;

/// Errors that can occur when talking to financialdatasets.ai.
#[derive(Debug, Error)]
pub enum FdError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned a non-success status.
    #[error("financialdatasets.ai API error: HTTP {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The response lacked its payload key.
    #[error("Response has no `{0}` payload")]
    MissingPayload(&'static str),
}

impl From<FdError> for BalanzaError {
    fn from(err: FdError) -> Self {
        match err {
            FdError::NotFound(what) => Self::not_found(PROVIDER, what),
            other => Self::unavailable(PROVIDER, other),
        }
    }
}
