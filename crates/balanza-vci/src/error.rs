//! Error types for the VCI client.

use balanza_traits::BalanzaError;
use thiserror::Error;

use crate::PROVIDER;

/// Errors that can occur when talking to VCI.
#[derive(Debug, Error)]
pub enum VciError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned a non-success status.
    #[error("VCI API error: HTTP {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// Symbol or resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The response lacked its payload.
    #[error("Response has no `{0}` payload")]
    MissingPayload(&'static str),
}

impl From<VciError> for BalanzaError {
    fn from(err: VciError) -> Self {
        match err {
            VciError::NotFound(what) => Self::not_found(PROVIDER, what),
            other => Self::unavailable(PROVIDER, other),
        }
    }
}
