//! Error types for the balanza workspace.
//!
//! Every failure that reaches a caller is one of the variants below. Record
//! and request level problems abort the call; a single bad numeric cell never
//! does, it becomes a missing value instead.

use crate::types::{Date, PeriodKind};
use thiserror::Error;

/// Boxed error used to carry a provider's own failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for balanza operations.
#[derive(Debug, Error)]
pub enum BalanzaError {
    /// No raw row matched the requested reporting period.
    #[error("No {period_kind} period matching {report_period} for {ticker}")]
    NoMatchingPeriod {
        /// Requested ticker.
        ticker: String,
        /// Requested statement date.
        report_period: Date,
        /// Requested period semantics.
        period_kind: PeriodKind,
    },

    /// Several rows matched and the filing date could not break the tie.
    #[error("{candidates} rows match period ending {period_end} for {ticker}")]
    AmbiguousPeriod {
        /// Requested ticker.
        ticker: String,
        /// Period end shared by the candidates.
        period_end: Date,
        /// Number of rows that matched.
        candidates: usize,
    },

    /// A per-share field needed `outstanding_shares` and it was zero or absent.
    #[error("outstanding_shares is zero or absent while deriving {field} for {ticker}")]
    DivisionByZero {
        /// Ticker of the record being built.
        ticker: String,
        /// Field that could not be derived.
        field: String,
    },

    /// A date cell could not be parsed.
    #[error("Malformed timestamp {value:?} in row {row} for {ticker}")]
    MalformedTimestamp {
        /// Ticker of the payload.
        ticker: String,
        /// Zero-based index of the offending input row.
        row: usize,
        /// The raw cell rendered as text.
        value: String,
    },

    /// The provider returned no rows where at least one is required.
    #[error("No {what} returned for {ticker}")]
    EmptyResult {
        /// Requested ticker.
        ticker: String,
        /// What was being fetched.
        what: &'static str,
    },

    /// A required canonical field was not present in the payload.
    #[error("Missing field {field} for {ticker}")]
    MissingField {
        /// Requested ticker.
        ticker: String,
        /// Canonical field name.
        field: String,
    },

    /// The backend failed; the original error is kept as the source.
    #[error("Provider {provider} unavailable: {source}")]
    ProviderUnavailable {
        /// Provider name.
        provider: String,
        /// Underlying failure.
        #[source]
        source: BoxError,
    },

    /// The backend has no data for the request.
    #[error("Provider {provider} has no {what}")]
    NotFound {
        /// Provider name.
        provider: String,
        /// Description of the missing resource.
        what: String,
    },

    /// The backend does not offer this operation.
    #[error("Provider {provider} does not support {operation}")]
    Unsupported {
        /// Provider name.
        provider: String,
        /// Operation name.
        operation: &'static str,
    },

    /// Error due to invalid or malformed input.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl BalanzaError {
    /// Wrap a provider failure without losing it.
    pub fn unavailable(
        provider: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::ProviderUnavailable {
            provider: provider.into(),
            source: source.into(),
        }
    }

    /// Build a [`BalanzaError::NotFound`].
    pub fn not_found(provider: impl Into<String>, what: impl Into<String>) -> Self {
        Self::NotFound {
            provider: provider.into(),
            what: what.into(),
        }
    }

    /// Whether the error came from the data provider rather than the pipeline.
    #[must_use]
    pub const fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable { .. } | Self::NotFound { .. } | Self::Unsupported { .. }
        )
    }
}

/// A specialized Result type for balanza operations.
pub type Result<T> = std::result::Result<T, BalanzaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = BalanzaError::DivisionByZero {
            ticker: "FPT".to_string(),
            field: "earnings_per_share".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "outstanding_shares is zero or absent while deriving earnings_per_share for FPT"
        );

        let err = BalanzaError::EmptyResult {
            ticker: "AAPL".to_string(),
            what: "prices",
        };
        assert_eq!(err.to_string(), "No prices returned for AAPL");
    }

    #[test]
    fn test_no_matching_period_display() {
        let err = BalanzaError::NoMatchingPeriod {
            ticker: "AAPL".to_string(),
            report_period: Date::from_ymd_opt(2024, 12, 31).unwrap(),
            period_kind: PeriodKind::Annual,
        };
        assert_eq!(
            err.to_string(),
            "No annual period matching 2024-12-31 for AAPL"
        );
    }

    #[test]
    fn test_unavailable_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = BalanzaError::unavailable("financialdatasets", io);
        assert!(err.is_provider_error());
        assert_eq!(err.source().unwrap().to_string(), "timed out");
    }

    #[test]
    fn test_pipeline_errors_are_not_provider_errors() {
        let err = BalanzaError::InvalidData("bad".to_string());
        assert!(!err.is_provider_error());
        assert!(BalanzaError::not_found("vci", "prices for XYZ").is_provider_error());
    }
}
