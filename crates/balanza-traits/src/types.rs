//! Common types used throughout balanza.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::BalanzaError;

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A ticker identifier such as "AAPL" or "FPT".
pub type Ticker = String;

/// Reporting period semantics for financial statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    /// Fiscal year statements.
    Annual,
    /// Single fiscal quarter statements.
    Quarterly,
    /// Trailing twelve months.
    #[default]
    Ttm,
}

impl PeriodKind {
    /// Canonical lowercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarterly => "quarterly",
            Self::Ttm => "ttm",
        }
    }

    /// Whether a row labelled with `other` can satisfy a query for `self`.
    ///
    /// Unlabelled rows (`None`) are compatible with every kind.
    #[must_use]
    pub fn accepts(&self, other: Option<Self>) -> bool {
        other.is_none_or(|kind| kind == *self)
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodKind {
    type Err = BalanzaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" | "year" | "yearly" | "y" | "fy" => Ok(Self::Annual),
            "quarterly" | "quarter" | "q" => Ok(Self::Quarterly),
            "ttm" | "trailing" => Ok(Self::Ttm),
            other => Err(BalanzaError::InvalidData(format!(
                "Unknown period kind: {other}"
            ))),
        }
    }
}
