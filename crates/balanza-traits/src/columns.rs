//! Column canonicalization tables.
//!
//! Every backend spells its columns differently (`"ROE (%)"`, `"P/E"`,
//! `return_on_equity`, `t`/`o`/`h`/`l`/`c`). A [`ColumnMap`] resolves those
//! labels to a [`Canonical`] target and carries the factor that converts the
//! provider's unit into the canonical one. Maps are plain JSON so they can be
//! shipped and overridden without recompiling.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    error::{BalanzaError, Result},
    record::FinancialField,
};

/// Period and identity columns used for row selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaField {
    /// Ticker the row belongs to.
    Ticker,
    /// Statement date (last day of the period).
    ReportPeriod,
    /// Fiscal year number.
    FiscalYear,
    /// Fiscal quarter, 1 to 4; 5 marks a full year.
    FiscalQuarter,
    /// Period label such as "ttm" or "annual".
    PeriodLabel,
    /// Date the statement was filed.
    FilingDate,
}

impl MetaField {
    /// Every meta field.
    pub const ALL: [Self; 6] = [
        Self::Ticker,
        Self::ReportPeriod,
        Self::FiscalYear,
        Self::FiscalQuarter,
        Self::PeriodLabel,
        Self::FilingDate,
    ];

    /// Canonical name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ticker => "ticker",
            Self::ReportPeriod => "report_period",
            Self::FiscalYear => "fiscal_year",
            Self::FiscalQuarter => "fiscal_quarter",
            Self::PeriodLabel => "period",
            Self::FilingDate => "filing_date",
        }
    }
}

/// Daily bar columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    /// Timestamp of the bar.
    Date,
    /// Opening price.
    Open,
    /// Session high.
    High,
    /// Session low.
    Low,
    /// Closing price.
    Close,
    /// Shares traded.
    Volume,
}

impl PriceField {
    /// Every price field.
    pub const ALL: [Self; 6] = [
        Self::Date,
        Self::Open,
        Self::High,
        Self::Low,
        Self::Close,
        Self::Volume,
    ];

    /// Canonical name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
        }
    }
}

/// Insider transaction columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeField {
    /// Insider name.
    Name,
    /// Insider title.
    Title,
    /// Board membership flag.
    IsBoardDirector,
    /// Transaction date.
    TransactionDate,
    /// Shares traded.
    TransactionShares,
    /// Price per share.
    TransactionPricePerShare,
    /// Transaction value.
    TransactionValue,
    /// Holding before.
    SharesOwnedBeforeTransaction,
    /// Holding after.
    SharesOwnedAfterTransaction,
    /// Security traded.
    SecurityTitle,
}

impl TradeField {
    /// Every trade field.
    pub const ALL: [Self; 10] = [
        Self::Name,
        Self::Title,
        Self::IsBoardDirector,
        Self::TransactionDate,
        Self::TransactionShares,
        Self::TransactionPricePerShare,
        Self::TransactionValue,
        Self::SharesOwnedBeforeTransaction,
        Self::SharesOwnedAfterTransaction,
        Self::SecurityTitle,
    ];

    /// Canonical name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
            Self::IsBoardDirector => "is_board_director",
            Self::TransactionDate => "transaction_date",
            Self::TransactionShares => "transaction_shares",
            Self::TransactionPricePerShare => "transaction_price_per_share",
            Self::TransactionValue => "transaction_value",
            Self::SharesOwnedBeforeTransaction => "shares_owned_before_transaction",
            Self::SharesOwnedAfterTransaction => "shares_owned_after_transaction",
            Self::SecurityTitle => "security_title",
        }
    }
}

/// Any canonical column a provider label can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Canonical {
    /// A financial statement field.
    Financial(FinancialField),
    /// A period or identity field.
    Meta(MetaField),
    /// A daily bar field.
    Price(PriceField),
    /// An insider trade field.
    Trade(TradeField),
}

impl Canonical {
    /// Every canonical target.
    pub fn all() -> impl Iterator<Item = Self> {
        FinancialField::ALL
            .into_iter()
            .map(Self::Financial)
            .chain(MetaField::ALL.into_iter().map(Self::Meta))
            .chain(PriceField::ALL.into_iter().map(Self::Price))
            .chain(TradeField::ALL.into_iter().map(Self::Trade))
    }

    /// Canonical name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Financial(f) => f.as_str(),
            Self::Meta(f) => f.as_str(),
            Self::Price(f) => f.as_str(),
            Self::Trade(f) => f.as_str(),
        }
    }
}

impl fmt::Display for Canonical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Canonical {
    type Err = BalanzaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .find(|target| target.as_str() == s)
            .ok_or_else(|| BalanzaError::InvalidData(format!("Unknown canonical column: {s}")))
    }
}

impl From<Canonical> for String {
    fn from(value: Canonical) -> Self {
        value.as_str().to_string()
    }
}

impl TryFrom<String> for Canonical {
    type Error = BalanzaError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FinancialField> for Canonical {
    fn from(value: FinancialField) -> Self {
        Self::Financial(value)
    }
}

impl From<MetaField> for Canonical {
    fn from(value: MetaField) -> Self {
        Self::Meta(value)
    }
}

impl From<PriceField> for Canonical {
    fn from(value: PriceField) -> Self {
        Self::Price(value)
    }
}

impl From<TradeField> for Canonical {
    fn from(value: TradeField) -> Self {
        Self::Trade(value)
    }
}

const fn unit_scale() -> f64 {
    1.0
}

fn is_unit_scale(scale: &f64) -> bool {
    (*scale - 1.0).abs() < f64::EPSILON
}

/// One provider label and where it lands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Label as the provider spells it.
    pub source: String,
    /// Canonical target.
    pub target: Canonical,
    /// Factor applied to numeric values (e.g. 0.01 for percent columns).
    #[serde(default = "unit_scale", skip_serializing_if = "is_unit_scale")]
    pub scale: f64,
}

/// A provider's canonicalization table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMap {
    /// Provider the table describes.
    pub provider: String,
    /// Offset applied when turning instants into calendar dates.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Mappings; later entries take precedence over earlier ones.
    #[serde(default)]
    pub columns: Vec<ColumnMapping>,
}

impl ColumnMap {
    /// Create an empty map.
    #[must_use]
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            utc_offset_minutes: 0,
            columns: Vec::new(),
        }
    }

    /// Map every canonical name to itself.
    #[must_use]
    pub fn identity(provider: impl Into<String>) -> Self {
        let mut map = Self::new(provider);
        map.columns = Canonical::all()
            .map(|target| ColumnMapping {
                source: target.as_str().to_string(),
                target,
                scale: 1.0,
            })
            .collect();
        map
    }

    /// Load a map from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or names an unknown target.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize the map to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add a mapping with unit scale.
    #[must_use]
    pub fn with(self, source: impl Into<String>, target: impl Into<Canonical>) -> Self {
        self.with_scaled(source, target, 1.0)
    }

    /// Add a mapping with an explicit scale.
    #[must_use]
    pub fn with_scaled(
        mut self,
        source: impl Into<String>,
        target: impl Into<Canonical>,
        scale: f64,
    ) -> Self {
        self.columns.push(ColumnMapping {
            source: source.into(),
            target: target.into(),
            scale,
        });
        self
    }

    /// Set the UTC offset used for timestamps.
    #[must_use]
    pub const fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    /// Append the entries of `overrides`, which then take precedence.
    ///
    /// A non-zero offset in `overrides` replaces this map's offset.
    #[must_use]
    pub fn merge(mut self, overrides: Self) -> Self {
        if overrides.utc_offset_minutes != 0 {
            self.utc_offset_minutes = overrides.utc_offset_minutes;
        }
        self.columns.extend(overrides.columns);
        self
    }

    /// Resolve a provider label.
    #[must_use]
    pub fn resolve(&self, label: &str) -> Option<&ColumnMapping> {
        self.columns.iter().rev().find(|m| m.source == label)
    }

    /// Provider labels that resolve to `target`, in precedence order.
    pub fn sources_for(&self, target: Canonical) -> impl Iterator<Item = &ColumnMapping> + '_ {
        self.columns
            .iter()
            .rev()
            .filter(move |m| m.target == target)
            .filter(|m| self.resolve(&m.source).is_some_and(|winner| std::ptr::eq(winner, *m)))
    }
}
