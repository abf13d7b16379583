//! Canonical records produced by the normalization pipeline.
//!
//! Missing values are `None`. A record always carries every canonical field,
//! so two records for different providers have exactly the same shape.

use serde::{
    Deserialize, Serialize,
    ser::{SerializeMap, Serializer},
};
use std::{fmt, str::FromStr};

use crate::{
    error::BalanzaError,
    types::{Date, PeriodKind, Ticker},
};

/// Canonical financial statement fields.
///
/// Percentages are stored as decimal fractions (`0.12` for 12%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FinancialField {
    /// Market capitalization.
    MarketCap,
    /// Enterprise value.
    EnterpriseValue,
    /// Price to earnings ratio.
    PriceToEarningsRatio,
    /// Price to book ratio.
    PriceToBookRatio,
    /// Price to sales ratio.
    PriceToSalesRatio,
    /// Enterprise value to EBITDA.
    EnterpriseValueToEbitdaRatio,
    /// Enterprise value to revenue.
    EnterpriseValueToRevenueRatio,
    /// Free cash flow yield.
    FreeCashFlowYield,
    /// Price/earnings to growth.
    PegRatio,
    /// Gross margin.
    GrossMargin,
    /// Operating margin.
    OperatingMargin,
    /// Net margin.
    NetMargin,
    /// Return on equity.
    ReturnOnEquity,
    /// Return on assets.
    ReturnOnAssets,
    /// Return on invested capital.
    ReturnOnInvestedCapital,
    /// Asset turnover.
    AssetTurnover,
    /// Inventory turnover.
    InventoryTurnover,
    /// Receivables turnover.
    ReceivablesTurnover,
    /// Days sales outstanding.
    DaysSalesOutstanding,
    /// Operating cycle in days.
    OperatingCycle,
    /// Working capital turnover.
    WorkingCapitalTurnover,
    /// Current ratio.
    CurrentRatio,
    /// Quick ratio.
    QuickRatio,
    /// Cash ratio.
    CashRatio,
    /// Operating cash flow ratio.
    OperatingCashFlowRatio,
    /// Debt to equity.
    DebtToEquity,
    /// Debt to assets.
    DebtToAssets,
    /// Interest coverage.
    InterestCoverage,
    /// Revenue growth.
    RevenueGrowth,
    /// Earnings growth.
    EarningsGrowth,
    /// Book value growth.
    BookValueGrowth,
    /// EPS growth.
    EarningsPerShareGrowth,
    /// Free cash flow growth.
    FreeCashFlowGrowth,
    /// Operating income growth.
    OperatingIncomeGrowth,
    /// EBITDA growth.
    EbitdaGrowth,
    /// Payout ratio.
    PayoutRatio,
    /// Earnings per share.
    EarningsPerShare,
    /// Book value per share.
    BookValuePerShare,
    /// Free cash flow per share.
    FreeCashFlowPerShare,
    /// Net profit attributable to shareholders.
    NetProfit,
    /// Cash flow from operations.
    OperatingCashFlow,
    /// Capital expenditures, as a positive outflow.
    CapitalExpenditures,
    /// Shares outstanding.
    OutstandingShares,
    /// Free cash flow.
    FreeCashFlow,
    /// Price per share.
    PricePerShare,
}

impl FinancialField {
    /// Number of canonical fields.
    pub const COUNT: usize = 45;

    /// Every field, in record order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::MarketCap,
        Self::EnterpriseValue,
        Self::PriceToEarningsRatio,
        Self::PriceToBookRatio,
        Self::PriceToSalesRatio,
        Self::EnterpriseValueToEbitdaRatio,
        Self::EnterpriseValueToRevenueRatio,
        Self::FreeCashFlowYield,
        Self::PegRatio,
        Self::GrossMargin,
        Self::OperatingMargin,
        Self::NetMargin,
        Self::ReturnOnEquity,
        Self::ReturnOnAssets,
        Self::ReturnOnInvestedCapital,
        Self::AssetTurnover,
        Self::InventoryTurnover,
        Self::ReceivablesTurnover,
        Self::DaysSalesOutstanding,
        Self::OperatingCycle,
        Self::WorkingCapitalTurnover,
        Self::CurrentRatio,
        Self::QuickRatio,
        Self::CashRatio,
        Self::OperatingCashFlowRatio,
        Self::DebtToEquity,
        Self::DebtToAssets,
        Self::InterestCoverage,
        Self::RevenueGrowth,
        Self::EarningsGrowth,
        Self::BookValueGrowth,
        Self::EarningsPerShareGrowth,
        Self::FreeCashFlowGrowth,
        Self::OperatingIncomeGrowth,
        Self::EbitdaGrowth,
        Self::PayoutRatio,
        Self::EarningsPerShare,
        Self::BookValuePerShare,
        Self::FreeCashFlowPerShare,
        Self::NetProfit,
        Self::OperatingCashFlow,
        Self::CapitalExpenditures,
        Self::OutstandingShares,
        Self::FreeCashFlow,
        Self::PricePerShare,
    ];

    /// Canonical snake_case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MarketCap => "market_cap",
            Self::EnterpriseValue => "enterprise_value",
            Self::PriceToEarningsRatio => "price_to_earnings_ratio",
            Self::PriceToBookRatio => "price_to_book_ratio",
            Self::PriceToSalesRatio => "price_to_sales_ratio",
            Self::EnterpriseValueToEbitdaRatio => "enterprise_value_to_ebitda_ratio",
            Self::EnterpriseValueToRevenueRatio => "enterprise_value_to_revenue_ratio",
            Self::FreeCashFlowYield => "free_cash_flow_yield",
            Self::PegRatio => "peg_ratio",
            Self::GrossMargin => "gross_margin",
            Self::OperatingMargin => "operating_margin",
            Self::NetMargin => "net_margin",
            Self::ReturnOnEquity => "return_on_equity",
            Self::ReturnOnAssets => "return_on_assets",
            Self::ReturnOnInvestedCapital => "return_on_invested_capital",
            Self::AssetTurnover => "asset_turnover",
            Self::InventoryTurnover => "inventory_turnover",
            Self::ReceivablesTurnover => "receivables_turnover",
            Self::DaysSalesOutstanding => "days_sales_outstanding",
            Self::OperatingCycle => "operating_cycle",
            Self::WorkingCapitalTurnover => "working_capital_turnover",
            Self::CurrentRatio => "current_ratio",
            Self::QuickRatio => "quick_ratio",
            Self::CashRatio => "cash_ratio",
            Self::OperatingCashFlowRatio => "operating_cash_flow_ratio",
            Self::DebtToEquity => "debt_to_equity",
            Self::DebtToAssets => "debt_to_assets",
            Self::InterestCoverage => "interest_coverage",
            Self::RevenueGrowth => "revenue_growth",
            Self::EarningsGrowth => "earnings_growth",
            Self::BookValueGrowth => "book_value_growth",
            Self::EarningsPerShareGrowth => "earnings_per_share_growth",
            Self::FreeCashFlowGrowth => "free_cash_flow_growth",
            Self::OperatingIncomeGrowth => "operating_income_growth",
            Self::EbitdaGrowth => "ebitda_growth",
            Self::PayoutRatio => "payout_ratio",
            Self::EarningsPerShare => "earnings_per_share",
            Self::BookValuePerShare => "book_value_per_share",
            Self::FreeCashFlowPerShare => "free_cash_flow_per_share",
            Self::NetProfit => "net_profit",
            Self::OperatingCashFlow => "operating_cash_flow",
            Self::CapitalExpenditures => "capital_expenditures",
            Self::OutstandingShares => "outstanding_shares",
            Self::FreeCashFlow => "free_cash_flow",
            Self::PricePerShare => "price_per_share",
        }
    }

    /// Position of the field in [`FinancialField::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the pipeline can compute this field from others.
    #[must_use]
    pub const fn is_derived(&self) -> bool {
        matches!(
            self,
            Self::FreeCashFlow
                | Self::FreeCashFlowPerShare
                | Self::EarningsPerShare
                | Self::PricePerShare
                | Self::MarketCap
        )
    }
}

impl fmt::Display for FinancialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FinancialField {
    type Err = BalanzaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| BalanzaError::InvalidData(format!("Unknown financial field: {s}")))
    }
}

/// One normalized row per (ticker, reporting period).
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialRecord {
    ticker: Ticker,
    period_end: Date,
    period_kind: PeriodKind,
    values: [Option<f64>; FinancialField::COUNT],
}

impl FinancialRecord {
    /// Create a record with every field missing.
    #[must_use]
    pub fn new(ticker: impl Into<Ticker>, period_end: Date, period_kind: PeriodKind) -> Self {
        Self {
            ticker: ticker.into(),
            period_end,
            period_kind,
            values: [None; FinancialField::COUNT],
        }
    }

    /// Ticker symbol.
    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Last day of the reporting period.
    #[must_use]
    pub const fn period_end(&self) -> Date {
        self.period_end
    }

    /// Period semantics the record was selected under.
    #[must_use]
    pub const fn period_kind(&self) -> PeriodKind {
        self.period_kind
    }

    /// Value of a field, `None` when missing.
    #[must_use]
    pub const fn get(&self, field: FinancialField) -> Option<f64> {
        self.values[field.index()]
    }

    /// Set a field. Non-finite values are stored as missing.
    pub fn set(&mut self, field: FinancialField, value: Option<f64>) {
        self.values[field.index()] = value.filter(|v| v.is_finite());
    }

    /// Iterate `(field, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (FinancialField, Option<f64>)> + '_ {
        FinancialField::ALL
            .iter()
            .map(|field| (*field, self.values[field.index()]))
    }

    /// Number of fields that carry a value.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

impl Serialize for FinancialRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FinancialField::COUNT + 3))?;
        map.serialize_entry("ticker", &self.ticker)?;
        map.serialize_entry("period_end", &self.period_end)?;
        map.serialize_entry("period", &self.period_kind)?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.as_str(), &value)?;
        }
        map.end()
    }
}

/// One daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Ticker symbol.
    pub ticker: Ticker,
    /// Trading day.
    pub date: Date,
    /// Opening price.
    pub open: Option<f64>,
    /// Session high.
    pub high: Option<f64>,
    /// Session low.
    pub low: Option<f64>,
    /// Closing price.
    pub close: Option<f64>,
    /// Shares traded.
    pub volume: Option<u64>,
}

impl PriceRecord {
    /// Create a bar with all values missing.
    #[must_use]
    pub fn empty(ticker: impl Into<Ticker>, date: Date) -> Self {
        Self {
            ticker: ticker.into(),
            date,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
        }
    }
}

/// A reported insider transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsiderTrade {
    /// Ticker symbol.
    pub ticker: Ticker,
    /// Insider name.
    pub name: Option<String>,
    /// Insider title.
    pub title: Option<String>,
    /// Whether the insider sits on the board.
    pub is_board_director: Option<bool>,
    /// Date of the transaction.
    pub transaction_date: Option<Date>,
    /// Shares bought (positive) or sold (negative).
    pub transaction_shares: Option<f64>,
    /// Price per share.
    pub transaction_price_per_share: Option<f64>,
    /// Total transaction value.
    pub transaction_value: Option<f64>,
    /// Holding before the transaction.
    pub shares_owned_before_transaction: Option<f64>,
    /// Holding after the transaction.
    pub shares_owned_after_transaction: Option<f64>,
    /// Security traded.
    pub security_title: Option<String>,
    /// Date the filing was made.
    pub filing_date: Date,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_field_table_is_consistent() {
        for (i, field) in FinancialField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
            assert_eq!(field.as_str().parse::<FinancialField>().unwrap(), *field);
        }
    }

    #[test]
    fn test_derived_fields() {
        let derived: Vec<_> = FinancialField::ALL
            .iter()
            .filter(|f| f.is_derived())
            .collect();
        assert_eq!(derived.len(), 5);
        assert!(!FinancialField::OutstandingShares.is_derived());
    }

    #[test]
    fn test_new_record_is_fully_missing() {
        let record = FinancialRecord::new("AAPL", date(2023, 12, 31), PeriodKind::Annual);
        assert_eq!(record.iter().count(), FinancialField::COUNT);
        assert_eq!(record.present_count(), 0);
    }

    #[test]
    fn test_set_rejects_non_finite() {
        let mut record = FinancialRecord::new("AAPL", date(2023, 12, 31), PeriodKind::Ttm);
        record.set(FinancialField::NetMargin, Some(0.25));
        record.set(FinancialField::PegRatio, Some(f64::INFINITY));
        record.set(FinancialField::CurrentRatio, Some(f64::NAN));
        assert_eq!(record.get(FinancialField::NetMargin), Some(0.25));
        assert_eq!(record.get(FinancialField::PegRatio), None);
        assert_eq!(record.get(FinancialField::CurrentRatio), None);
    }

    #[test]
    fn test_record_serializes_every_field() {
        let mut record = FinancialRecord::new("FPT", date(2023, 12, 31), PeriodKind::Annual);
        record.set(FinancialField::EarningsPerShare, Some(2.0));
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), FinancialField::COUNT + 3);
        assert_eq!(obj["ticker"], "FPT");
        assert_eq!(obj["period_end"], "2023-12-31");
        assert_eq!(obj["period"], "annual");
        assert_eq!(obj["earnings_per_share"], 2.0);
        assert!(obj["market_cap"].is_null());
    }

    #[test]
    fn test_price_record_empty() {
        let bar = PriceRecord::empty("AAPL", date(2024, 1, 2));
        assert_eq!(bar.close, None);
        assert_eq!(bar.volume, None);
    }
}
