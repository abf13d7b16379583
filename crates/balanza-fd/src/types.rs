//! Request and response envelopes.
//!
//! Rows are kept as JSON objects. Their keys are mapped later through the
//! provider's column map, so nothing here names a metric.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single JSON record as returned by the API.
pub type Record = Map<String, Value>;

/// Line items fetched alongside the metrics endpoint.
pub const LINE_ITEMS: [&str; 4] = [
    "operating_cash_flow",
    "capital_expenditure",
    "net_income",
    "outstanding_shares",
];

/// Response of `GET /financial-metrics/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinancialMetricsResponse {
    /// Metric rows, newest first.
    #[serde(default)]
    pub financial_metrics: Option<Vec<Record>>,
}

/// Body of `POST /financials/search/line-items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemRequest {
    /// Tickers to search.
    pub tickers: Vec<String>,
    /// Line item names.
    pub line_items: Vec<String>,
    /// `annual`, `quarterly` or `ttm`.
    pub period: String,
    /// Maximum rows per ticker.
    pub limit: usize,
}

/// Response of `POST /financials/search/line-items`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineItemResponse {
    /// Matching rows.
    #[serde(default)]
    pub search_results: Option<Vec<Record>>,
}

/// Response of `GET /insider-trades/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsiderTradesResponse {
    /// Trades, newest filing first.
    #[serde(default)]
    pub insider_trades: Option<Vec<Record>>,
}

/// Response of `GET /company/facts/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyFactsResponse {
    /// Company facts, including `market_cap`.
    #[serde(default)]
    pub company_facts: Option<Record>,
}

/// Response of `GET /prices/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricesResponse {
    /// Daily bars.
    #[serde(default)]
    pub prices: Option<Vec<Record>>,
}
