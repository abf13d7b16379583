//! Default column map for financialdatasets.ai payloads.

use balanza_traits::{ColumnMap, FinancialField, PriceField};

use crate::PROVIDER;

/// Canonical names map to themselves; the API's own spellings are added on
/// top. Capital expenditure is reported as a negative cash flow, so it is
/// flipped into a positive outflow.
#[must_use]
pub fn default_columns() -> ColumnMap {
    ColumnMap::identity(PROVIDER)
        .with("net_income", FinancialField::NetProfit)
        .with_scaled("capital_expenditure", FinancialField::CapitalExpenditures, -1.0)
        .with("time", PriceField::Date)
}
