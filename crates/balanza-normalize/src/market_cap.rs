//! Market capitalization.

use balanza_traits::{BalanzaError, ColumnMap, FinancialField, RawTable, Result};
use tracing::debug;

use crate::canonical::CanonicalRow;

/// Extract a single market capitalization in the provider's currency.
///
/// The row with the latest period wins; rows without a period only count
/// when no row has one. A row without a reported value falls back to
/// `outstanding_shares * price_per_share`.
///
/// # Errors
///
/// Returns [`BalanzaError::EmptyResult`] for an empty table and
/// [`BalanzaError::MissingField`] when no row yields a value.
pub fn normalize_market_cap(raw: &RawTable, ticker: &str, columns: &ColumnMap) -> Result<f64> {
    let rows: Vec<CanonicalRow<'_>> = raw
        .rows()
        .map(|row| CanonicalRow::new(row, columns))
        .filter(|row| row.belongs_to(ticker))
        .collect();
    if rows.is_empty() {
        return Err(BalanzaError::EmptyResult {
            ticker: ticker.to_string(),
            what: "market cap",
        });
    }

    let dated = rows
        .iter()
        .filter_map(|row| row.period_end().map(|end| (end, row)))
        .max_by_key(|(end, _)| *end)
        .map(|(_, row)| row);
    let row = dated.unwrap_or(&rows[0]);

    let value = row.number(FinancialField::MarketCap).or_else(|| {
        let shares = row.number(FinancialField::OutstandingShares)?;
        let price = row.number(FinancialField::PricePerShare)?;
        debug!(ticker, shares, price, "market cap derived from share count");
        Some(shares * price)
    })
    .filter(|v| v.is_finite());

    value.ok_or_else(|| BalanzaError::MissingField {
        ticker: ticker.to_string(),
        field: FinancialField::MarketCap.as_str().to_string(),
    })
}
