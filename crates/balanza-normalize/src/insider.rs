//! Insider transactions.

use balanza_traits::{
    BalanzaError, ColumnMap, InsiderTrade, MetaField, RawTable, Result, TradeField,
};
use serde_json::Value;

use crate::canonical::CanonicalRow;

/// Normalize insider filings, newest filing first.
///
/// Rows with the same filing date keep their input order.
///
/// # Errors
///
/// Returns [`BalanzaError::EmptyResult`] when nothing is left for `ticker`
/// and [`BalanzaError::MalformedTimestamp`] for a row without a readable
/// filing date.
pub fn normalize_insider_trades(
    raw: &RawTable,
    ticker: &str,
    columns: &ColumnMap,
) -> Result<Vec<InsiderTrade>> {
    let mut trades = Vec::with_capacity(raw.len());
    for row in raw.rows() {
        let row = CanonicalRow::new(row, columns);
        if !row.belongs_to(ticker) {
            continue;
        }

        let Some(filing_date) = row.date(MetaField::FilingDate) else {
            let value = match row.raw(MetaField::FilingDate) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => "<missing>".to_string(),
            };
            return Err(BalanzaError::MalformedTimestamp {
                ticker: ticker.to_string(),
                row: row.index(),
                value,
            });
        };

        trades.push(InsiderTrade {
            ticker: ticker.to_string(),
            name: row.text(TradeField::Name),
            title: row.text(TradeField::Title),
            is_board_director: row.flag(TradeField::IsBoardDirector),
            transaction_date: row.date(TradeField::TransactionDate),
            transaction_shares: row.number(TradeField::TransactionShares),
            transaction_price_per_share: row.number(TradeField::TransactionPricePerShare),
            transaction_value: row.number(TradeField::TransactionValue),
            shares_owned_before_transaction: row.number(TradeField::SharesOwnedBeforeTransaction),
            shares_owned_after_transaction: row.number(TradeField::SharesOwnedAfterTransaction),
            security_title: row.text(TradeField::SecurityTitle),
            filing_date,
        });
    }

    if trades.is_empty() {
        return Err(BalanzaError::EmptyResult {
            ticker: ticker.to_string(),
            what: "insider trades",
        });
    }

    trades.sort_by(|a, b| b.filing_date.cmp(&a.filing_date));
    Ok(trades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use balanza_traits::Date;
    use serde_json::json;

    fn table(value: Value) -> RawTable {
        RawTable::from_json_value(value).unwrap()
    }

    #[test]
    fn test_trades_are_normalized_and_sorted() {
        let raw = table(json!([
            {
                "ticker": "AAPL",
                "name": "Jane Doe",
                "title": "CFO",
                "is_board_director": false,
                "transaction_date": "2024-02-01",
                "transaction_shares": "-1000",
                "transaction_price_per_share": 185.5,
                "filing_date": "2024-02-03"
            },
            {"ticker": "AAPL", "name": "John Roe", "filing_date": "2024-03-01"},
            {"ticker": "AAPL", "name": "Third", "filing_date": "2024-02-03"}
        ]));
        let trades = normalize_insider_trades(&raw, "AAPL", &ColumnMap::identity("t")).unwrap();

        let names: Vec<_> = trades.iter().map(|t| t.name.as_deref().unwrap()).collect();
        assert_eq!(names, ["John Roe", "Jane Doe", "Third"]);

        let jane = &trades[1];
        assert_eq!(jane.title.as_deref(), Some("CFO"));
        assert_eq!(jane.is_board_director, Some(false));
        assert_eq!(jane.transaction_date, Date::from_ymd_opt(2024, 2, 1));
        assert_relative_eq!(jane.transaction_shares.unwrap(), -1000.0);
        assert_relative_eq!(jane.transaction_price_per_share.unwrap(), 185.5);
        assert_eq!(jane.transaction_value, None);
    }

    #[test]
    fn test_missing_filing_date() {
        let raw = table(json!([{"name": "Jane Doe", "filing_date": null}]));
        let result = normalize_insider_trades(&raw, "AAPL", &ColumnMap::identity("t"));
        assert!(matches!(
            result,
            Err(BalanzaError::MalformedTimestamp { row: 0, .. })
        ));
    }

    #[test]
    fn test_empty_result() {
        let result = normalize_insider_trades(&RawTable::new(), "AAPL", &ColumnMap::identity("t"));
        assert!(matches!(result, Err(BalanzaError::EmptyResult { .. })));

        let raw = table(json!([{"ticker": "MSFT", "filing_date": "2024-01-01"}]));
        let result = normalize_insider_trades(&raw, "AAPL", &ColumnMap::identity("t"));
        assert!(matches!(result, Err(BalanzaError::EmptyResult { .. })));
    }
}
