//! Daily price bars.

use std::collections::BTreeMap;

use balanza_traits::{
    BalanzaError, ColumnMap, Date, PriceField, PriceRecord, RawTable, Result,
};
use serde_json::Value;
use tracing::debug;

use crate::{canonical::CanonicalRow, coerce};

/// Turn raw bars into records sorted by date, one per trading day.
///
/// When two rows share a date the later row wins. Unparseable prices or
/// volumes are stored as missing.
///
/// # Errors
///
/// Returns [`BalanzaError::EmptyResult`] for an empty table and
/// [`BalanzaError::MalformedTimestamp`] for a row whose date is absent or
/// unreadable.
pub fn normalize_prices(
    raw: &RawTable,
    ticker: &str,
    columns: &ColumnMap,
) -> Result<Vec<PriceRecord>> {
    if raw.is_empty() {
        return Err(BalanzaError::EmptyResult {
            ticker: ticker.to_string(),
            what: "prices",
        });
    }

    let mut bars: BTreeMap<Date, PriceRecord> = BTreeMap::new();
    for row in raw.rows() {
        let row = CanonicalRow::new(row, columns);
        if !row.belongs_to(ticker) {
            continue;
        }

        let Some(date) = row.date(PriceField::Date) else {
            let value = match row.raw(PriceField::Date) {
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

        let bar = PriceRecord {
            ticker: ticker.to_string(),
            date,
            open: row.number(PriceField::Open),
            high: row.number(PriceField::High),
            low: row.number(PriceField::Low),
            close: row.number(PriceField::Close),
            volume: row.number(PriceField::Volume).and_then(coerce::to_volume),
        };
        if bars.insert(date, bar).is_some() {
            debug!(ticker, %date, row = row.index(), "duplicate bar replaced");
        }
    }

    if bars.is_empty() {
        return Err(BalanzaError::EmptyResult {
            ticker: ticker.to_string(),
            what: "prices",
        });
    }

    Ok(bars.into_values().collect())
}
