//! Rendering of canonical records.

use anyhow::Result;
use balanza::FinancialRecord;
use clap::ValueEnum;
use serde::Serialize;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// Human-readable tables
    Table,
    /// Pretty-printed JSON on stdout
    Json,
}

/// Print `value` as pretty JSON.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Two-column listing of a record's fields.
///
/// Missing fields are shown as `-` unless `present_only` is set.
pub(crate) fn record_table(record: &FinancialRecord, present_only: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("Ticker: {}\n", record.ticker()));
    out.push_str(&format!(
        "Period: {} ({})\n\n",
        record.period_end(),
        record.period_kind()
    ));
    out.push_str(&format!("{:<36} {:>20}\n", "Field", "Value"));
    out.push_str(&format!("{}\n", "-".repeat(57)));
    for (field, value) in record.iter() {
        let cell = match value {
            Some(v) => format_value(v),
            None if !present_only => "-".to_string(),
            None => continue,
        };
        out.push_str(&format!("{:<36} {:>20}\n", field.as_str(), cell));
    }
    out
}

/// Compact rendering: large magnitudes without decimals, small ones with four.
pub(crate) fn format_value(value: f64) -> String {
    if value.abs() >= 1e6 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balanza::{Date, FinancialField, PeriodKind};

    fn record() -> FinancialRecord {
        let mut record = FinancialRecord::new(
            "AAPL",
            Date::from_ymd_opt(2023, 12, 31).unwrap(),
            PeriodKind::Ttm,
        );
        record.set(FinancialField::EarningsPerShare, Some(2.0));
        record.set(FinancialField::MarketCap, Some(3.0e12));
        record
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(2.0), "2.0000");
        assert_eq!(format_value(-0.125), "-0.1250");
        assert_eq!(format_value(3.0e12), "3000000000000");
    }

    #[test]
    fn test_record_table() {
        let full = record_table(&record(), false);
        assert!(full.contains("Ticker: AAPL"));
        assert!(full.contains("Period: 2023-12-31 (ttm)"));
        assert!(full.lines().any(|l| l.starts_with("earnings_per_share") && l.ends_with("2.0000")));
        assert!(full.lines().any(|l| l.starts_with("gross_margin") && l.ends_with('-')));

        let present = record_table(&record(), true);
        assert!(!present.contains("gross_margin"));
        assert!(present.contains("market_cap"));
    }
}
