//! CLI subcommand modules.
//!
//! This module contains the implementations for all balanza CLI subcommands.

pub(crate) mod columns;
pub(crate) mod insider;
pub(crate) mod market_cap;
pub(crate) mod metrics;
pub(crate) mod prices;

use anyhow::{Context, Result};
use balanza::Date;
use chrono::Local;

/// Parse a date string in YYYY-MM-DD format.
pub(crate) fn parse_date(date_str: &str) -> Result<Date> {
    Date::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date {date_str:?}, expected YYYY-MM-DD"))
}

/// Parse an optional date, defaulting to today's local date.
pub(crate) fn date_or_today(date_str: Option<&str>) -> Result<Date> {
    date_str.map_or_else(|| Ok(Local::now().date_naive()), parse_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-01-15").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("15/01/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_date_or_today() {
        assert_eq!(
            date_or_today(Some("2024-03-31")).unwrap(),
            Date::from_ymd_opt(2024, 3, 31).unwrap()
        );
    }
}
