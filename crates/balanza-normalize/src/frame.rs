//! Polars views of normalized records.
//!
//! Each record type becomes one row. Dates are stored as polars `Date`
//! columns and missing values as nulls.

use balanza_traits::{Date, FinancialField, FinancialRecord, InsiderTrade, PriceRecord};
use chrono::Datelike;
use polars::prelude::*;

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Conversion of normalized records into a [`DataFrame`].
pub trait ToFrame {
    /// Build a frame with one row per record.
    ///
    /// # Errors
    ///
    /// Returns an error if polars rejects a column.
    fn to_frame(&self) -> PolarsResult<DataFrame>;
}

fn date_column(name: &str, dates: impl Iterator<Item = Option<Date>>) -> PolarsResult<Column> {
    let days: Vec<Option<i32>> = dates
        .map(|d| d.map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE))
        .collect();
    Ok(Series::new(name.into(), days).cast(&DataType::Date)?.into())
}

impl ToFrame for [PriceRecord] {
    fn to_frame(&self) -> PolarsResult<DataFrame> {
        let tickers: Vec<&str> = self.iter().map(|r| r.ticker.as_str()).collect();
        let opens: Vec<Option<f64>> = self.iter().map(|r| r.open).collect();
        let highs: Vec<Option<f64>> = self.iter().map(|r| r.high).collect();
        let lows: Vec<Option<f64>> = self.iter().map(|r| r.low).collect();
        let closes: Vec<Option<f64>> = self.iter().map(|r| r.close).collect();
        let volumes: Vec<Option<u64>> = self.iter().map(|r| r.volume).collect();

        DataFrame::new(vec![
            Series::new("ticker".into(), tickers).into(),
            date_column("date", self.iter().map(|r| Some(r.date)))?,
            Series::new("open".into(), opens).into(),
            Series::new("high".into(), highs).into(),
            Series::new("low".into(), lows).into(),
            Series::new("close".into(), closes).into(),
            Series::new("volume".into(), volumes).into(),
        ])
    }
}

impl ToFrame for [FinancialRecord] {
    fn to_frame(&self) -> PolarsResult<DataFrame> {
        let tickers: Vec<&str> = self.iter().map(FinancialRecord::ticker).collect();
        let kinds: Vec<&str> = self.iter().map(|r| r.period_kind().as_str()).collect();

        let mut columns: Vec<Column> = Vec::with_capacity(FinancialField::COUNT + 3);
        columns.push(Series::new("ticker".into(), tickers).into());
        columns.push(date_column(
            "period_end",
            self.iter().map(|r| Some(r.period_end())),
        )?);
        columns.push(Series::new("period".into(), kinds).into());
        for field in FinancialField::ALL {
            let values: Vec<Option<f64>> = self.iter().map(|r| r.get(field)).collect();
            columns.push(Series::new(field.as_str().into(), values).into());
        }

        DataFrame::new(columns)
    }
}

fn pluck<'a, T>(trades: &'a [InsiderTrade], f: impl Fn(&'a InsiderTrade) -> T) -> Vec<T> {
    trades.iter().map(f).collect()
}

impl ToFrame for [InsiderTrade] {
    fn to_frame(&self) -> PolarsResult<DataFrame> {
        let tickers: Vec<&str> = self.iter().map(|t| t.ticker.as_str()).collect();
        let directors: Vec<Option<bool>> = self.iter().map(|t| t.is_board_director).collect();

        DataFrame::new(vec![
            Series::new("ticker".into(), tickers).into(),
            Series::new("name".into(), pluck(self, |t| t.name.as_deref())).into(),
            Series::new("title".into(), pluck(self, |t| t.title.as_deref())).into(),
            Series::new("is_board_director".into(), directors).into(),
            date_column("transaction_date", self.iter().map(|t| t.transaction_date))?,
            Series::new(
                "transaction_shares".into(),
                pluck(self, |t| t.transaction_shares),
            )
            .into(),
            Series::new(
                "transaction_price_per_share".into(),
                pluck(self, |t| t.transaction_price_per_share),
            )
            .into(),
            Series::new("transaction_value".into(), pluck(self, |t| t.transaction_value)).into(),
            Series::new(
                "shares_owned_before_transaction".into(),
                pluck(self, |t| t.shares_owned_before_transaction),
            )
            .into(),
            Series::new(
                "shares_owned_after_transaction".into(),
                pluck(self, |t| t.shares_owned_after_transaction),
            )
            .into(),
            Series::new(
                "security_title".into(),
                pluck(self, |t| t.security_title.as_deref()),
            )
            .into(),
            date_column("filing_date", self.iter().map(|t| Some(t.filing_date)))?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balanza_traits::PeriodKind;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_price_frame() {
        let mut first = PriceRecord::empty("AAPL", date(2024, 1, 1));
        first.close = Some(100.0);
        first.volume = Some(500);
        let second = PriceRecord::empty("AAPL", date(2024, 1, 2));

        let df = [first, second].to_frame().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 7);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("close").unwrap().null_count(), 1);
        assert_eq!(df.column("volume").unwrap().dtype(), &DataType::UInt64);
    }

    #[test]
    fn test_epoch_day_offset() {
        let column = date_column("d", [Some(date(1970, 1, 2)), None].into_iter()).unwrap();
        let days = column
            .as_materialized_series()
            .cast(&DataType::Int32)
            .unwrap();
        let days = days.i32().unwrap();
        assert_eq!(days.get(0), Some(1));
        assert_eq!(days.get(1), None);
    }

    #[test]
    fn test_financial_frame_has_every_field() {
        let mut record = FinancialRecord::new("FPT", date(2023, 12, 31), PeriodKind::Annual);
        record.set(FinancialField::NetMargin, Some(0.2));

        let df = vec![record].to_frame().unwrap();
        assert_eq!(df.width(), FinancialField::COUNT + 3);
        assert_eq!(df.column("net_margin").unwrap().null_count(), 0);
        assert_eq!(df.column("market_cap").unwrap().null_count(), 1);
    }

    #[test]
    fn test_insider_frame() {
        let trade = InsiderTrade {
            ticker: "AAPL".to_string(),
            name: Some("Jane Doe".to_string()),
            title: None,
            is_board_director: Some(true),
            transaction_date: None,
            transaction_shares: Some(-10.0),
            transaction_price_per_share: None,
            transaction_value: None,
            shares_owned_before_transaction: None,
            shares_owned_after_transaction: None,
            security_title: None,
            filing_date: date(2024, 2, 3),
        };

        let df = [trade].to_frame().unwrap();
        assert_eq!(df.shape(), (1, 12));
        assert_eq!(df.column("transaction_date").unwrap().null_count(), 1);
    }

    #[test]
    fn test_empty_slice() {
        let bars: Vec<PriceRecord> = Vec::new();
        let df = bars.to_frame().unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 7);
    }
}
