//! Provider plus pipeline in one handle.

use balanza_normalize::{
    ToFrame, normalize_financials, normalize_insider_trades, normalize_market_cap,
    normalize_prices,
};
use balanza_traits::{
    BalanzaError, ColumnMap, DataProvider, Date, FinancialRecord, InsiderTrade, PeriodKind,
    PriceRecord, Result,
};
use polars::prelude::DataFrame;
use tracing::{debug, instrument};

/// Fetches through a [`DataProvider`] and normalizes the result.
///
/// The column map starts as the provider's default and can be extended with
/// [`Balanza::with_columns`].
///
/// ```ignore
/// use balanza::{Balanza, PeriodKind};
/// use balanza::fd::{FdClient, FdConfig};
///
/// let balanza = Balanza::new(FdClient::new(FdConfig::new(api_key))?);
/// let record = balanza
///     .financial_metrics("AAPL", report_period, PeriodKind::Ttm, 4)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Balanza<P> {
    provider: P,
    columns: ColumnMap,
}

impl<P: DataProvider> Balanza<P> {
    /// Wrap `provider` with its default column map.
    pub fn new(provider: P) -> Self {
        let columns = provider.columns().clone();
        Self { provider, columns }
    }

    /// Add column mappings that take precedence over the provider's.
    #[must_use]
    pub fn with_columns(mut self, overrides: ColumnMap) -> Self {
        self.columns = self.columns.merge(overrides);
        self
    }

    /// The wrapped provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// The column map in effect.
    pub const fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Canonical financial record for `ticker` at `report_period`.
    ///
    /// # Errors
    ///
    /// Propagates provider failures and the pipeline's period selection and
    /// derivation errors.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn financial_metrics(
        &self,
        ticker: &str,
        report_period: Date,
        period_kind: PeriodKind,
        limit: usize,
    ) -> Result<FinancialRecord> {
        let raw = self
            .provider
            .fetch_financial_rows(ticker, report_period, period_kind, limit)
            .await?;
        debug!(rows = raw.len(), "financial rows fetched");
        normalize_financials(&raw, ticker, report_period, period_kind, &self.columns)
    }

    /// Daily bars from `start` to `end`, both inclusive, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`BalanzaError::EmptyResult`] when no bar falls in the range.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn prices(&self, ticker: &str, start: Date, end: Date) -> Result<Vec<PriceRecord>> {
        if start > end {
            return Err(BalanzaError::InvalidData(format!(
                "start date {start} is after end date {end}"
            )));
        }
        let raw = self.provider.fetch_price_rows(ticker, start, end).await?;
        let mut bars = normalize_prices(&raw, ticker, &self.columns)?;
        bars.retain(|bar| (start..=end).contains(&bar.date));
        if bars.is_empty() {
            return Err(BalanzaError::EmptyResult {
                ticker: ticker.to_string(),
                what: "prices",
            });
        }
        Ok(bars)
    }

    /// [`Balanza::prices`] as a [`DataFrame`].
    ///
    /// # Errors
    ///
    /// Same as [`Balanza::prices`], plus polars failures.
    pub async fn price_frame(&self, ticker: &str, start: Date, end: Date) -> Result<DataFrame> {
        let bars = self.prices(ticker, start, end).await?;
        Ok(bars.to_frame()?)
    }

    /// Latest market capitalization in the provider's currency.
    ///
    /// # Errors
    ///
    /// Propagates provider failures; returns
    /// [`BalanzaError::MissingField`] when the payload carries no value.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn market_cap(&self, ticker: &str) -> Result<f64> {
        let raw = self.provider.fetch_market_cap(ticker).await?;
        normalize_market_cap(&raw, ticker, &self.columns)
    }

    /// Up to `limit` insider trades filed on or before `end_date`, newest
    /// filing first.
    ///
    /// # Errors
    ///
    /// Returns [`BalanzaError::EmptyResult`] when nothing was filed in range.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn insider_trades(
        &self,
        ticker: &str,
        end_date: Date,
        limit: usize,
    ) -> Result<Vec<InsiderTrade>> {
        let raw = self
            .provider
            .fetch_insider_trades(ticker, end_date, limit)
            .await?;
        let mut trades = normalize_insider_trades(&raw, ticker, &self.columns)?;
        trades.retain(|trade| trade.filing_date <= end_date);
        trades.truncate(limit);
        if trades.is_empty() {
            return Err(BalanzaError::EmptyResult {
                ticker: ticker.to_string(),
                what: "insider trades",
            });
        }
        Ok(trades)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use balanza_traits::{FinancialField, RawTable};
    use serde_json::{Value, json};

    /// Serves fixed payloads.
    #[derive(Debug)]
    struct StaticProvider {
        columns: ColumnMap,
        financials: Value,
        prices: Value,
        market_cap: Value,
        trades: Value,
    }

    impl StaticProvider {
        fn new() -> Self {
            Self {
                columns: ColumnMap::identity("static"),
                financials: json!([
                    {"ticker": "AAPL", "report_period": "2023-12-31", "period": "ttm",
                     "net_profit": 120, "outstanding_shares": 60},
                    {"ticker": "AAPL", "report_period": "2023-09-30", "period": "ttm",
                     "net_profit": 100, "outstanding_shares": 50}
                ]),
                prices: json!([
                    {"date": "2024-01-03", "close": 102},
                    {"date": "2024-01-02", "close": "101.5", "volume": "1000"},
                    {"date": "2024-01-01", "close": "100", "volume": "500"}
                ]),
                market_cap: json!([{"market_cap": 3.0e12}]),
                trades: json!([
                    {"name": "A", "filing_date": "2024-01-05"},
                    {"name": "B", "filing_date": "2024-02-05"},
                    {"name": "C", "filing_date": "2024-03-05"}
                ]),
            }
        }
    }

    fn table(value: &Value) -> Result<RawTable> {
        RawTable::from_json_value(value.clone())
    }

    impl DataProvider for StaticProvider {
        fn name(&self) -> &str {
            "static"
        }

        fn columns(&self) -> &ColumnMap {
            &self.columns
        }

        async fn fetch_financial_rows(
            &self,
            _ticker: &str,
            _report_period: Date,
            _period_kind: PeriodKind,
            _limit: usize,
        ) -> Result<RawTable> {
            table(&self.financials)
        }

        async fn fetch_price_rows(
            &self,
            _ticker: &str,
            _start: Date,
            _end: Date,
        ) -> Result<RawTable> {
            table(&self.prices)
        }

        async fn fetch_market_cap(&self, _ticker: &str) -> Result<RawTable> {
            table(&self.market_cap)
        }

        async fn fetch_insider_trades(
            &self,
            _ticker: &str,
            _end_date: Date,
            _limit: usize,
        ) -> Result<RawTable> {
            table(&self.trades)
        }
    }

    /// Fails every call the way an unreachable backend would.
    #[derive(Debug)]
    struct DownProvider(ColumnMap);

    impl DataProvider for DownProvider {
        fn name(&self) -> &str {
            "down"
        }

        fn columns(&self) -> &ColumnMap {
            &self.0
        }

        async fn fetch_financial_rows(
            &self,
            _ticker: &str,
            _report_period: Date,
            _period_kind: PeriodKind,
            _limit: usize,
        ) -> Result<RawTable> {
            Err(BalanzaError::unavailable("down", "connection refused"))
        }

        async fn fetch_price_rows(
            &self,
            ticker: &str,
            _start: Date,
            _end: Date,
        ) -> Result<RawTable> {
            Err(BalanzaError::not_found("down", ticker))
        }

        async fn fetch_market_cap(&self, _ticker: &str) -> Result<RawTable> {
            Err(BalanzaError::unavailable("down", "timeout"))
        }

        async fn fetch_insider_trades(
            &self,
            _ticker: &str,
            _end_date: Date,
            _limit: usize,
        ) -> Result<RawTable> {
            Err(BalanzaError::Unsupported {
                provider: "down".to_string(),
                operation: "insider trades",
            })
        }
    }

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_financial_metrics() {
        let balanza = Balanza::new(StaticProvider::new());
        let record = balanza
            .financial_metrics("AAPL", date(2024, 3, 31), PeriodKind::Ttm, 2)
            .await
            .unwrap();
        assert_eq!(record.period_end(), date(2023, 12, 31));
        assert_relative_eq!(record.get(FinancialField::EarningsPerShare).unwrap(), 2.0);

        let record = balanza
            .financial_metrics("AAPL", date(2023, 11, 1), PeriodKind::Ttm, 2)
            .await
            .unwrap();
        assert_relative_eq!(record.get(FinancialField::EarningsPerShare).unwrap(), 2.0);
        assert_eq!(record.period_end(), date(2023, 9, 30));
    }

    #[tokio::test]
    async fn test_prices_are_clipped_to_range() {
        let balanza = Balanza::new(StaticProvider::new());
        let bars = balanza
            .prices("AAPL", date(2024, 1, 1), date(2024, 1, 2))
            .await
            .unwrap();
        assert_eq!(bars.len(), 2);
        assert_relative_eq!(bars[0].close.unwrap(), 100.0);
        assert_eq!(bars[1].volume, Some(1000));

        let frame = balanza
            .price_frame("AAPL", date(2024, 1, 1), date(2024, 1, 3))
            .await
            .unwrap();
        assert_eq!(frame.height(), 3);

        let err = balanza
            .prices("AAPL", date(2025, 1, 1), date(2025, 1, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, BalanzaError::EmptyResult { .. }));

        let err = balanza
            .prices("AAPL", date(2024, 1, 2), date(2024, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, BalanzaError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_market_cap_and_column_overrides() {
        let balanza = Balanza::new(StaticProvider::new());
        assert_relative_eq!(balanza.market_cap("AAPL").await.unwrap(), 3.0e12);

        // Reinterpret the close column as the open price.
        let balanza = balanza.with_columns(
            ColumnMap::new("override").with("close", balanza_traits::PriceField::Open),
        );
        let bars = balanza
            .prices("AAPL", date(2024, 1, 1), date(2024, 1, 1))
            .await
            .unwrap();
        assert_relative_eq!(bars[0].open.unwrap(), 100.0);
    }

    #[tokio::test]
    async fn test_insider_trades_bounded() {
        let balanza = Balanza::new(StaticProvider::new());
        let trades = balanza
            .insider_trades("AAPL", date(2024, 2, 28), 5)
            .await
            .unwrap();
        let names: Vec<_> = trades.iter().filter_map(|t| t.name.as_deref()).collect();
        assert_eq!(names, ["B", "A"]);

        let trades = balanza
            .insider_trades("AAPL", date(2024, 12, 31), 1)
            .await
            .unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].name.as_deref(), Some("C"));
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let balanza = Balanza::new(DownProvider(ColumnMap::identity("down")));

        let err = balanza
            .financial_metrics("AAPL", date(2024, 3, 31), PeriodKind::Ttm, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, BalanzaError::ProviderUnavailable { .. }));
        assert!(err.is_provider_error());

        let err = balanza
            .prices("AAPL", date(2024, 1, 1), date(2024, 1, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, BalanzaError::NotFound { .. }));

        let err = balanza
            .insider_trades("AAPL", date(2024, 1, 1), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, BalanzaError::Unsupported { .. }));
    }
}
