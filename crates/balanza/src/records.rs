//! Offline provider over JSON record dumps.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use balanza_traits::{
    BalanzaError, ColumnMap, DataProvider, Date, FinancialField, PeriodKind, PriceField, RawTable,
    Result,
};
use tracing::{debug, instrument};

/// Provider name used in logs and errors.
pub const RECORDS_PROVIDER: &str = "records";

/// Serves `<root>/<TICKER>/<kind>.json` files.
///
/// Each file holds a JSON array of flat records, the layout a dataframe
/// exported with `orient=records` produces. Files:
///
/// | file                  | served by                |
/// |-----------------------|--------------------------|
/// | `financials.json`     | `fetch_financial_rows`   |
/// | `prices.json`         | `fetch_price_rows`       |
/// | `market_cap.json`     | `fetch_market_cap`       |
/// | `insider_trades.json` | `fetch_insider_trades`   |
///
/// Files are read as they are; the pipeline filters by ticker and period.
#[derive(Debug, Clone)]
pub struct RecordsProvider {
    root: PathBuf,
    columns: ColumnMap,
}

impl RecordsProvider {
    /// Serve dumps under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            columns: default_columns(),
        }
    }

    /// Replace the default column map.
    #[must_use]
    pub fn with_columns(mut self, columns: ColumnMap) -> Self {
        self.columns = columns;
        self
    }

    /// Directory the dumps are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, ticker: &str, kind: &str) -> Result<PathBuf> {
        let ticker = ticker.trim();
        let valid = !ticker.is_empty()
            && ticker != "."
            && ticker != ".."
            && ticker
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(BalanzaError::InvalidData(format!(
                "ticker {ticker:?} cannot name a records directory"
            )));
        }
        Ok(self
            .root
            .join(ticker.to_uppercase())
            .join(format!("{kind}.json")))
    }

    async fn load(&self, ticker: &str, kind: &str) -> Result<RawTable> {
        let path = self.path(ticker, kind)?;
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(BalanzaError::not_found(
                    RECORDS_PROVIDER,
                    path.display().to_string(),
                ));
            }
            Err(err) => return Err(BalanzaError::unavailable(RECORDS_PROVIDER, err)),
        };
        let table = RawTable::from_json_records(&text)?;
        debug!(path = %path.display(), rows = table.len(), "records loaded");
        Ok(table)
    }
}

/// Canonical names plus the spellings common in exported dumps.
fn default_columns() -> ColumnMap {
    ColumnMap::identity(RECORDS_PROVIDER)
        .with("time", PriceField::Date)
        .with("net_income", FinancialField::NetProfit)
}

impl DataProvider for RecordsProvider {
    fn name(&self) -> &str {
        RECORDS_PROVIDER
    }

    fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    #[instrument(skip(self), fields(provider = RECORDS_PROVIDER))]
    async fn fetch_financial_rows(
        &self,
        ticker: &str,
        _report_period: Date,
        _period_kind: PeriodKind,
        _limit: usize,
    ) -> Result<RawTable> {
        self.load(ticker, "financials").await
    }

    #[instrument(skip(self), fields(provider = RECORDS_PROVIDER))]
    async fn fetch_price_rows(&self, ticker: &str, _start: Date, _end: Date) -> Result<RawTable> {
        self.load(ticker, "prices").await
    }

    #[instrument(skip(self), fields(provider = RECORDS_PROVIDER))]
    async fn fetch_market_cap(&self, ticker: &str) -> Result<RawTable> {
        self.load(ticker, "market_cap").await
    }

    #[instrument(skip(self), fields(provider = RECORDS_PROVIDER))]
    async fn fetch_insider_trades(
        &self,
        ticker: &str,
        _end_date: Date,
        _limit: usize,
    ) -> Result<RawTable> {
        self.load(ticker, "insider_trades").await
    }
}
