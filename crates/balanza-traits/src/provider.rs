//! Data provider contract.
//!
//! A provider owns transport, credentials and the backend's quirks. It hands
//! back [`RawTable`]s untouched and reports failures as
//! [`BalanzaError::ProviderUnavailable`](crate::BalanzaError::ProviderUnavailable),
//! [`BalanzaError::NotFound`](crate::BalanzaError::NotFound) or
//! [`BalanzaError::Unsupported`](crate::BalanzaError::Unsupported). All
//! normalization happens downstream.

use std::future::Future;

use crate::{ColumnMap, Date, PeriodKind, RawTable, Result};

/// A backend that serves raw financial payloads.
///
/// # Example
///
/// ```no_run
/// use balanza_traits::{ColumnMap, DataProvider, Date, PeriodKind, RawTable, Result};
///
/// struct Empty {
///     columns: ColumnMap,
/// }
///
/// impl DataProvider for Empty {
///     fn name(&self) -> &str {
///         "empty"
///     }
///
///     fn columns(&self) -> &ColumnMap {
///         &self.columns
///     }
///
///     async fn fetch_financial_rows(
///         &self,
///         _ticker: &str,
///         _report_period: Date,
///         _period_kind: PeriodKind,
///         _limit: usize,
///     ) -> Result<RawTable> {
///         Ok(RawTable::new())
///     }
///
///     async fn fetch_price_rows(&self, _ticker: &str, _start: Date, _end: Date) -> Result<RawTable> {
///         Ok(RawTable::new())
///     }
///
///     async fn fetch_market_cap(&self, _ticker: &str) -> Result<RawTable> {
///         Ok(RawTable::new())
///     }
///
///     async fn fetch_insider_trades(
///         &self,
///         _ticker: &str,
///         _end_date: Date,
///         _limit: usize,
///     ) -> Result<RawTable> {
///         Ok(RawTable::new())
///     }
/// }
/// ```
pub trait DataProvider: Send + Sync {
    /// Provider name used in logs and errors.
    fn name(&self) -> &str;

    /// Default canonicalization table for this provider's payloads.
    fn columns(&self) -> &ColumnMap;

    /// Statement rows for `ticker` for periods on or before `report_period`.
    ///
    /// `limit` bounds the number of periods where the backend pages
    /// server-side; backends that only serve the full history ignore it.
    fn fetch_financial_rows(
        &self,
        ticker: &str,
        report_period: Date,
        period_kind: PeriodKind,
        limit: usize,
    ) -> impl Future<Output = Result<RawTable>> + Send;

    /// Daily bars between `start` and `end`, both inclusive.
    fn fetch_price_rows(
        &self,
        ticker: &str,
        start: Date,
        end: Date,
    ) -> impl Future<Output = Result<RawTable>> + Send;

    /// Rows carrying the current market capitalization.
    fn fetch_market_cap(&self, ticker: &str) -> impl Future<Output = Result<RawTable>> + Send;

    /// Insider trades filed on or before `end_date`, at most `limit`.
    fn fetch_insider_trades(
        &self,
        ticker: &str,
        end_date: Date,
        limit: usize,
    ) -> impl Future<Output = Result<RawTable>> + Send;
}
