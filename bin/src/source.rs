//! Provider selection.

use std::{env, fmt, path::Path};

use anyhow::{Context, Result, bail};
use balanza::{
    ColumnMap, DataProvider, Date, PeriodKind, RawTable, RecordsProvider,
    fd::{FdClient, FdConfig},
    vci::{VciClient, VciConfig},
};
use clap::ValueEnum;
use tracing::warn;

/// Environment variable holding the financialdatasets.ai key.
pub(crate) const API_KEY_VAR: &str = "FINANCIAL_DATASETS_API_KEY";

/// Backends selectable with `--source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SourceKind {
    /// financialdatasets.ai
    Fd,
    /// Vietcap
    Vci,
    /// JSON dumps under `--data-dir`
    Records,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fd => "fd",
            Self::Vci => "vci",
            Self::Records => "records",
        })
    }
}

/// The provider chosen on the command line.
///
/// `DataProvider` returns `impl Future`, so it cannot sit behind `dyn`; this
/// enum forwards each call to the selected client instead.
#[derive(Debug, Clone)]
pub(crate) enum Source {
    Fd(FdClient),
    Vci(VciClient),
    Records(RecordsProvider),
}

impl Source {
    /// Build the provider for `kind`.
    ///
    /// Loads `.env` before reading the API key.
    pub(crate) fn open(kind: SourceKind, data_dir: Option<&Path>) -> Result<Self> {
        match kind {
            SourceKind::Fd => {
                let _ = dotenvy::dotenv();
                let config = match env::var(API_KEY_VAR) {
                    Ok(key) if !key.trim().is_empty() => FdConfig::new(key.trim()),
                    _ => {
                        warn!("{API_KEY_VAR} is not set; requests are unauthenticated");
                        FdConfig::default()
                    }
                };
                Ok(Self::Fd(
                    FdClient::new(config).context("building financialdatasets client")?,
                ))
            }
            SourceKind::Vci => Ok(Self::Vci(
                VciClient::new(VciConfig::default()).context("building VCI client")?,
            )),
            SourceKind::Records => {
                let Some(root) = data_dir else {
                    bail!("--data-dir is required with --source records");
                };
                if !root.is_dir() {
                    bail!("data directory {} does not exist", root.display());
                }
                Ok(Self::Records(RecordsProvider::new(root)))
            }
        }
    }
}

impl DataProvider for Source {
    fn name(&self) -> &str {
        match self {
            Self::Fd(p) => p.name(),
            Self::Vci(p) => p.name(),
            Self::Records(p) => p.name(),
        }
    }

    fn columns(&self) -> &ColumnMap {
        match self {
            Self::Fd(p) => p.columns(),
            Self::Vci(p) => p.columns(),
            Self::Records(p) => p.columns(),
        }
    }

    async fn fetch_financial_rows(
        &self,
        ticker: &str,
        report_period: Date,
        period_kind: PeriodKind,
        limit: usize,
    ) -> balanza::Result<RawTable> {
        match self {
            Self::Fd(p) => {
                p.fetch_financial_rows(ticker, report_period, period_kind, limit)
                    .await
            }
            Self::Vci(p) => {
                p.fetch_financial_rows(ticker, report_period, period_kind, limit)
                    .await
            }
            Self::Records(p) => {
                p.fetch_financial_rows(ticker, report_period, period_kind, limit)
                    .await
            }
        }
    }

    async fn fetch_price_rows(
        &self,
        ticker: &str,
        start: Date,
        end: Date,
    ) -> balanza::Result<RawTable> {
        match self {
            Self::Fd(p) => p.fetch_price_rows(ticker, start, end).await,
            Self::Vci(p) => p.fetch_price_rows(ticker, start, end).await,
            Self::Records(p) => p.fetch_price_rows(ticker, start, end).await,
        }
    }

    async fn fetch_market_cap(&self, ticker: &str) -> balanza::Result<RawTable> {
        match self {
            Self::Fd(p) => p.fetch_market_cap(ticker).await,
            Self::Vci(p) => p.fetch_market_cap(ticker).await,
            Self::Records(p) => p.fetch_market_cap(ticker).await,
        }
    }

    async fn fetch_insider_trades(
        &self,
        ticker: &str,
        end_date: Date,
        limit: usize,
    ) -> balanza::Result<RawTable> {
        match self {
            Self::Fd(p) => p.fetch_insider_trades(ticker, end_date, limit).await,
            Self::Vci(p) => p.fetch_insider_trades(ticker, end_date, limit).await,
            Self::Records(p) => p.fetch_insider_trades(ticker, end_date, limit).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_needs_data_dir() {
        let err = Source::open(SourceKind::Records, None).unwrap_err();
        assert!(err.to_string().contains("--data-dir"));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(Source::open(SourceKind::Records, Some(&missing)).is_err());
    }

    #[test]
    fn test_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = Source::open(SourceKind::Records, Some(dir.path())).unwrap();
        assert_eq!(source.name(), balanza::RECORDS_PROVIDER);
    }

    #[test]
    fn test_vci_source() {
        let source = Source::open(SourceKind::Vci, None).unwrap();
        assert_eq!(source.name(), balanza::vci::PROVIDER);
        assert_eq!(source.columns().utc_offset_minutes, 420);
    }

    #[test]
    fn test_kind_display_matches_value_names() {
        for kind in SourceKind::value_variants() {
            let value = kind.to_possible_value().unwrap();
            assert_eq!(value.get_name(), kind.to_string());
        }
    }
}
