//! [financialdatasets.ai](https://financialdatasets.ai) client for balanza.
//!
//! [`FdClient`] implements [`DataProvider`](balanza_traits::DataProvider) on
//! top of the REST API. Payloads are handed back as raw tables; the
//! normalization pipeline maps them with [`default_columns`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use balanza_fd::{FdClient, FdConfig};
//! use balanza_traits::{DataProvider, Date, PeriodKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FdClient::new(FdConfig::new("your_api_key"))?;
//!     let report_period = Date::from_ymd_opt(2024, 3, 31).unwrap();
//!     let rows = client
//!         .fetch_financial_rows("AAPL", report_period, PeriodKind::Ttm, 4)
//!         .await?;
//!     println!("{} rows", rows.len());
//!     Ok(())
//! }
//! ```
//!
//! The key is sent as the `X-API-KEY` header. Binaries typically read it from
//! `FINANCIAL_DATASETS_API_KEY`.

mod client;
mod columns;
mod config;
mod error;
mod types;

pub use client::FdClient;
pub use columns::default_columns;
pub use config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, FdConfig};
pub use error::FdError;
pub use types::*;

/// Provider name used in logs and errors.
pub const PROVIDER: &str = "financialdatasets";

/// Result type for financialdatasets.ai operations.
pub type Result<T> = std::result::Result<T, FdError>;
