//! Vietcap (VCI) market data client for balanza.
//!
//! Covers Vietnamese listed equities: daily bars from the gap-chart endpoint
//! and financial ratios in the vnstock layout. Dates are interpreted at
//! UTC+07:00.
//!
//! ```rust,ignore
//! use balanza_traits::{DataProvider, Date};
//! use balanza_vci::{VciClient, VciConfig};
//!
//! let client = VciClient::new(VciConfig::default())?;
//! let start = Date::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = Date::from_ymd_opt(2024, 12, 25).unwrap();
//! let bars = client.fetch_price_rows("FPT", start, end).await?;
//! ```

mod client;
mod columns;
mod config;
mod error;
mod types;

pub use client::{RatioPeriod, VciClient};
pub use columns::{VCI_UTC_OFFSET_MINUTES, default_columns};
pub use config::{DEFAULT_BASE_URL, DEFAULT_RATIO_PATH, VciConfig};
pub use error::VciError;
pub use types::{GapChartRequest, GapChartSeries};

/// Provider name used in logs and errors.
pub const PROVIDER: &str = "vci";

/// Result type for VCI operations.
pub type Result<T> = std::result::Result<T, VciError>;
