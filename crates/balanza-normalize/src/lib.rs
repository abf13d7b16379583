//! Normalization pipeline for balanza.
//!
//! Turns provider payloads ([`RawTable`](balanza_traits::RawTable)) into
//! canonical records:
//! - [`normalize_financials`]: one [`FinancialRecord`](balanza_traits::FinancialRecord)
//!   for a reporting period, with derived fields filled in
//! - [`normalize_prices`]: date-ordered, de-duplicated daily bars
//! - [`normalize_market_cap`]: the latest market capitalization
//! - [`normalize_insider_trades`]: insider transactions, newest filing first
//!
//! Column labels are resolved through the provider's
//! [`ColumnMap`](balanza_traits::ColumnMap). Cells that cannot be coerced
//! become missing values; only record-level problems fail a call. Every
//! function here is pure.
//!
//! # Example
//!
//! ```ignore
//! use balanza_normalize::{normalize_prices, ToFrame};
//!
//! let bars = normalize_prices(&raw, "AAPL", provider.columns())?;
//! let frame = bars.to_frame()?;
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod canonical;
pub mod coerce;
mod derive;
pub mod financials;
pub mod frame;
pub mod insider;
pub mod market_cap;
pub mod prices;

pub use financials::normalize_financials;
pub use frame::ToFrame;
pub use insider::normalize_insider_trades;
pub use market_cap::normalize_market_cap;
pub use prices::normalize_prices;
