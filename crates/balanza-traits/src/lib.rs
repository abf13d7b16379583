#![doc(issue_tracker_base_url = "https://github.com/factordynamics/balanza/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core definitions shared by every balanza crate.
//!
//! This crate holds the canonical record model ([`FinancialRecord`],
//! [`PriceRecord`], [`InsiderTrade`]), the provider-neutral raw payload
//! ([`RawTable`]), the per-provider column canonicalization tables
//! ([`ColumnMap`]) and the [`DataProvider`] contract that backends implement.

/// The version of the balanza-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod columns;
pub mod error;
pub mod provider;
pub mod raw;
pub mod record;
pub mod types;

// Re-exports
pub use columns::{Canonical, ColumnMap, ColumnMapping, MetaField, PriceField, TradeField};
pub use error::{BalanzaError, BoxError, Result};
pub use provider::DataProvider;
pub use raw::{RawRow, RawTable};
pub use record::{FinancialField, FinancialRecord, InsiderTrade, PriceRecord};
pub use types::{Date, PeriodKind, Ticker};
