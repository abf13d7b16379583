#![doc(issue_tracker_base_url = "https://github.com/factordynamics/balanza/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # balanza
//!
//! Canonical financial records from heterogeneous market data providers.
//!
//! balanza is an umbrella crate that re-exports the balanza sub-crates and
//! wires a [`DataProvider`] to the normalization pipeline through
//! [`Balanza`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use balanza::{Balanza, Date, PeriodKind, RecordsProvider};
//!
//! # async fn example() -> balanza::Result<()> {
//! let balanza = Balanza::new(RecordsProvider::new("data"));
//! let record = balanza
//!     .financial_metrics("AAPL", Date::from_ymd_opt(2024, 3, 31).unwrap(), PeriodKind::Ttm, 4)
//!     .await?;
//! println!("EPS: {:?}", record.get(balanza::FinancialField::EarningsPerShare));
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Data model, column maps, errors and the [`DataProvider`] trait
//! - [`normalize`] - The normalization pipeline
//! - [`fd`] - financialdatasets.ai provider
//! - [`vci`] - Vietcap (VCI) provider
//! - [`RecordsProvider`] - Offline provider over JSON dumps

mod facade;
mod records;

pub use facade::Balanza;
pub use records::{RECORDS_PROVIDER, RecordsProvider};

/// Version information for the balanza crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Data model, column maps and the provider contract.
pub mod traits {
    pub use balanza_traits::*;
}

pub use balanza_traits::{
    BalanzaError, Canonical, ColumnMap, ColumnMapping, DataProvider, Date, FinancialField,
    FinancialRecord, InsiderTrade, PeriodKind, PriceRecord, RawTable, Result, Ticker,
};

/// The normalization pipeline.
///
/// Pure functions from a [`RawTable`] and a [`ColumnMap`] to canonical
/// records, plus [`ToFrame`](normalize::ToFrame) for polars output.
pub mod normalize {
    pub use balanza_normalize::*;
}

pub use balanza_normalize::ToFrame;

/// financialdatasets.ai REST client.
///
/// ## Setup
///
/// 1. Get an API key at <https://financialdatasets.ai/>
/// 2. Pass it in [`FdConfig`](fd::FdConfig); the CLI reads
///    `FINANCIAL_DATASETS_API_KEY`
pub mod fd {
    pub use balanza_fd::*;
}

/// Vietcap (VCI) client for Vietnamese equities.
pub mod vci {
    pub use balanza_vci::*;
}

/// Prelude module for convenient imports.
///
/// ```ignore
/// use balanza::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Balanza, BalanzaError, ColumnMap, DataProvider, Date, FinancialField, FinancialRecord,
        PeriodKind, PriceRecord, RecordsProvider, Result, ToFrame,
    };
}
