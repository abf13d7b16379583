//! Columns command implementation.

use anyhow::Result;
use balanza::{Balanza, DataProvider};

/// Print the column map in effect, provider defaults plus overrides.
///
/// The output is valid input for `--columns`.
pub(crate) fn show_columns<P: DataProvider>(balanza: &Balanza<P>) -> Result<()> {
    println!("{}", balanza.columns().to_json_string()?);
    Ok(())
}
