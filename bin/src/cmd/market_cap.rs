//! Market cap command implementation.

use anyhow::Result;
use balanza::{Balanza, DataProvider};
use serde_json::json;

use crate::output::{self, Format};

/// Show the latest market capitalization.
pub(crate) async fn show_market_cap<P: DataProvider>(
    balanza: &Balanza<P>,
    ticker: &str,
    format: Format,
) -> Result<()> {
    let market_cap = balanza.market_cap(ticker).await?;

    match format {
        Format::Json => output::print_json(&json!({
            "ticker": ticker.trim().to_uppercase(),
            "market_cap": market_cap,
        }))?,
        Format::Table => {
            println!("{:<10} {:>24}", "Ticker", "Market cap");
            println!(
                "{:<10} {:>24}",
                ticker.trim().to_uppercase(),
                output::format_value(market_cap)
            );
        }
    }

    Ok(())
}
