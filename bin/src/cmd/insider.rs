//! Insider trades command implementation.

use anyhow::Result;
use balanza::{Balanza, DataProvider, ToFrame};

use super::date_or_today;
use crate::output::{self, Format};

/// Show insider trades filed on or before `end_date`, newest first.
pub(crate) async fn show_insider_trades<P: DataProvider>(
    balanza: &Balanza<P>,
    ticker: &str,
    end_date: Option<String>,
    limit: usize,
    format: Format,
) -> Result<()> {
    let end_date = date_or_today(end_date.as_deref())?;
    let trades = balanza.insider_trades(ticker, end_date, limit).await?;

    match format {
        Format::Json => output::print_json(&trades)?,
        Format::Table => {
            println!(
                "{} insider trades for {} filed by {}\n",
                trades.len(),
                ticker.to_uppercase(),
                end_date
            );
            println!("{}", trades.to_frame()?);
        }
    }

    Ok(())
}
