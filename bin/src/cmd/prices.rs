//! Prices command implementation.

use anyhow::{Result, ensure};
use balanza::{Balanza, DataProvider, ToFrame};

use super::{date_or_today, parse_date};
use crate::output::{self, Format};

/// Show daily bars for `ticker` between `start` and `end`.
pub(crate) async fn show_prices<P: DataProvider>(
    balanza: &Balanza<P>,
    ticker: &str,
    start: &str,
    end: Option<String>,
    format: Format,
) -> Result<()> {
    let start = parse_date(start)?;
    let end = date_or_today(end.as_deref())?;
    ensure!(start <= end, "start date {start} is after end date {end}");

    let bars = balanza.prices(ticker, start, end).await?;

    match format {
        Format::Json => output::print_json(&bars)?,
        Format::Table => {
            println!(
                "{} daily bars for {} ({} to {})\n",
                bars.len(),
                ticker.to_uppercase(),
                start,
                end
            );
            println!("{}", bars.to_frame()?);
        }
    }

    Ok(())
}
