//! Metrics command implementation.

use anyhow::Result;
use balanza::{Balanza, DataProvider, PeriodKind};

use super::date_or_today;
use crate::output::{self, Format};

/// Show the canonical financial record for one reporting period.
pub(crate) async fn show_metrics<P: DataProvider>(
    balanza: &Balanza<P>,
    ticker: &str,
    report_period: Option<String>,
    period: &str,
    limit: usize,
    format: Format,
) -> Result<()> {
    let period_kind: PeriodKind = period.parse()?;
    let report_period = date_or_today(report_period.as_deref())?;

    let record = balanza
        .financial_metrics(ticker, report_period, period_kind, limit)
        .await?;

    match format {
        Format::Json => output::print_json(&record)?,
        Format::Table => {
            println!();
            print!("{}", output::record_table(&record, false));
            println!(
                "\n{} of {} fields present",
                record.present_count(),
                balanza::FinancialField::ALL.len()
            );
        }
    }

    Ok(())
}
