//! Financial statement normalization.

use balanza_traits::{
    BalanzaError, ColumnMap, Date, FinancialField, FinancialRecord, MetaField, PeriodKind,
    RawTable, Result,
};
use chrono::Datelike;
use tracing::debug;

use crate::{canonical::CanonicalRow, derive::derive_fields};

/// A row that has a resolvable period.
#[derive(Debug)]
struct Candidate<'a> {
    row: CanonicalRow<'a>,
    period_end: Date,
    filing_date: Option<Date>,
}

/// Build the canonical record for `ticker` at `report_period`.
///
/// Steps, in order:
/// 1. resolve every column through `columns`, dropping unmapped ones
/// 2. select the single row matching `report_period` under `period_kind`
/// 3. copy the canonical fields and compute the derived ones
///
/// Matching rules: `Annual` takes the fiscal year ending in the calendar year
/// before `report_period`'s year; `Quarterly` and `Ttm` take the latest period
/// ending on or before `report_period`. Rows labelled with a different period
/// kind, or with a different ticker, are never eligible. Ties on the period
/// end are broken by the most recent filing date.
///
/// # Errors
///
/// - [`BalanzaError::NoMatchingPeriod`] if no row matches
/// - [`BalanzaError::AmbiguousPeriod`] if the filing date cannot break a tie
/// - [`BalanzaError::DivisionByZero`] if a per-share field needs a zero or
///   absent share count
/// - [`BalanzaError::InvalidData`] if `ticker` is blank
pub fn normalize_financials(
    raw: &RawTable,
    ticker: &str,
    report_period: Date,
    period_kind: PeriodKind,
    columns: &ColumnMap,
) -> Result<FinancialRecord> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(BalanzaError::InvalidData("ticker must not be empty".to_string()));
    }

    let candidates: Vec<Candidate<'_>> = raw
        .rows()
        .map(|row| CanonicalRow::new(row, columns))
        .filter(|row| row.belongs_to(ticker))
        .filter(|row| period_kind.accepts(row.period_kind()))
        .filter_map(|row| {
            let Some(period_end) = row.period_end() else {
                debug!(ticker, row = row.index(), "skipping row without a period");
                return None;
            };
            let filing_date = row.date(MetaField::FilingDate);
            Some(Candidate {
                row,
                period_end,
                filing_date,
            })
        })
        .filter(|c| matches_period(c.period_end, report_period, period_kind))
        .collect();

    let selected = select(candidates, ticker, report_period, period_kind)?;
    debug!(
        ticker,
        row = selected.row.index(),
        period_end = %selected.period_end,
        "selected statement row"
    );

    let mut record = FinancialRecord::new(ticker, selected.period_end, period_kind);
    for field in FinancialField::ALL {
        record.set(field, selected.row.financial(field));
    }
    derive_fields(&mut record)?;

    Ok(record)
}

fn matches_period(period_end: Date, report_period: Date, kind: PeriodKind) -> bool {
    match kind {
        PeriodKind::Annual => period_end.year() == report_period.year() - 1,
        PeriodKind::Quarterly | PeriodKind::Ttm => period_end <= report_period,
    }
}

fn select<'a>(
    candidates: Vec<Candidate<'a>>,
    ticker: &str,
    report_period: Date,
    period_kind: PeriodKind,
) -> Result<Candidate<'a>> {
    let Some(latest) = candidates.iter().map(|c| c.period_end).max() else {
        return Err(BalanzaError::NoMatchingPeriod {
            ticker: ticker.to_string(),
            report_period,
            period_kind,
        });
    };

    let mut tied: Vec<Candidate<'a>> = candidates
        .into_iter()
        .filter(|c| c.period_end == latest)
        .collect();
    if tied.len() == 1 {
        return Ok(tied.remove(0));
    }

    let count = tied.len();
    if let Some(newest) = tied.iter().filter_map(|c| c.filing_date).max() {
        let mut winners: Vec<Candidate<'a>> = tied
            .into_iter()
            .filter(|c| c.filing_date == Some(newest))
            .collect();
        if winners.len() == 1 {
            return Ok(winners.remove(0));
        }
    }

    Err(BalanzaError::AmbiguousPeriod {
        ticker: ticker.to_string(),
        period_end: latest,
        candidates: count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::{Value, json};

    fn table(value: Value) -> RawTable {
        RawTable::from_json_value(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn identity() -> ColumnMap {
        ColumnMap::identity("test").with("net_income", FinancialField::NetProfit)
    }

    fn vci_like() -> ColumnMap {
        ColumnMap::new("vci")
            .with("ticker", MetaField::Ticker)
            .with("yearReport", MetaField::FiscalYear)
            .with("lengthReport", MetaField::FiscalQuarter)
            .with_scaled("ROE (%)", FinancialField::ReturnOnEquity, 0.01)
            .with("P/E", FinancialField::PriceToEarningsRatio)
            .with("P/B", FinancialField::PriceToBookRatio)
            .with("Debt/Equity", FinancialField::DebtToEquity)
            .with("BVPS (VND)", FinancialField::BookValuePerShare)
            .with_scaled(
                "Outstanding Share (Mil. Shares)",
                FinancialField::OutstandingShares,
                1e6,
            )
    }

    #[test]
    fn test_earnings_per_share_example() {
        let raw = table(json!([
            {"report_period": "2023-12-31", "period": "ttm", "net_profit": 120, "outstanding_shares": 60}
        ]));
        let record =
            normalize_financials(&raw, "AAPL", date(2024, 3, 31), PeriodKind::Ttm, &identity())
                .unwrap();
        assert_relative_eq!(record.get(FinancialField::EarningsPerShare).unwrap(), 2.0);
        assert_eq!(record.period_end(), date(2023, 12, 31));
        assert_eq!(record.ticker(), "AAPL");
    }

    #[test]
    fn test_zero_shares_is_division_by_zero() {
        let raw = table(json!([
            {"report_period": "2023-12-31", "net_profit": 120, "outstanding_shares": 0}
        ]));
        let result =
            normalize_financials(&raw, "AAPL", date(2024, 3, 31), PeriodKind::Ttm, &identity());
        assert!(matches!(result, Err(BalanzaError::DivisionByZero { .. })));
    }

    #[test]
    fn test_record_has_every_field() {
        let raw = table(json!([
            {"report_period": "2023-12-31", "net_margin": "not a number", "current_ratio": 1.4, "Unmapped": 7}
        ]));
        let record =
            normalize_financials(&raw, "AAPL", date(2024, 1, 31), PeriodKind::Ttm, &identity())
                .unwrap();
        assert_eq!(record.iter().count(), FinancialField::COUNT);
        assert_eq!(record.get(FinancialField::NetMargin), None);
        assert_relative_eq!(record.get(FinancialField::CurrentRatio).unwrap(), 1.4);
        assert_eq!(record.present_count(), 1);
    }

    #[test]
    fn test_ttm_takes_latest_on_or_before() {
        let raw = table(json!([
            {"report_period": "2024-06-30", "net_margin": 0.30},
            {"report_period": "2023-12-31", "net_margin": 0.20},
            {"report_period": "2024-03-31", "net_margin": 0.25}
        ]));
        let record =
            normalize_financials(&raw, "AAPL", date(2024, 5, 1), PeriodKind::Ttm, &identity())
                .unwrap();
        assert_eq!(record.period_end(), date(2024, 3, 31));
        assert_relative_eq!(record.get(FinancialField::NetMargin).unwrap(), 0.25);
    }

    #[test]
    fn test_period_label_filters_rows() {
        let raw = table(json!([
            {"report_period": "2024-03-31", "period": "quarterly", "net_margin": 0.9},
            {"report_period": "2023-12-31", "period": "ttm", "net_margin": 0.2}
        ]));
        let record =
            normalize_financials(&raw, "AAPL", date(2024, 5, 1), PeriodKind::Ttm, &identity())
                .unwrap();
        assert_eq!(record.period_end(), date(2023, 12, 31));

        let record = normalize_financials(
            &raw,
            "AAPL",
            date(2024, 5, 1),
            PeriodKind::Quarterly,
            &identity(),
        )
        .unwrap();
        assert_eq!(record.period_end(), date(2024, 3, 31));
    }

    #[test]
    fn test_annual_takes_preceding_calendar_year() {
        let raw = table(json!([
            {"ticker": "FPT", "yearReport": 2024, "lengthReport": 5, "ROE (%)": 28.0},
            {"ticker": "FPT", "yearReport": 2023, "lengthReport": 5, "ROE (%)": 25.0},
            {"ticker": "FPT", "yearReport": 2023, "lengthReport": 4, "ROE (%)": 99.0},
            {"ticker": "FPT", "yearReport": 2022, "lengthReport": 5, "ROE (%)": 22.0}
        ]));
        let record = normalize_financials(
            &raw,
            "FPT",
            date(2024, 12, 25),
            PeriodKind::Annual,
            &vci_like(),
        )
        .unwrap();
        assert_eq!(record.period_end(), date(2023, 12, 31));
        assert_relative_eq!(record.get(FinancialField::ReturnOnEquity).unwrap(), 0.25);
    }

    #[test]
    fn test_vci_labels_and_derivations() {
        let raw = table(json!([{
            "ticker": "FPT",
            "yearReport": 2023,
            "lengthReport": 5,
            "P/E": "22.1",
            "P/B": 5.0,
            "Debt/Equity": 0.8,
            "BVPS (VND)": 20000,
            "Outstanding Share (Mil. Shares)": 1270
        }]));
        let record = normalize_financials(
            &raw,
            "FPT",
            date(2024, 6, 1),
            PeriodKind::Annual,
            &vci_like(),
        )
        .unwrap();

        assert_relative_eq!(record.get(FinancialField::PriceToEarningsRatio).unwrap(), 22.1);
        assert_relative_eq!(record.get(FinancialField::DebtToEquity).unwrap(), 0.8);
        assert_relative_eq!(
            record.get(FinancialField::OutstandingShares).unwrap(),
            1.27e9
        );
        assert_relative_eq!(record.get(FinancialField::PricePerShare).unwrap(), 100_000.0);
        assert_relative_eq!(record.get(FinancialField::MarketCap).unwrap(), 1.27e14);
    }

    #[test]
    fn test_no_matching_period() {
        let raw = table(json!([{"report_period": "2024-06-30", "net_margin": 0.3}]));
        let result =
            normalize_financials(&raw, "AAPL", date(2024, 1, 1), PeriodKind::Ttm, &identity());
        assert!(matches!(result, Err(BalanzaError::NoMatchingPeriod { .. })));

        let result = normalize_financials(
            &RawTable::new(),
            "AAPL",
            date(2024, 1, 1),
            PeriodKind::Ttm,
            &identity(),
        );
        assert!(matches!(result, Err(BalanzaError::NoMatchingPeriod { .. })));
    }

    #[test]
    fn test_other_tickers_are_ignored() {
        let raw = table(json!([{"ticker": "MSFT", "report_period": "2023-12-31"}]));
        let result =
            normalize_financials(&raw, "AAPL", date(2024, 1, 31), PeriodKind::Ttm, &identity());
        assert!(matches!(result, Err(BalanzaError::NoMatchingPeriod { .. })));
    }

    #[test]
    fn test_tie_broken_by_latest_filing() {
        let raw = table(json!([
            {"report_period": "2023-12-31", "filing_date": "2024-02-01", "net_margin": 0.20},
            {"report_period": "2023-12-31", "filing_date": "2024-04-15", "net_margin": 0.21}
        ]));
        let record =
            normalize_financials(&raw, "AAPL", date(2024, 5, 1), PeriodKind::Ttm, &identity())
                .unwrap();
        assert_relative_eq!(record.get(FinancialField::NetMargin).unwrap(), 0.21);
    }

    #[test]
    fn test_ambiguous_period() {
        let raw = table(json!([
            {"report_period": "2023-12-31", "net_margin": 0.20},
            {"report_period": "2023-12-31", "net_margin": 0.21}
        ]));
        let result =
            normalize_financials(&raw, "AAPL", date(2024, 5, 1), PeriodKind::Ttm, &identity());
        match result {
            Err(BalanzaError::AmbiguousPeriod {
                candidates,
                period_end,
                ..
            }) => {
                assert_eq!(candidates, 2);
                assert_eq!(period_end, date(2023, 12, 31));
            }
            other => panic!("expected AmbiguousPeriod, got {other:?}"),
        }

        let raw = table(json!([
            {"report_period": "2023-12-31", "filing_date": "2024-02-01"},
            {"report_period": "2023-12-31", "filing_date": "2024-02-01"}
        ]));
        let result =
            normalize_financials(&raw, "AAPL", date(2024, 5, 1), PeriodKind::Ttm, &identity());
        assert!(matches!(result, Err(BalanzaError::AmbiguousPeriod { .. })));
    }

    #[test]
    fn test_blank_ticker_is_rejected() {
        let raw = table(json!([{"report_period": "2023-12-31"}]));
        let result =
            normalize_financials(&raw, "  ", date(2024, 5, 1), PeriodKind::Ttm, &identity());
        assert!(matches!(result, Err(BalanzaError::InvalidData(_))));
    }

    #[test]
    fn test_idempotent() {
        let raw = table(json!([{
            "report_period": "2023-12-31",
            "net_income": 120,
            "outstanding_shares": 60,
            "operating_cash_flow": 300,
            "capital_expenditures": 100
        }]));
        let a = normalize_financials(&raw, "AAPL", date(2024, 1, 31), PeriodKind::Ttm, &identity())
            .unwrap();
        let b = normalize_financials(&raw, "AAPL", date(2024, 1, 31), PeriodKind::Ttm, &identity())
            .unwrap();
        assert_eq!(a, b);
        for ((_, x), (_, y)) in a.iter().zip(b.iter()) {
            assert_eq!(x.map(f64::to_bits), y.map(f64::to_bits));
        }
        assert_relative_eq!(a.get(FinancialField::FreeCashFlowPerShare).unwrap(), 200.0 / 60.0);
    }
}
