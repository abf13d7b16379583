//! Derived financial fields.

use balanza_traits::{BalanzaError, FinancialField, FinancialRecord, Result};

use FinancialField::{
    BookValuePerShare, CapitalExpenditures, EarningsPerShare, FreeCashFlow, FreeCashFlowPerShare,
    MarketCap, NetProfit, OperatingCashFlow, OutstandingShares, PriceToBookRatio, PricePerShare,
};

/// Fill the derived fields in dependency order.
///
/// Values supplied by the provider are kept. A zero share count fails the
/// record outright; an absent one fails only when a per-share field has to be
/// computed.
pub(crate) fn derive_fields(record: &mut FinancialRecord) -> Result<()> {
    if record.get(OutstandingShares) == Some(0.0) {
        return Err(division_by_zero(record, "per-share fields"));
    }

    if record.get(FreeCashFlow).is_none() {
        if let (Some(ocf), Some(capex)) = (
            record.get(OperatingCashFlow),
            record.get(CapitalExpenditures),
        ) {
            record.set(FreeCashFlow, Some(ocf - capex));
        }
    }

    per_share(record, FreeCashFlowPerShare, FreeCashFlow)?;
    per_share(record, EarningsPerShare, NetProfit)?;
    product(record, PricePerShare, BookValuePerShare, PriceToBookRatio);
    product(record, MarketCap, OutstandingShares, PricePerShare);

    Ok(())
}

fn per_share(
    record: &mut FinancialRecord,
    target: FinancialField,
    numerator: FinancialField,
) -> Result<()> {
    if record.get(target).is_some() {
        return Ok(());
    }
    let Some(value) = record.get(numerator) else {
        return Ok(());
    };
    match record.get(OutstandingShares) {
        Some(shares) if shares != 0.0 => {
            record.set(target, Some(value / shares));
            Ok(())
        }
        _ => Err(division_by_zero(record, target.as_str())),
    }
}

fn product(
    record: &mut FinancialRecord,
    target: FinancialField,
    a: FinancialField,
    b: FinancialField,
) {
    if record.get(target).is_some() {
        return;
    }
    if let (Some(x), Some(y)) = (record.get(a), record.get(b)) {
        record.set(target, Some(x * y));
    }
}

fn division_by_zero(record: &FinancialRecord, field: &str) -> BalanzaError {
    BalanzaError::DivisionByZero {
        ticker: record.ticker().to_string(),
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use balanza_traits::{Date, PeriodKind};

    fn record(values: &[(FinancialField, f64)]) -> FinancialRecord {
        let mut record = FinancialRecord::new(
            "FPT",
            Date::from_ymd_opt(2023, 12, 31).unwrap(),
            PeriodKind::Annual,
        );
        for (field, value) in values {
            record.set(*field, Some(*value));
        }
        record
    }

    #[test]
    fn test_derives_all_five_fields() {
        let mut r = record(&[
            (OperatingCashFlow, 500.0),
            (CapitalExpenditures, 200.0),
            (NetProfit, 120.0),
            (OutstandingShares, 60.0),
            (BookValuePerShare, 10.0),
            (PriceToBookRatio, 1.5),
        ]);
        derive_fields(&mut r).unwrap();

        assert_relative_eq!(r.get(FreeCashFlow).unwrap(), 300.0);
        assert_relative_eq!(r.get(FreeCashFlowPerShare).unwrap(), 5.0);
        assert_relative_eq!(r.get(EarningsPerShare).unwrap(), 2.0);
        assert_relative_eq!(r.get(PricePerShare).unwrap(), 15.0);
        assert_relative_eq!(r.get(MarketCap).unwrap(), 900.0);
    }

    #[test]
    fn test_supplied_values_win() {
        let mut r = record(&[
            (NetProfit, 120.0),
            (OutstandingShares, 60.0),
            (EarningsPerShare, 1.9),
            (MarketCap, 1_000.0),
            (BookValuePerShare, 10.0),
            (PriceToBookRatio, 1.5),
        ]);
        derive_fields(&mut r).unwrap();
        assert_relative_eq!(r.get(EarningsPerShare).unwrap(), 1.9);
        assert_relative_eq!(r.get(MarketCap).unwrap(), 1_000.0);
    }

    #[test]
    fn test_zero_shares_fail() {
        let mut r = record(&[(NetProfit, 120.0), (OutstandingShares, 0.0)]);
        let err = derive_fields(&mut r).unwrap_err();
        assert!(matches!(err, BalanzaError::DivisionByZero { .. }));

        // Even with nothing to divide.
        let mut r = record(&[(OutstandingShares, 0.0)]);
        assert!(matches!(
            derive_fields(&mut r),
            Err(BalanzaError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_absent_shares_fail_only_when_needed() {
        let mut r = record(&[(NetProfit, 120.0)]);
        match derive_fields(&mut r) {
            Err(BalanzaError::DivisionByZero { field, ticker }) => {
                assert_eq!(field, "earnings_per_share");
                assert_eq!(ticker, "FPT");
            }
            other => panic!("expected DivisionByZero, got {other:?}"),
        }

        let mut r = record(&[(BookValuePerShare, 10.0), (PriceToBookRatio, 2.0)]);
        derive_fields(&mut r).unwrap();
        assert_relative_eq!(r.get(PricePerShare).unwrap(), 20.0);
        assert_eq!(r.get(MarketCap), None);
    }

    #[test]
    fn test_missing_inputs_leave_fields_missing() {
        let mut r = record(&[(OperatingCashFlow, 500.0), (OutstandingShares, 10.0)]);
        derive_fields(&mut r).unwrap();
        assert_eq!(r.get(FreeCashFlow), None);
        assert_eq!(r.get(FreeCashFlowPerShare), None);
        assert_eq!(r.get(EarningsPerShare), None);
    }
}
