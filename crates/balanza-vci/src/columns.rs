//! Default column map for VCI payloads.
//!
//! Ratio labels follow the vnstock spelling. Percentages are scaled to
//! fractions and the billion/million units to plain VND and shares.

use balanza_traits::{ColumnMap, FinancialField, MetaField, PriceField};

use crate::PROVIDER;

/// Vietnam trades at UTC+07:00.
pub const VCI_UTC_OFFSET_MINUTES: i32 = 7 * 60;

const PERCENT: f64 = 0.01;

/// The default VCI column map.
#[must_use]
pub fn default_columns() -> ColumnMap {
    ColumnMap::new(PROVIDER)
        .with_utc_offset_minutes(VCI_UTC_OFFSET_MINUTES)
        .with("ticker", MetaField::Ticker)
        .with("yearReport", MetaField::FiscalYear)
        .with("lengthReport", MetaField::FiscalQuarter)
        .with("P/E", FinancialField::PriceToEarningsRatio)
        .with("P/B", FinancialField::PriceToBookRatio)
        .with("P/S", FinancialField::PriceToSalesRatio)
        .with("EV/EBITDA", FinancialField::EnterpriseValueToEbitdaRatio)
        .with("EPS (VND)", FinancialField::EarningsPerShare)
        .with("BVPS (VND)", FinancialField::BookValuePerShare)
        .with_scaled("ROE (%)", FinancialField::ReturnOnEquity, PERCENT)
        .with_scaled("ROA (%)", FinancialField::ReturnOnAssets, PERCENT)
        .with_scaled("ROIC (%)", FinancialField::ReturnOnInvestedCapital, PERCENT)
        .with_scaled("Gross Profit Margin (%)", FinancialField::GrossMargin, PERCENT)
        .with_scaled("EBIT Margin (%)", FinancialField::OperatingMargin, PERCENT)
        .with_scaled("Net Profit Margin (%)", FinancialField::NetMargin, PERCENT)
        .with("Debt/Equity", FinancialField::DebtToEquity)
        .with("Current Ratio", FinancialField::CurrentRatio)
        .with("Quick Ratio", FinancialField::QuickRatio)
        .with("Cash Ratio", FinancialField::CashRatio)
        .with("Interest Coverage", FinancialField::InterestCoverage)
        .with("Asset Turnover", FinancialField::AssetTurnover)
        .with("Inventory Turnover", FinancialField::InventoryTurnover)
        .with("Days Sales Outstanding", FinancialField::DaysSalesOutstanding)
        .with_scaled("Market Capital (Bn. VND)", FinancialField::MarketCap, 1e9)
        .with_scaled(
            "Outstanding Share (Mil. Shares)",
            FinancialField::OutstandingShares,
            1e6,
        )
        .with("t", PriceField::Date)
        .with("o", PriceField::Open)
        .with("h", PriceField::High)
        .with("l", PriceField::Low)
        .with("c", PriceField::Close)
        .with("v", PriceField::Volume)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_units() {
        let map = default_columns();
        assert_eq!(map.utc_offset_minutes, 420);
        assert_relative_eq!(map.resolve("ROE (%)").unwrap().scale, 0.01);
        assert_relative_eq!(map.resolve("Market Capital (Bn. VND)").unwrap().scale, 1e9);
        assert_relative_eq!(map.resolve("P/E").unwrap().scale, 1.0);
        assert!(map.resolve("roe").is_none());
    }
}
