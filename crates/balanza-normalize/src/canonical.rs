//! Rows viewed through a column map.

use balanza_traits::{
    Canonical, ColumnMap, ColumnMapping, Date, FinancialField, MetaField, PeriodKind, RawRow,
};
use chrono::{FixedOffset, Offset, Utc};
use serde_json::Value;

use crate::coerce;

/// A raw row whose cells have been resolved to canonical targets.
///
/// Unmapped cells are dropped. When several cells resolve to the same target,
/// the first one that coerces wins.
#[derive(Debug)]
pub(crate) struct CanonicalRow<'a> {
    index: usize,
    cells: Vec<(&'a ColumnMapping, &'a Value)>,
    offset: FixedOffset,
}

impl<'a> CanonicalRow<'a> {
    pub(crate) fn new(row: RawRow<'a>, columns: &'a ColumnMap) -> Self {
        let cells = row
            .cells()
            .filter_map(|(label, value)| columns.resolve(label).map(|m| (m, value)))
            .collect();
        Self {
            index: row.index(),
            cells,
            offset: utc_offset(columns),
        }
    }

    pub(crate) const fn index(&self) -> usize {
        self.index
    }

    fn candidates(
        &self,
        target: Canonical,
    ) -> impl Iterator<Item = (&'a ColumnMapping, &'a Value)> + '_ {
        self.cells
            .iter()
            .copied()
            .filter(move |(m, v)| m.target == target && !v.is_null())
    }

    /// First non-null cell for `target`.
    pub(crate) fn raw(&self, target: impl Into<Canonical>) -> Option<&'a Value> {
        self.candidates(target.into()).next().map(|(_, v)| v)
    }

    /// Scaled numeric value.
    pub(crate) fn number(&self, target: impl Into<Canonical>) -> Option<f64> {
        self.candidates(target.into())
            .find_map(|(m, v)| coerce::to_f64(v).map(|x| x * m.scale))
            .filter(|x| x.is_finite())
    }

    pub(crate) fn integer(&self, target: impl Into<Canonical>) -> Option<i64> {
        self.number(target)
            .filter(|v| v.fract() == 0.0)
            .map(|v| v as i64)
    }

    pub(crate) fn text(&self, target: impl Into<Canonical>) -> Option<String> {
        self.candidates(target.into())
            .find_map(|(_, v)| coerce::to_text(v))
    }

    pub(crate) fn flag(&self, target: impl Into<Canonical>) -> Option<bool> {
        self.candidates(target.into())
            .find_map(|(_, v)| coerce::to_bool(v))
    }

    pub(crate) fn date(&self, target: impl Into<Canonical>) -> Option<Date> {
        let offset = self.offset;
        self.candidates(target.into())
            .find_map(|(_, v)| coerce::to_date(v, offset))
    }

    /// Whether the row is for `ticker`. Rows without a ticker cell belong to
    /// every ticker.
    pub(crate) fn belongs_to(&self, ticker: &str) -> bool {
        self.text(MetaField::Ticker)
            .is_none_or(|t| t.eq_ignore_ascii_case(ticker))
    }

    /// Last day of the period the row reports on.
    ///
    /// Uses the statement date when present, otherwise the fiscal year and
    /// quarter.
    pub(crate) fn period_end(&self) -> Option<Date> {
        if let Some(date) = self.date(MetaField::ReportPeriod) {
            return Some(date);
        }
        let year = i32::try_from(self.integer(MetaField::FiscalYear)?).ok()?;
        let (month, day) = match self.integer(MetaField::FiscalQuarter) {
            Some(1) => (3, 31),
            Some(2) => (6, 30),
            Some(3) => (9, 30),
            _ => (12, 31),
        };
        Date::from_ymd_opt(year, month, day)
    }

    /// Period semantics from the row's label or fiscal quarter.
    pub(crate) fn period_kind(&self) -> Option<PeriodKind> {
        if let Some(label) = self.text(MetaField::PeriodLabel) {
            return label.parse().ok();
        }
        match self.integer(MetaField::FiscalQuarter) {
            Some(1..=4) => Some(PeriodKind::Quarterly),
            Some(5) => Some(PeriodKind::Annual),
            _ => None,
        }
    }

    pub(crate) fn financial(&self, field: FinancialField) -> Option<f64> {
        self.number(field)
    }
}

/// Offset used for turning instants into dates.
pub(crate) fn utc_offset(columns: &ColumnMap) -> FixedOffset {
    columns
        .utc_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}
