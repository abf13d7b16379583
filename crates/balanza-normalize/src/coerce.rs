//! Cell coercion.
//!
//! Each function returns `None` for a cell it cannot interpret. Callers store
//! that `None` as the missing marker; nothing here fails a whole record.

use balanza_traits::Date;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Epoch values at or above this magnitude are milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Numbers and numeric strings as finite `f64`.
#[must_use]
pub fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// A non-negative whole number of shares.
#[must_use]
pub fn to_volume(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64)
        .then_some(value as u64)
}

/// Booleans, `"true"`/`"false"`, and `0`/`1`.
#[must_use]
pub fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(v) if v == 0.0 => Some(false),
            Some(v) if v == 1.0 => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Non-empty text; numbers are rendered.
#[must_use]
pub fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A calendar date from a date string, a timestamp string, or unix epoch
/// seconds/milliseconds.
///
/// Instants are converted to dates at `offset`. Naive date-times keep their
/// own calendar date. Eight-digit strings are read as `YYYYMMDD`.
#[must_use]
pub fn to_date(value: &Value, offset: FixedOffset) -> Option<Date> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64))
            .and_then(|ts| from_epoch(ts, offset)),
        Value::String(s) => parse_date_str(s.trim(), offset),
        _ => None,
    }
}

fn parse_date_str(s: &str, offset: FixedOffset) -> Option<Date> {
    if s.is_empty() {
        return None;
    }

    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.chars().all(|c| c.is_ascii_digit()) {
        if s.len() == 8 {
            let year = s[0..4].parse().ok()?;
            let month = s[4..6].parse().ok()?;
            let day = s[6..8].parse().ok()?;
            return NaiveDate::from_ymd_opt(year, month, day);
        }
        return s.parse::<i64>().ok().and_then(|ts| from_epoch(ts, offset));
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Some(instant.with_timezone(&offset).date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

fn from_epoch(ts: i64, offset: FixedOffset) -> Option<Date> {
    let instant = if ts.unsigned_abs() >= MILLIS_THRESHOLD.unsigned_abs() {
        DateTime::from_timestamp_millis(ts)?
    } else {
        DateTime::from_timestamp(ts, 0)?
    };
    Some(instant.with_timezone(&offset).date_naive())
}
