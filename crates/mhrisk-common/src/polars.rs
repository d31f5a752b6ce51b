//! Polars AnyValue utility functions.
//!
//! This module provides helper functions for working with Polars `AnyValue` types,
//! including raw-value conversion, string conversion and numeric parsing.

use chrono::NaiveDate;
use polars::prelude::{AnyValue, DataFrame, PolarsResult, Series};

use mhrisk_model::RawValue;

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Converts a Polars `AnyValue` into an owned [`RawValue`].
///
/// Nested lists are converted recursively. Types without a dedicated
/// variant fall back to their display text so nothing is silently lost.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use mhrisk_common::any_to_raw;
/// use mhrisk_model::RawValue;
///
/// assert_eq!(any_to_raw(AnyValue::Null), RawValue::Null);
/// assert_eq!(any_to_raw(AnyValue::Int32(7)), RawValue::Int(7));
/// assert_eq!(any_to_raw(AnyValue::String("<5")), RawValue::Text("<5".to_string()));
/// ```
pub fn any_to_raw(value: AnyValue<'_>) -> RawValue {
    match value {
        AnyValue::Null => RawValue::Null,
        AnyValue::Boolean(b) => RawValue::Bool(b),
        AnyValue::Int8(v) => RawValue::Int(i64::from(v)),
        AnyValue::Int16(v) => RawValue::Int(i64::from(v)),
        AnyValue::Int32(v) => RawValue::Int(i64::from(v)),
        AnyValue::Int64(v) => RawValue::Int(v),
        AnyValue::UInt8(v) => RawValue::Int(i64::from(v)),
        AnyValue::UInt16(v) => RawValue::Int(i64::from(v)),
        AnyValue::UInt32(v) => RawValue::Int(i64::from(v)),
        AnyValue::UInt64(v) => match i64::try_from(v) {
            Ok(v) => RawValue::Int(v),
            Err(_) => RawValue::Float(v as f64),
        },
        AnyValue::Float32(v) => RawValue::Float(f64::from(v)),
        AnyValue::Float64(v) => RawValue::Float(v),
        AnyValue::String(s) => RawValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => RawValue::Text(s.to_string()),
        AnyValue::Date(days) => days
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map_or(RawValue::Null, RawValue::Date),
        AnyValue::List(series) => RawValue::List(series_to_raw(&series)),
        other => RawValue::Text(other.to_string()),
    }
}

/// Converts every element of a Series into a [`RawValue`].
pub fn series_to_raw(series: &Series) -> Vec<RawValue> {
    (0..series.len())
        .map(|idx| series.get(idx).map_or(RawValue::Null, any_to_raw))
        .collect()
}

/// Reads a whole DataFrame column as raw values, one per row.
///
/// Fails only if the column does not exist.
pub fn column_cells(df: &DataFrame, name: &str) -> PolarsResult<Vec<RawValue>> {
    let column = df.column(name)?;
    Ok((0..df.height())
        .map(|idx| column.get(idx).map_or(RawValue::Null, any_to_raw))
        .collect())
}

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`, properly formats numeric types without
/// unnecessary trailing zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use mhrisk_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::String("P-001")), "P-001");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// Only the fractional part is trimmed, so integral values keep their
/// zeros.
///
/// # Examples
///
/// ```
/// use mhrisk_common::format_numeric;
///
/// assert_eq!(format_numeric(250.0), "250");
/// assert_eq!(format_numeric(296.20), "296.2");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, IntoColumn, NamedFrom};

    use super::*;

    #[test]
    fn test_any_to_raw_numbers() {
        assert_eq!(any_to_raw(AnyValue::Int64(-3)), RawValue::Int(-3));
        assert_eq!(any_to_raw(AnyValue::UInt8(4)), RawValue::Int(4));
        assert_eq!(any_to_raw(AnyValue::Float64(1.5)), RawValue::Float(1.5));
    }

    #[test]
    fn test_any_to_raw_date() {
        assert_eq!(
            any_to_raw(AnyValue::Date(0)),
            RawValue::Date(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
        );
        assert_eq!(
            any_to_raw(AnyValue::Date(16_436)),
            RawValue::Date(NaiveDate::from_ymd_opt(2015, 1, 1).unwrap())
        );
    }

    #[test]
    fn test_column_cells_reads_lists() {
        let inner_a = Series::new("".into(), vec!["250.00", "296.20"]);
        let inner_b = Series::new("".into(), vec!["401"]);
        let column: Column = Series::new("ICD-9".into(), &[inner_a, inner_b]).into_column();
        let df = DataFrame::new(vec![column]).unwrap();

        let cells = column_cells(&df, "ICD-9").unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(
            cells[0],
            RawValue::List(vec![
                RawValue::Text("250.00".to_string()),
                RawValue::Text("296.20".to_string()),
            ])
        );
        assert_eq!(cells[1], RawValue::List(vec![RawValue::Text("401".to_string())]));
    }

    #[test]
    fn test_column_cells_missing_column() {
        let df = DataFrame::new(vec![
            Series::new("A".into(), vec![1i32]).into_column(),
        ])
        .unwrap();
        assert!(column_cells(&df, "B").is_err());
    }

    #[test]
    fn test_any_to_string() {
        assert_eq!(any_to_string(AnyValue::Null), "");
        assert_eq!(any_to_string(AnyValue::Int64(-100)), "-100");
        assert_eq!(any_to_string(AnyValue::Float64(10.0)), "10");
        assert_eq!(any_to_string(AnyValue::Float64(1.50)), "1.5");
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(10.0), "10");
        assert_eq!(format_numeric(250.0), "250");
        assert_eq!(format_numeric(1.50), "1.5");
        assert_eq!(format_numeric(0.0), "0");
        assert_eq!(format_numeric(-0.0), "-0");
    }

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("  "), None);
        assert_eq!(parse_f64("  3.25  "), Some(3.25));
        assert_eq!(parse_f64("invalid"), None);
    }
}
