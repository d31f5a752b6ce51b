//! Lab result normalization.

use mhrisk_common::parse_f64;
use mhrisk_model::RawValue;

/// Comparison and approximation markers stripped from textual results.
const RESULT_MARKERS: [char; 4] = ['>', '<', '=', '~'];

/// Normalizes a recorded lab result to a number.
///
/// Numbers pass through unchanged. Text has surrounding whitespace and the
/// markers `>`, `<`, `=` and `~` removed before parsing, so `">90"` reads
/// as `90.0`. NaN, missing values and unparseable text yield `None`.
/// Booleans are not results and also yield `None`; they are never read as
/// `1.0`/`0.0`.
pub fn normalize_lab_value(raw: &RawValue) -> Option<f64> {
    match raw {
        RawValue::Int(v) => Some(*v as f64),
        RawValue::Float(v) if v.is_nan() => None,
        RawValue::Float(v) => Some(*v),
        RawValue::Text(s) => parse_lab_value(s),
        _ => None,
    }
}

/// Parses a textual lab result, stripping comparison markers.
pub fn parse_lab_value(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !RESULT_MARKERS.contains(c))
        .collect();
    parse_f64(&cleaned).filter(|v| !v.is_nan())
}
