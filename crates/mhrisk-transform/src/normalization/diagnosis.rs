//! Diagnosis code canonicalization.
//!
//! Codes arrive as numbers (`250.0`), padded strings (`"296.20"`) or
//! letter-prefixed strings (`"V70.0"`). The canonical form is the numeric
//! value printed without trailing fractional zeros, so `250.0`, `"250"`
//! and `"250.00"` all become `"250"`. Codes that do not read as a number
//! have no canonical form and are dropped by the list normalizer.

use mhrisk_common::{format_numeric, parse_f64};
use mhrisk_model::RawValue;

/// Canonicalizes a single diagnosis code.
///
/// Returns `None` for missing values and for codes that are not numeric.
pub fn normalize_diagnosis_code(raw: &RawValue) -> Option<String> {
    match raw {
        RawValue::Int(v) => Some(v.to_string()),
        RawValue::Float(v) => canonical(*v),
        RawValue::Text(s) => parse_f64(s).and_then(canonical),
        _ => None,
    }
}

/// Canonicalizes a diagnosis-code cell.
///
/// A list keeps its canonicalizable entries in their original order; a
/// bare scalar is treated as a one-element list. Missing cells return
/// `None` so callers can tell "no data" apart from "no usable codes".
pub fn normalize_diagnosis_codes(raw: &RawValue) -> Option<Vec<String>> {
    if raw.is_missing() {
        return None;
    }
    let codes = match raw.as_list() {
        Some(items) => items.iter().filter_map(normalize_diagnosis_code).collect(),
        None => normalize_diagnosis_code(raw).into_iter().collect(),
    };
    Some(codes)
}

fn canonical(value: f64) -> Option<String> {
    value.is_finite().then(|| format_numeric(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equivalent_spellings_share_a_canonical_form() {
        for raw in [
            RawValue::Float(250.0),
            RawValue::Int(250),
            RawValue::from("250"),
            RawValue::from("250.00"),
            RawValue::from(" 250. "),
        ] {
            assert_eq!(normalize_diagnosis_code(&raw).as_deref(), Some("250"), "{raw:?}");
        }
        assert_eq!(
            normalize_diagnosis_code(&RawValue::from("296.20")).as_deref(),
            Some("296.2")
        );
    }

    #[test]
    fn letter_prefixed_codes_are_dropped() {
        assert_eq!(normalize_diagnosis_code(&RawValue::from("V70.0")), None);
        assert_eq!(normalize_diagnosis_code(&RawValue::from("E11")), None);

        let cell = RawValue::from(vec!["V70.0", "401.9", "E880"]);
        assert_eq!(normalize_diagnosis_codes(&cell), Some(vec!["401.9".to_string()]));
    }

    #[test]
    fn missing_cell_is_distinct_from_empty_list() {
        assert_eq!(normalize_diagnosis_codes(&RawValue::Null), None);
        assert_eq!(normalize_diagnosis_codes(&RawValue::Float(f64::NAN)), None);
        assert_eq!(normalize_diagnosis_codes(&RawValue::List(vec![])), Some(vec![]));
    }

    #[test]
    fn scalar_cell_is_a_single_code() {
        assert_eq!(
            normalize_diagnosis_codes(&RawValue::Float(311.0)),
            Some(vec!["311".to_string()])
        );
    }
}
