//! Age and risk-tag derivation.

use chrono::Datelike;
use mhrisk_common::{format_numeric, parse_f64};
use mhrisk_model::RawValue;

/// Age at death, or at `reference_year` for patients not known to be deceased.
///
/// `None` when the birth year is missing or unreadable, or when the years
/// are too far apart to subtract.
pub fn derive_age(birth_year: &RawValue, deceased_year: &RawValue, reference_year: i64) -> Option<i64> {
    let born = year_of(birth_year)?;
    let end = year_of(deceased_year).unwrap_or(reference_year);
    end.checked_sub(born)
}

/// Risk tags of a patient as a clean list.
///
/// Missing cells become an empty list, a bare scalar becomes a single tag,
/// and missing or blank entries inside a list are dropped.
pub fn list_risks(raw: &RawValue) -> Vec<String> {
    match raw {
        RawValue::List(items) => items.iter().filter_map(tag_of).collect(),
        other => tag_of(other).into_iter().collect(),
    }
}

fn tag_of(raw: &RawValue) -> Option<String> {
    match raw {
        RawValue::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        RawValue::Int(v) => Some(v.to_string()),
        RawValue::Float(v) if v.is_finite() => Some(format_numeric(*v)),
        RawValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn year_of(raw: &RawValue) -> Option<i64> {
    let year = match raw {
        RawValue::Int(v) => return Some(*v),
        RawValue::Float(v) => *v,
        RawValue::Text(s) => parse_f64(s)?,
        RawValue::Date(date) => return Some(i64::from(date.year())),
        _ => return None,
    };
    year.is_finite().then(|| year.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_uses_death_year_when_present() {
        assert_eq!(derive_age(&RawValue::Int(1950), &RawValue::Int(2010), 2015), Some(60));
        assert_eq!(derive_age(&RawValue::Int(1950), &RawValue::Null, 2015), Some(65));
        assert_eq!(
            derive_age(&RawValue::Float(1950.0), &RawValue::Float(f64::NAN), 2015),
            Some(65)
        );
        assert_eq!(derive_age(&RawValue::from("1980"), &RawValue::Null, 2015), Some(35));
        assert_eq!(derive_age(&RawValue::Null, &RawValue::Int(2010), 2015), None);
    }

    #[test]
    fn out_of_range_years_give_no_age() {
        assert_eq!(derive_age(&RawValue::Int(i64::MIN), &RawValue::Null, 2015), None);
        assert_eq!(derive_age(&RawValue::Int(1), &RawValue::Int(i64::MIN), 2015), None);
        assert_eq!(derive_age(&RawValue::Float(1e300), &RawValue::Int(i64::MIN), 2015), None);
    }

    #[test]
    fn risks_are_cleaned() {
        assert!(list_risks(&RawValue::Null).is_empty());
        assert!(list_risks(&RawValue::Float(f64::NAN)).is_empty());
        assert_eq!(list_risks(&RawValue::from("Smoker")), vec!["Smoker"]);
        let raw = RawValue::List(vec![
            RawValue::from("Smoker"),
            RawValue::Null,
            RawValue::from("  "),
            RawValue::from(" Obesity "),
        ]);
        assert_eq!(list_risks(&raw), vec!["Smoker", "Obesity"]);
    }
}
