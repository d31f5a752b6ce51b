//! Lab record assembly and risk summaries.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use mhrisk_common::{column_cells, format_numeric};
use mhrisk_model::{ColumnNames, LabObservation, PatientLabs, RawValue};
use polars::prelude::DataFrame;
use tracing::trace;

use crate::error::Result;
use crate::labs::LabRegistry;
use crate::normalization::normalize_lab_value;

/// Lab records keyed by patient identifier text.
pub type LabRecords = BTreeMap<String, PatientLabs>;

/// Assembles one patient's lab observations from the four parallel cells.
///
/// All four cells must be lists of equal length; otherwise the patient
/// has no labs. Sex is kept as raw text for sex-specific rules.
pub fn build_patient_labs(
    sex: &RawValue,
    tests: &RawValue,
    dates: &RawValue,
    results: &RawValue,
    units: &RawValue,
) -> PatientLabs {
    let sex = sex.as_text().map(str::to_string);
    let (Some(tests), Some(dates), Some(results), Some(units)) =
        (tests.as_list(), dates.as_list(), results.as_list(), units.as_list())
    else {
        return PatientLabs { sex, labs: Vec::new() };
    };
    let len = tests.len();
    if dates.len() != len || results.len() != len || units.len() != len {
        return PatientLabs { sex, labs: Vec::new() };
    }

    let labs = tests
        .iter()
        .zip(dates)
        .zip(results)
        .zip(units)
        .map(|(((test, date), result), unit)| LabObservation {
            test: text_of(test),
            date: date_of(date),
            raw_result: result.clone(),
            result: normalize_lab_value(result),
            units: text_of(unit),
            status: None,
        })
        .collect();
    PatientLabs { sex, labs }
}

/// Builds lab records for every row of the patient table.
///
/// Rows are keyed by the identifier's text form. When an identifier
/// repeats, the later row's record replaces the earlier one.
pub fn build_lab_records(df: &DataFrame, columns: &ColumnNames) -> Result<LabRecords> {
    let ids = df.column(&columns.patient_id)?;
    let sexes = column_cells(df, &columns.sex)?;
    let tests = column_cells(df, &columns.lab_tests)?;
    let dates = column_cells(df, &columns.lab_dates)?;
    let results = column_cells(df, &columns.lab_results)?;
    let units = column_cells(df, &columns.lab_units)?;

    let mut records = LabRecords::new();
    for idx in 0..df.height() {
        let id = mhrisk_common::any_to_string(ids.get(idx)?);
        let patient = build_patient_labs(
            &sexes[idx],
            &tests[idx],
            &dates[idx],
            &results[idx],
            &units[idx],
        );
        trace!(patient_id = %id, labs = patient.labs.len(), "built lab record");
        records.insert(id, patient);
    }
    Ok(records)
}

/// Sets `status` on every observation from the registry.
pub fn classify_all_labs(records: &mut LabRecords, registry: &LabRegistry) {
    for patient in records.values_mut() {
        let sex = patient.sex.as_deref();
        for lab in &mut patient.labs {
            lab.status = Some(registry.classify(lab, sex));
        }
    }
}

/// Sum of severity codes; unevaluable and unclassified observations add 0.
pub fn summarize_risk_score(labs: &[LabObservation]) -> i64 {
    labs.iter()
        .filter_map(|lab| lab.status.and_then(|outcome| outcome.code()))
        .map(i64::from)
        .sum()
}

/// Share of evaluable observations that are borderline or worse.
///
/// `None` when no observation is evaluable, which is not the same as a
/// proportion of zero.
pub fn summarize_risk_proportion(labs: &[LabObservation]) -> Option<f64> {
    let severities: Vec<_> = labs
        .iter()
        .filter_map(|lab| lab.status.and_then(|outcome| outcome.severity()))
        .collect();
    if severities.is_empty() {
        return None;
    }
    let flagged = severities.iter().filter(|s| s.is_flagged()).count();
    Some(flagged as f64 / severities.len() as f64)
}

fn text_of(raw: &RawValue) -> Option<String> {
    match raw {
        RawValue::Text(s) => Some(s.clone()),
        RawValue::Int(v) => Some(v.to_string()),
        RawValue::Float(v) if v.is_finite() => Some(format_numeric(*v)),
        _ => None,
    }
}

fn date_of(raw: &RawValue) -> Option<NaiveDate> {
    match raw {
        RawValue::Date(date) => Some(*date),
        RawValue::Text(s) => {
            let s = s.trim();
            let head = s.get(..10).unwrap_or(s);
            NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use mhrisk_model::{LabOutcome, Severity, UnevaluableReason};

    use super::*;

    fn lab(status: Option<LabOutcome>) -> LabObservation {
        LabObservation {
            test: Some("LDL".to_string()),
            date: None,
            raw_result: RawValue::Null,
            result: None,
            units: None,
            status,
        }
    }

    #[test]
    fn mismatched_lengths_yield_no_labs() {
        let patient = build_patient_labs(
            &RawValue::from("Female"),
            &RawValue::from(vec!["LDL", "HDL"]),
            &RawValue::from(vec!["2014-01-01"]),
            &RawValue::from(vec![3.0, 1.1]),
            &RawValue::from(vec!["mmol/L", "mmol/L"]),
        );
        assert_eq!(patient.sex.as_deref(), Some("Female"));
        assert!(patient.labs.is_empty());
    }

    #[test]
    fn non_list_cell_yields_no_labs() {
        let patient = build_patient_labs(
            &RawValue::Null,
            &RawValue::Null,
            &RawValue::Null,
            &RawValue::Null,
            &RawValue::Null,
        );
        assert_eq!(patient, PatientLabs::default());
    }

    #[test]
    fn observations_are_normalized() {
        let patient = build_patient_labs(
            &RawValue::from("Male"),
            &RawValue::from(vec!["GFR"]),
            &RawValue::from(vec!["2014-03-01 00:00:00"]),
            &RawValue::from(vec![">90"]),
            &RawValue::from(vec!["mL/min"]),
        );
        let obs = &patient.labs[0];
        assert_eq!(obs.test.as_deref(), Some("GFR"));
        assert_eq!(obs.date, NaiveDate::from_ymd_opt(2014, 3, 1));
        assert_eq!(obs.raw_result, RawValue::from(">90"));
        assert_eq!(obs.result, Some(90.0));
        assert_eq!(obs.units.as_deref(), Some("mL/min"));
        assert_eq!(obs.status, None);
    }

    #[test]
    fn risk_summaries() {
        let evaluated = |s| Some(LabOutcome::Evaluated(s));
        let unknown = Some(LabOutcome::Unevaluable(UnevaluableReason::UnknownTest));

        assert_eq!(summarize_risk_proportion(&[]), None);
        assert_eq!(summarize_risk_proportion(&[lab(unknown), lab(None)]), None);

        let labs = [
            lab(evaluated(Severity::Normal)),
            lab(evaluated(Severity::Abnormal)),
            lab(unknown),
        ];
        assert_eq!(summarize_risk_proportion(&labs), Some(0.5));
        assert_eq!(summarize_risk_score(&labs), 2);
        assert_eq!(summarize_risk_score(&[]), 0);
    }
}
