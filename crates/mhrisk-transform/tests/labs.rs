//! Threshold behaviour of the standard lab rules.

use mhrisk_model::{LabObservation, LabOutcome, RawValue, Severity, UnevaluableReason};
use mhrisk_transform::LabRegistry;
use mhrisk_transform::normalization::normalize_lab_value;
use proptest::prelude::*;

fn classify(test: &str, result: f64) -> Option<u8> {
    classify_with_sex(test, result, None)
}

fn classify_with_sex(test: &str, result: f64, sex: Option<&str>) -> Option<u8> {
    let registry = LabRegistry::standard();
    let rule = registry.get(test).unwrap();
    rule.classify(Some(result), sex).ok().map(Severity::code)
}

#[test]
fn fasting_glucose_boundaries() {
    assert_eq!(classify("FASTING GLUCOSE", 6.1), Some(0));
    assert_eq!(classify("FASTING GLUCOSE", 6.11), Some(1));
    assert_eq!(classify("FASTING GLUCOSE", 6.99), Some(1));
    assert_eq!(classify("FASTING GLUCOSE", 7.0), Some(2));
}

#[test]
fn gfr_boundaries() {
    assert_eq!(classify("GFR", 90.0), Some(0));
    assert_eq!(classify("GFR", 89.9), Some(1));
    assert_eq!(classify("GFR", 60.0), Some(1));
    assert_eq!(classify("GFR", 59.9), Some(2));
}

#[test]
fn glucose_tolerance_and_hba1c_boundaries() {
    assert_eq!(classify("GLUCOSE TOLERANCE", 7.79), Some(0));
    assert_eq!(classify("GLUCOSE TOLERANCE", 7.8), Some(1));
    assert_eq!(classify("GLUCOSE TOLERANCE", 11.1), Some(2));
    assert_eq!(classify("HBA1C", 5.9), Some(0));
    assert_eq!(classify("HBA1C", 6.0), Some(1));
    assert_eq!(classify("HBA1C", 6.5), Some(2));
}

#[test]
fn inr_gap_is_abnormal() {
    assert_eq!(classify("INR", 1.1), Some(0));
    assert_eq!(classify("INR", 1.5), Some(2));
    assert_eq!(classify("INR", 2.0), Some(1));
    assert_eq!(classify("INR", 3.0), Some(1));
    assert_eq!(classify("INR", 3.1), Some(2));
}

#[test]
fn lipid_boundaries() {
    assert_eq!(classify("LDL", 1.99), Some(0));
    assert_eq!(classify("LDL", 2.0), Some(1));
    assert_eq!(classify("LDL", 3.5), Some(2));
    assert_eq!(classify("TOTAL CHOLESTEROL", 5.19), Some(0));
    assert_eq!(classify("TOTAL CHOLESTEROL", 5.2), Some(1));
    assert_eq!(classify("TOTAL CHOLESTEROL", 6.2), Some(2));
    assert_eq!(classify("TRIGLYCERIDES", 1.69), Some(0));
    assert_eq!(classify("TRIGLYCERIDES", 1.7), Some(1));
    assert_eq!(classify("TRIGLYCERIDES", 2.3), Some(2));
}

#[test]
fn albumin_upper_bounds_are_inclusive() {
    assert_eq!(classify("MICROALBUMIN", 29.9), Some(0));
    assert_eq!(classify("MICROALBUMIN", 30.0), Some(1));
    assert_eq!(classify("MICROALBUMIN", 300.0), Some(1));
    assert_eq!(classify("MICROALBUMIN", 300.1), Some(2));
    assert_eq!(classify("URINE ALBUMIN CREATININE RATIO", 2.9), Some(0));
    assert_eq!(classify("URINE ALBUMIN CREATININE RATIO", 3.0), Some(1));
    assert_eq!(classify("URINE ALBUMIN CREATININE RATIO", 30.0), Some(1));
    assert_eq!(classify("URINE ALBUMIN CREATININE RATIO", 30.1), Some(2));
}

#[test]
fn hdl_depends_on_sex() {
    assert_eq!(classify_with_sex("HDL", 1.0, Some("Male")), Some(0));
    assert_eq!(classify_with_sex("HDL", 0.99, Some("male")), Some(2));
    assert_eq!(classify_with_sex("HDL", 1.3, Some("Female")), Some(0));
    assert_eq!(classify_with_sex("HDL", 1.29, Some("female")), Some(2));
    assert_eq!(classify_with_sex("HDL", 1.5, Some("F")), None);
    assert_eq!(classify_with_sex("HDL", 1.5, None), None);
}

#[test]
fn registry_classifies_raw_observations() {
    let registry = LabRegistry::standard();
    let observation = |test: &str, raw: &str| {
        let raw_result = RawValue::from(raw);
        LabObservation {
            test: Some(test.to_string()),
            date: None,
            result: normalize_lab_value(&raw_result),
            raw_result,
            units: None,
            status: None,
        }
    };

    assert_eq!(
        registry.classify(&observation("gfr", ">90"), None),
        LabOutcome::Evaluated(Severity::Normal)
    );
    assert_eq!(
        registry.classify(&observation("GFR", "pending"), None),
        LabOutcome::Unevaluable(UnevaluableReason::UnparseableResult)
    );
    assert_eq!(
        registry.classify(&observation("HDL", "1.2"), Some("unknown")),
        LabOutcome::Unevaluable(UnevaluableReason::UnknownSex)
    );
}

proptest! {
    #[test]
    fn classification_is_deterministic(value in -1000.0f64..1000.0, idx in 0usize..11) {
        let registry = LabRegistry::standard();
        let rule = registry.rules().nth(idx).unwrap();
        let first = rule.classify(Some(value), Some("female"));
        let second = rule.classify(Some(value), Some("female"));
        prop_assert_eq!(first, second);
        prop_assert!(first.is_ok());
    }

    #[test]
    fn lookup_ignores_case_and_padding(idx in 0usize..11, pad in " {0,3}") {
        let registry = LabRegistry::standard();
        let name = registry.rules().nth(idx).unwrap().name();
        let query = format!("{pad}{}{pad}", name.to_lowercase());
        prop_assert!(registry.contains(&query));
    }
}
