//! Per-patient aggregation.
//!
//! - **labs**: lab record assembly, classification and risk summaries
//! - **medications**: duration bucketing and counting
//! - **demographics**: age and risk-tag derivation

pub mod demographics;
pub mod labs;
pub mod medications;

pub use demographics::{derive_age, list_risks};
pub use labs::{
    LabRecords, build_lab_records, build_patient_labs, classify_all_labs,
    summarize_risk_proportion, summarize_risk_score,
};
pub use medications::{DurationBucket, NO_MEDICATION_DATA, count_durations};
