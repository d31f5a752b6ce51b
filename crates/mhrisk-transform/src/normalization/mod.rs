//! Value normalizers for raw patient-table cells.
//!
//! This module turns loosely typed cells into canonical values:
//! - **lab_value**: lab result strings and numbers to `f64`
//! - **diagnosis**: diagnosis codes to canonical code strings
//! - **sex**: sex strings to a binary code
//!
//! Every normalizer is total. Values that cannot be normalized come back
//! as `None` rather than an error.

pub mod diagnosis;
pub mod lab_value;
pub mod sex;

pub use diagnosis::{normalize_diagnosis_code, normalize_diagnosis_codes};
pub use lab_value::{normalize_lab_value, parse_lab_value};
pub use sex::{normalize_sex, SEX_FEMALE, SEX_MALE};
