pub mod codes;
pub mod config;
pub mod error;
pub mod lab;
pub mod report;
pub mod value;

pub use codes::{CategoryCodeSets, CodeSet, ReferenceSets};
pub use config::{ColumnNames, FeatureConfig, MedicationConfig, PatientStatusConfig};
pub use error::{ModelError, Result};
pub use lab::{LabObservation, LabOutcome, PatientLabs, Severity, UnevaluableReason};
pub use report::FeatureReport;
pub use value::RawValue;
