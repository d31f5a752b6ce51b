//! Rule-based feature derivation for clinical risk modeling.
//!
//! This crate turns a raw patient table into a feature table:
//!
//! - **normalization**: lab values, diagnosis codes and sex to canonical form
//! - **labs**: threshold rules and the lab classifier registry
//! - **codesets**: matching canonical codes against reference sets
//! - **aggregate**: per-patient lab, medication and demographic summaries
//! - **encoding**: fixed-width one-hot encoding
//! - **pipeline**: ordered feature assembly over a polars `DataFrame`
//! - **reference**: canonical reference code sets

pub mod aggregate;
pub mod codesets;
pub mod columns;
pub mod encoding;
pub mod error;
pub mod frame;
pub mod labs;
pub mod normalization;
pub mod pipeline;
pub mod reference;

pub use codesets::{categorize_multi, is_in_any, overlap};
pub use encoding::OneHotEncoder;
pub use error::{Result, TransformError};
pub use labs::{LabRegistry, LabRule};
pub use normalization::{normalize_diagnosis_code, normalize_lab_value, normalize_sex};
pub use pipeline::{
    FeatureContext, FeatureOutput, FeaturePipeline, FeatureStep, PipelineState,
    build_default_pipeline, derive_features, derive_features_with_registry,
};
pub use reference::{canonical_code_set, mental_health_code_set};
