//! Error types for feature derivation.
//!
//! Only structural preconditions are errors. Problems with a single row
//! degrade to null or sentinel values for that row and never surface here.

use mhrisk_model::ModelError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("required column missing from patient table: {column}")]
    MissingColumn { column: String },

    #[error("selected feature column was not derived: {column}")]
    MissingFeature { column: String },

    #[error(transparent)]
    InvalidConfig(#[from] ModelError),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
