//! Error types for configuration, reference data and table I/O.

use std::path::PathBuf;

use mhrisk_model::ModelError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to access file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("required column '{column}' not found in {path}")]
    MissingReferenceColumn { path: PathBuf, column: String },

    #[error("unsupported table format: {path} (expected .parquet or .csv)")]
    UnsupportedFormat { path: PathBuf },

    #[error("no {what} path given in config or on the command line")]
    MissingPath { what: &'static str },

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Config(#[from] ModelError),
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, err: &csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_file() {
        let err = IngestError::MissingReferenceColumn {
            path: PathBuf::from("ref/chronic.csv"),
            column: "Code".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "required column 'Code' not found in ref/chronic.csv"
        );
    }

    #[test]
    fn model_errors_convert() {
        let err: IngestError = ModelError::InvalidConfig("bad".to_string()).into();
        assert!(matches!(err, IngestError::Config(_)));
    }
}
