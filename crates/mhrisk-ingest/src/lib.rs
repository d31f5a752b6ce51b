//! External collaborators of the feature pipeline.
//!
//! - **config**: TOML project configuration
//! - **reference**: CSV reference code tables
//! - **table**: Parquet/CSV patient and feature tables

pub mod config;
pub mod error;
pub mod reference;
pub mod table;

pub use config::{DataPaths, ProjectConfig, ReferencePaths, load_project_config};
pub use error::{IngestError, Result};
pub use reference::{load_chronic_codes, load_physical_comorbidities, load_reference_sets};
pub use table::{TableFormat, flatten_list_columns, read_patient_table, write_feature_table};
