//! Project configuration loaded from TOML.
//!
//! A project file carries the feature configuration at its top level plus
//! `[data]` and `[reference]` tables naming the files to read and write.
//! Relative paths resolve against the directory holding the config file.

use std::path::{Path, PathBuf};

use mhrisk_model::FeatureConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Patient table input and feature table output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Reference code tables and the columns to read from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencePaths {
    /// CSV with one chronic-condition code per row.
    pub chronic_conditions: Option<PathBuf>,
    /// CSV with one row per physical-comorbidity category.
    pub physical_comorbidities: Option<PathBuf>,
    pub chronic_code_column: String,
    pub category_column: String,
    /// Column holding a comma-separated code list per category.
    pub category_codes_column: String,
}

impl Default for ReferencePaths {
    fn default() -> Self {
        Self {
            chronic_conditions: None,
            physical_comorbidities: None,
            chronic_code_column: "Code".to_string(),
            category_column: "PhysComorb".to_string(),
            category_codes_column: "ICD-9".to_string(),
        }
    }
}

/// Everything a pipeline run needs to know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(flatten)]
    pub pipeline: FeatureConfig,
    #[serde(default)]
    pub data: DataPaths,
    #[serde(default)]
    pub reference: ReferencePaths,
}

impl ProjectConfig {
    /// Parses a project config from TOML text without touching the filesystem.
    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|source| IngestError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.pipeline.validate()?;
        Ok(config)
    }

    /// Resolves relative paths against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.data.input,
            &mut self.data.output,
            &mut self.reference.chronic_conditions,
            &mut self.reference.physical_comorbidities,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Loads and validates a project config file.
pub fn load_project_config(path: &Path) -> Result<ProjectConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let mut config = ProjectConfig::from_toml_str(&contents, path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    config.resolve_paths(base);
    debug!(
        path = %path.display(),
        features = config.pipeline.features.len(),
        mental_health_groups = config.pipeline.mental_health_groups.len(),
        "loaded project config"
    );
    Ok(config)
}
