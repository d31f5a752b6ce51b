//! Reference code table loading.
//!
//! Codes are canonicalized on load with the same normalizer the pipeline
//! applies to patient codes, so set membership compares like with like.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;
use mhrisk_model::{CategoryCodeSets, CodeSet, ReferenceSets};
use mhrisk_transform::{canonical_code_set, mental_health_code_set};
use tracing::{info, warn};

use crate::config::ProjectConfig;
use crate::error::{IngestError, Result};

/// Reads a CSV file into header-keyed rows with trimmed values.
fn read_csv_rows(path: &Path) -> Result<(Vec<String>, Vec<BTreeMap<String, String>>)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| IngestError::csv(path, &e))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::csv(path, &e))?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::csv(path, &e))?;
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.clone(), value.trim().to_string()))
            .collect();
        rows.push(row);
    }
    Ok((headers, rows))
}

fn require_header(path: &Path, headers: &[String], column: &str) -> Result<()> {
    if headers.iter().any(|h| h == column) {
        Ok(())
    } else {
        Err(IngestError::MissingReferenceColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
    }
}

/// Loads chronic-condition codes from the `column` of a CSV file.
pub fn load_chronic_codes(path: &Path, column: &str) -> Result<CodeSet> {
    let (headers, rows) = read_csv_rows(path)?;
    require_header(path, &headers, column)?;
    let codes = canonical_code_set(rows.iter().filter_map(|row| row.get(column)));
    info!(path = %path.display(), codes = codes.len(), "loaded chronic-condition codes");
    Ok(codes)
}

/// Loads physical-comorbidity categories, one per CSV row.
///
/// `codes_column` holds a comma-separated code list. Rows with an empty
/// category name are skipped; a repeated category replaces the earlier one.
pub fn load_physical_comorbidities(
    path: &Path,
    category_column: &str,
    codes_column: &str,
) -> Result<CategoryCodeSets> {
    let (headers, rows) = read_csv_rows(path)?;
    require_header(path, &headers, category_column)?;
    require_header(path, &headers, codes_column)?;

    let mut categories = CategoryCodeSets::new();
    for row in &rows {
        let Some(name) = row.get(category_column).filter(|name| !name.is_empty()) else {
            continue;
        };
        let codes = row.get(codes_column).map(String::as_str).unwrap_or_default();
        categories.insert(name.clone(), canonical_code_set(codes.split(',')));
    }
    info!(
        path = %path.display(),
        categories = categories.len(),
        "loaded physical-comorbidity categories"
    );
    Ok(categories)
}

/// Loads every reference set a project names.
///
/// Mental-health codes come from the config itself. A reference table
/// that is not configured yields an empty set; one that is configured but
/// cannot be read is an error.
pub fn load_reference_sets(config: &ProjectConfig) -> Result<ReferenceSets> {
    let paths = &config.reference;
    let chronic = match &paths.chronic_conditions {
        Some(path) => load_chronic_codes(path, &paths.chronic_code_column)?,
        None => {
            warn!("no chronic-condition table configured; chronic counts will be zero");
            CodeSet::new()
        }
    };
    let physical_comorbidities = match &paths.physical_comorbidities {
        Some(path) => {
            load_physical_comorbidities(path, &paths.category_column, &paths.category_codes_column)?
        }
        None => {
            warn!("no physical-comorbidity table configured; no category columns will be derived");
            CategoryCodeSets::new()
        }
    };
    let mental_health = mental_health_code_set(&config.pipeline);
    if mental_health.is_empty() {
        warn!("no mental-health codes configured; HasMHD will be zero");
    }
    Ok(ReferenceSets {
        mental_health,
        chronic,
        physical_comorbidities,
    })
}
