//! Patient and feature table I/O.
//!
//! The patient table carries list-valued columns and is read from Parquet.
//! Feature tables are written as Parquet, or as CSV when the output path
//! ends in `.csv`; CSV cannot hold lists, so list cells are joined with
//! `;` on the way out.

use std::fs::File;
use std::path::Path;

use mhrisk_common::any_to_string;
use polars::prelude::{
    AnyValue, CsvWriter, DataFrame, DataType, NamedFrom, ParquetReader, ParquetWriter, SerReader,
    SerWriter, Series,
};
use tracing::info;

use crate::error::{IngestError, Result};

/// Separator for list cells in CSV output.
pub const CSV_LIST_SEPARATOR: &str = ";";

/// On-disk table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Parquet,
    Csv,
}

impl TableFormat {
    /// Format implied by the file extension, ignoring case.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("parquet" | "pq") => Ok(Self::Parquet),
            Some("csv") => Ok(Self::Csv),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Reads the raw patient table from a Parquet file.
pub fn read_patient_table(path: &Path) -> Result<DataFrame> {
    if TableFormat::from_path(path)? != TableFormat::Parquet {
        return Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let df = ParquetReader::new(file).finish()?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read patient table"
    );
    Ok(df)
}

/// Writes a feature table, choosing the format from the extension.
///
/// Parent directories are created as needed.
pub fn write_feature_table(df: &mut DataFrame, path: &Path) -> Result<TableFormat> {
    let format = TableFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| IngestError::io(parent, e))?;
    }
    let mut file = File::create(path).map_err(|e| IngestError::io(path, e))?;
    match format {
        TableFormat::Parquet => {
            ParquetWriter::new(&mut file).finish(df)?;
        }
        TableFormat::Csv => {
            let mut flat = flatten_list_columns(df)?;
            CsvWriter::new(&mut file).include_header(true).finish(&mut flat)?;
        }
    }
    info!(path = %path.display(), rows = df.height(), ?format, "wrote feature table");
    Ok(format)
}

/// Replaces every list column with a string column of joined items.
///
/// Null lists stay null; null items render as empty strings.
pub fn flatten_list_columns(df: &DataFrame) -> Result<DataFrame> {
    let mut flat = df.clone();
    for column in df.get_columns() {
        if !matches!(column.dtype(), DataType::List(_)) {
            continue;
        }
        let mut joined = Vec::with_capacity(column.len());
        for idx in 0..column.len() {
            let cell = match column.get(idx)? {
                AnyValue::List(items) => Some(
                    (0..items.len())
                        .map(|i| items.get(i).map(any_to_string).unwrap_or_default())
                        .collect::<Vec<_>>()
                        .join(CSV_LIST_SEPARATOR),
                ),
                _ => None,
            };
            joined.push(cell);
        }
        flat.with_column(Series::new(column.name().clone(), joined))?;
    }
    Ok(flat)
}
