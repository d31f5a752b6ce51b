//! DataFrame column helpers used by the pipeline steps.

use polars::prelude::{BooleanChunked, DataFrame, NamedFrom, NewChunkedArray, Series};

use crate::error::{Result, TransformError};

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Fails with the first name in `names` that `df` does not have.
pub fn require_columns<'a>(df: &DataFrame, names: impl IntoIterator<Item = &'a str>) -> Result<()> {
    for name in names {
        if !has_column(df, name) {
            return Err(TransformError::MissingColumn {
                column: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Keeps the rows whose flag is `true`.
pub fn retain_rows(df: &mut DataFrame, keep: &[bool]) -> Result<()> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    *df = df.filter(&mask)?;
    Ok(())
}

pub fn set_i32_column(df: &mut DataFrame, name: &str, values: Vec<Option<i32>>) -> Result<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

pub fn set_i64_column(df: &mut DataFrame, name: &str, values: Vec<Option<i64>>) -> Result<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

pub fn set_f64_column(df: &mut DataFrame, name: &str, values: Vec<Option<f64>>) -> Result<()> {
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

/// Writes a `List(String)` column, one list per row.
pub fn set_string_list_column(df: &mut DataFrame, name: &str, rows: Vec<Vec<String>>) -> Result<()> {
    let rows: Vec<Series> = rows
        .into_iter()
        .map(|row| Series::new("".into(), row))
        .collect();
    df.with_column(Series::new(name.into(), rows))?;
    Ok(())
}

/// Writes a `List(Int32)` column, one list per row.
pub fn set_i32_list_column(
    df: &mut DataFrame,
    name: &str,
    rows: Vec<Vec<Option<i32>>>,
) -> Result<()> {
    let rows: Vec<Series> = rows
        .into_iter()
        .map(|row| Series::new("".into(), row))
        .collect();
    df.with_column(Series::new(name.into(), rows))?;
    Ok(())
}

/// Removes a column if present.
pub fn drop_column(df: &mut DataFrame, name: &str) -> Result<()> {
    if has_column(df, name) {
        df.drop_in_place(name)?;
    }
    Ok(())
}
