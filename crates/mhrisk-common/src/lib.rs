//! Shared utilities for the mhrisk crates.
//!
//! This crate provides common utilities used across the workspace,
//! mainly Polars `AnyValue` helpers that turn loosely typed cells into
//! [`RawValue`](mhrisk_model::RawValue)s and numbers into canonical strings.

pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use self::polars::{
    any_to_raw, any_to_string, column_cells, format_numeric, parse_f64, series_to_raw,
};
