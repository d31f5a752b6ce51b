//! Loosely typed cell values as they arrive from the patient table.

use chrono::NaiveDate;

/// A single cell of the raw patient table.
///
/// Columns in the source data are not reliably typed: a lab result may be
/// a float in one row and `">90"` in the next, a code list may be missing
/// or a bare scalar. `RawValue` keeps that ambiguity explicit so the
/// normalizers can decide per value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    List(Vec<RawValue>),
}

impl RawValue {
    /// Returns true for `Null` and for floating-point NaN.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Returns the list items, or `None` if this value is not a list.
    pub fn as_list(&self) -> Option<&[RawValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the text content, or `None` for non-text values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a number for integer and float variants.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_counts_as_missing() {
        assert!(RawValue::Null.is_missing());
        assert!(RawValue::Float(f64::NAN).is_missing());
        assert!(!RawValue::Float(0.0).is_missing());
        assert!(!RawValue::Text(String::new()).is_missing());
    }

    #[test]
    fn conversions_build_nested_lists() {
        let value = RawValue::from(vec![Some(10.0), None, Some(5.0)]);
        assert_eq!(
            value,
            RawValue::List(vec![
                RawValue::Float(10.0),
                RawValue::Null,
                RawValue::Float(5.0),
            ])
        );
        assert!(value.as_list().is_some());
        assert!(RawValue::from("x").as_list().is_none());
    }
}
