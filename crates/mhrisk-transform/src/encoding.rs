//! One-hot encoding with a fixed category list.

use std::collections::BTreeSet;

use mhrisk_model::PatientStatusConfig;

/// Encodes a categorical value as a fixed-width indicator vector.
///
/// Positions follow the configured categories, followed by the unknown
/// bucket. Missing and unlisted values land in the unknown bucket. If the
/// unknown label is itself a listed category, that category doubles as the
/// bucket and no extra position is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneHotEncoder {
    prefix: String,
    categories: Vec<String>,
    unknown_index: usize,
}

impl OneHotEncoder {
    pub fn new(prefix: impl Into<String>, categories: Vec<String>, unknown_label: &str) -> Self {
        let mut categories = categories;
        let unknown_index = match categories.iter().position(|c| c == unknown_label) {
            Some(idx) => idx,
            None => {
                categories.push(unknown_label.to_string());
                categories.len() - 1
            }
        };
        Self {
            prefix: prefix.into(),
            categories,
            unknown_index,
        }
    }

    /// Encoder for the patient-status column.
    ///
    /// Uses the configured categories. When none are configured, the
    /// distinct observed values are used in sorted order.
    pub fn for_status<'a>(
        config: &PatientStatusConfig,
        observed: impl IntoIterator<Item = Option<&'a str>>,
    ) -> Self {
        let categories = if config.categories.is_empty() {
            observed
                .into_iter()
                .flatten()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect()
        } else {
            config.categories.clone()
        };
        Self::new(config.prefix.clone(), categories, &config.unknown_label)
    }

    /// Category labels, unknown bucket included, in output order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// Output column names, `<prefix>_<category>`.
    pub fn column_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|category| format!("{}_{category}", self.prefix))
            .collect()
    }

    /// Position of the indicator set for `value`.
    pub fn index_of(&self, value: Option<&str>) -> usize {
        value
            .map(str::trim)
            .and_then(|value| self.categories.iter().position(|c| c == value))
            .unwrap_or(self.unknown_index)
    }

    /// Indicator vector of length [`width`](Self::width) with exactly one `1`.
    pub fn encode(&self, value: Option<&str>) -> Vec<i32> {
        let hot = self.index_of(value);
        (0..self.width()).map(|idx| i32::from(idx == hot)).collect()
    }
}
