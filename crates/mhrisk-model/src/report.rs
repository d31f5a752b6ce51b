use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Counts collected while deriving the feature table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureReport {
    pub rows_in: usize,
    /// Rows removed because they had no diagnosis-code data.
    pub rows_dropped_missing_codes: usize,
    pub rows_out: usize,
    /// Patients with at least one lab observation.
    pub patients_with_labs: usize,
    pub lab_observations: usize,
    pub evaluable_labs: usize,
    /// Unevaluable observations keyed by reason.
    pub unevaluable_labs: BTreeMap<String, usize>,
    pub comorbidity_categories: usize,
    pub output_columns: Vec<String>,
    /// Pipeline steps in the order they ran.
    pub executed_steps: Vec<String>,
}

impl FeatureReport {
    pub fn unevaluable_total(&self) -> usize {
        self.unevaluable_labs.values().sum()
    }
}
