//! Feature-derivation configuration.
//!
//! The configuration is an explicit value handed to the pipeline entry point.
//! Every field has a default matching the reference dataset layout, so a
//! config file only needs to name what differs.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Input column names of the raw patient table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub patient_id: String,
    pub sex: String,
    pub birth_year: String,
    pub deceased_year: String,
    pub diagnosis_codes: String,
    pub medication_durations: String,
    pub lab_tests: String,
    pub lab_dates: String,
    pub lab_results: String,
    pub lab_units: String,
    pub patient_status: String,
    pub risks: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            patient_id: "Patient_ID".to_string(),
            sex: "Sex".to_string(),
            birth_year: "BirthYear".to_string(),
            deceased_year: "DeceasedYear".to_string(),
            diagnosis_codes: "ICD-9".to_string(),
            medication_durations: "Med_Durations".to_string(),
            lab_tests: "LabTests".to_string(),
            lab_dates: "Lab_Performed_Dates".to_string(),
            lab_results: "Lab_Test_Results".to_string(),
            lab_units: "Lab_UnitOfMeasure".to_string(),
            patient_status: "PatientStatus_calc".to_string(),
            risks: "Risks".to_string(),
        }
    }
}

impl ColumnNames {
    /// Every column the pipeline requires, in a fixed order.
    pub fn required(&self) -> [&str; 12] {
        [
            self.patient_id.as_str(),
            self.sex.as_str(),
            self.birth_year.as_str(),
            self.deceased_year.as_str(),
            self.diagnosis_codes.as_str(),
            self.medication_durations.as_str(),
            self.lab_tests.as_str(),
            self.lab_dates.as_str(),
            self.lab_results.as_str(),
            self.lab_units.as_str(),
            self.patient_status.as_str(),
            self.risks.as_str(),
        ]
    }
}

/// One-hot encoding of the patient-status column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientStatusConfig {
    /// Column prefix; columns are named `<prefix>_<category>`.
    pub prefix: String,
    /// Known categories, in output column order.
    pub categories: Vec<String>,
    /// Bucket for missing and unlisted values.
    pub unknown_label: String,
    /// Dummy columns removed after encoding.
    pub drop: Vec<String>,
}

impl Default for PatientStatusConfig {
    fn default() -> Self {
        Self {
            prefix: "Status".to_string(),
            categories: Vec::new(),
            unknown_label: "Unknown".to_string(),
            drop: vec!["Status_External".to_string(), "Status_Duplicate".to_string()],
        }
    }
}

/// Duration thresholds, in days, for medication bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicationConfig {
    /// Durations strictly above this count as long-term.
    pub long_term_min_days: f64,
    /// Durations at or below this count as short-term.
    pub short_term_max_days: f64,
}

impl Default for MedicationConfig {
    fn default() -> Self {
        Self {
            long_term_min_days: 30.0,
            short_term_max_days: 7.0,
        }
    }
}

/// Everything the feature pipeline needs besides the table and reference sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Year used for age when the patient is not deceased.
    pub reference_year: i64,
    /// Name of the derived age column.
    pub age_column: String,
    /// Final output columns, in order. Empty keeps every column.
    pub features: Vec<String>,
    /// Mental-health code groups, flattened into a single code list in
    /// group-name order.
    pub mental_health_groups: BTreeMap<String, Vec<String>>,
    pub patient_status: PatientStatusConfig,
    pub medication: MedicationConfig,
    pub columns: ColumnNames,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            reference_year: 2015,
            age_column: "Age_2015".to_string(),
            features: Vec::new(),
            mental_health_groups: BTreeMap::new(),
            patient_status: PatientStatusConfig::default(),
            medication: MedicationConfig::default(),
            columns: ColumnNames::default(),
        }
    }
}

impl FeatureConfig {
    /// All mental-health codes, group by group in group-name order.
    pub fn mental_health_codes(&self) -> impl Iterator<Item = &str> {
        self.mental_health_groups
            .values()
            .flat_map(|codes| codes.iter().map(String::as_str))
    }

    /// Check the configuration for values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.reference_year <= 0 {
            return Err(ModelError::InvalidConfig(format!(
                "reference_year must be positive, got {}",
                self.reference_year
            )));
        }
        if self.age_column.trim().is_empty() {
            return Err(ModelError::InvalidConfig(
                "age_column must not be empty".to_string(),
            ));
        }
        if self.features.iter().any(|name| name.trim().is_empty()) {
            return Err(ModelError::InvalidConfig(
                "feature names must not be empty".to_string(),
            ));
        }
        let medication = self.medication;
        if !medication.long_term_min_days.is_finite() || !medication.short_term_max_days.is_finite()
        {
            return Err(ModelError::InvalidConfig(
                "medication thresholds must be finite".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        for category in &self.patient_status.categories {
            if category.trim().is_empty() {
                return Err(ModelError::InvalidConfig(
                    "patient status categories must not be empty".to_string(),
                ));
            }
            if !seen.insert(category.as_str()) {
                return Err(ModelError::DuplicateStatusCategory(category.clone()));
            }
        }
        Ok(())
    }
}
