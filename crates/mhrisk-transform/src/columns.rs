//! Names of the derived feature columns.

pub const CLEAN_ICD: &str = "Clean_ICD";
pub const HAS_MHD: &str = "HasMHD";
pub const SEX_BIN: &str = "Sex_Bin";
pub const CHRONIC_DIAGNOSES: &str = "Chronic_Diagnoses";
pub const NUM_CHRONIC: &str = "Num_Chronic";
pub const LIST_RISKS: &str = "List_Risks";
pub const NUM_RISKS: &str = "Num_Risks";
pub const PHYS_COMORB: &str = "PhysComorb";
pub const NUM_PHYS_COMORB: &str = "Num_PhysComorb";
pub const LONG_TERM_MEDS: &str = "LongTermMeds_Num";
pub const SHORT_TERM_MEDS: &str = "ShortTermMeds_Num";
pub const LAB_STATUSES: &str = "Lab_Statuses";
pub const LAB_RISK_SCORE: &str = "Lab_Risk_Score";
pub const LAB_RISK_PROPORTION: &str = "Lab_Risk_Proportion";

/// Binary column for one physical-comorbidity category.
pub fn comorbidity_flag(category: &str) -> String {
    format!("{category}_Bin")
}
