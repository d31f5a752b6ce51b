//! Feature assembly with ordered step execution.
//!
//! Each step implements [`FeatureStep`] and adds or replaces columns on a
//! single evolving table. A step may read columns written by an earlier
//! step but never the other way round.
//!
//! # Standard Pipeline Order
//!
//! 1. **DropMissingCodesStep** - Remove rows with no diagnosis-code data
//! 2. **CleanCodesStep** - Canonicalize diagnosis codes into `Clean_ICD`
//! 3. **MentalHealthStep** - `HasMHD`
//! 4. **SexStep** - `Sex_Bin`
//! 5. **PatientStatusStep** - One-hot patient status
//! 6. **ChronicStep** - `Chronic_Diagnoses`, `Num_Chronic`
//! 7. **RisksStep** - `List_Risks`, `Num_Risks`
//! 8. **PhysicalComorbidityStep** - `PhysComorb`, `<category>_Bin`, `Num_PhysComorb`
//! 9. **AgeStep** - Age at death or at the reference year
//! 10. **MedicationStep** - `LongTermMeds_Num`, `ShortTermMeds_Num`
//! 11. **LabRiskStep** - `Lab_Statuses`, `Lab_Risk_Score`, `Lab_Risk_Proportion`

use mhrisk_common::{any_to_string, column_cells, format_numeric};
use mhrisk_model::{FeatureConfig, FeatureReport, LabOutcome, RawValue, ReferenceSets};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use crate::aggregate::{
    DurationBucket, LabRecords, build_lab_records, classify_all_labs, derive_age, list_risks,
    summarize_risk_proportion, summarize_risk_score,
};
use crate::codesets::{categorize_multi, is_in_any, overlap};
use crate::columns;
use crate::encoding::OneHotEncoder;
use crate::error::{Result, TransformError};
use crate::frame::{
    drop_column, has_column, require_columns, retain_rows, set_f64_column, set_i32_column,
    set_i32_list_column, set_i64_column, set_string_list_column,
};
use crate::labs::LabRegistry;
use crate::normalization::{normalize_diagnosis_codes, normalize_sex};

/// Read-only inputs shared by every step.
#[derive(Debug, Clone, Copy)]
pub struct FeatureContext<'a> {
    pub config: &'a FeatureConfig,
    pub reference: &'a ReferenceSets,
    pub registry: &'a LabRegistry,
}

/// Mutable state shared across pipeline steps.
#[derive(Debug, Default)]
pub struct PipelineState {
    pub report: FeatureReport,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A single derivation step in the feature pipeline.
pub trait FeatureStep: Send + Sync {
    /// Execute this step on the patient table (modified in place).
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &FeatureContext<'_>,
        state: &mut PipelineState,
    ) -> Result<()>;

    /// Name recorded in the run report once the step has run.
    fn step_name(&self) -> &str;
}

/// An ordered pipeline of feature steps.
pub struct FeaturePipeline {
    steps: Vec<Box<dyn FeatureStep>>,
}

impl Default for FeaturePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl FeaturePipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step to the end of the pipeline.
    pub fn add_step(mut self, step: Box<dyn FeatureStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Execute all steps in order with provided state.
    pub fn execute_with_state(
        &self,
        df: &mut DataFrame,
        ctx: &FeatureContext<'_>,
        state: &mut PipelineState,
    ) -> Result<()> {
        for step in &self.steps {
            step.execute(df, ctx, state)?;
            debug!(step = step.step_name(), rows = df.height(), columns = df.width(), "step done");
            state.report.executed_steps.push(step.step_name().to_string());
        }
        Ok(())
    }
}

/// A derived feature table and the counts collected while building it.
#[derive(Debug, Clone)]
pub struct FeatureOutput {
    pub frame: DataFrame,
    pub report: FeatureReport,
}

/// Derives the feature table with the standard lab registry.
pub fn derive_features(
    df: DataFrame,
    config: &FeatureConfig,
    reference: &ReferenceSets,
) -> Result<FeatureOutput> {
    derive_features_with_registry(df, config, reference, &LabRegistry::standard())
}

/// Derives the feature table.
///
/// Configuration and required input columns are checked before any
/// derivation starts. When `config.features` is non-empty the output is
/// reduced to exactly those columns, in that order.
pub fn derive_features_with_registry(
    mut df: DataFrame,
    config: &FeatureConfig,
    reference: &ReferenceSets,
    registry: &LabRegistry,
) -> Result<FeatureOutput> {
    let _span = info_span!("derive_features", rows = df.height()).entered();
    config.validate()?;
    require_columns(&df, config.columns.required())?;

    let ctx = FeatureContext {
        config,
        reference,
        registry,
    };
    let mut state = PipelineState::new();
    state.report.rows_in = df.height();
    build_default_pipeline().execute_with_state(&mut df, &ctx, &mut state)?;

    if !config.features.is_empty() {
        if let Some(missing) = config.features.iter().find(|name| !has_column(&df, name)) {
            return Err(TransformError::MissingFeature {
                column: missing.clone(),
            });
        }
        df = df.select(config.features.iter().map(String::as_str))?;
    }

    let mut report = state.report;
    report.rows_out = df.height();
    report.output_columns = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    info!(
        rows_in = report.rows_in,
        rows_out = report.rows_out,
        columns = report.output_columns.len(),
        "feature table derived"
    );
    Ok(FeatureOutput { frame: df, report })
}

/// Build the standard feature pipeline.
pub fn build_default_pipeline() -> FeaturePipeline {
    FeaturePipeline::new()
        .add_step(Box::new(DropMissingCodesStep))
        .add_step(Box::new(CleanCodesStep))
        .add_step(Box::new(MentalHealthStep))
        .add_step(Box::new(SexStep))
        .add_step(Box::new(PatientStatusStep))
        .add_step(Box::new(ChronicStep))
        .add_step(Box::new(RisksStep))
        .add_step(Box::new(PhysicalComorbidityStep))
        .add_step(Box::new(AgeStep))
        .add_step(Box::new(MedicationStep))
        .add_step(Box::new(LabRiskStep))
}

// ============================================================================
// Standard Feature Steps
// ============================================================================

/// Removes rows whose diagnosis-code cell is missing.
///
/// An empty list is data ("no diagnoses") and is kept.
pub struct DropMissingCodesStep;

impl FeatureStep for DropMissingCodesStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &FeatureContext<'_>,
        state: &mut PipelineState,
    ) -> Result<()> {
        let cells = column_cells(df, &ctx.config.columns.diagnosis_codes)?;
        let keep: Vec<bool> = cells.iter().map(|cell| !cell.is_missing()).collect();
        let dropped = keep.iter().filter(|kept| !**kept).count();
        if dropped > 0 {
            retain_rows(df, &keep)?;
        }
        state.report.rows_dropped_missing_codes = dropped;
        info!(dropped, remaining = df.height(), "dropped rows without diagnosis codes");
        Ok(())
    }

    fn step_name(&self) -> &str {
        "drop_missing_codes"
    }
}

/// Writes the canonical diagnosis-code list of every row.
pub struct CleanCodesStep;

impl FeatureStep for CleanCodesStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &FeatureContext<'_>,
        _state: &mut PipelineState,
    ) -> Result<()> {
        let cells = column_cells(df, &ctx.config.columns.diagnosis_codes)?;
        let cleaned = cells
            .iter()
            .map(|cell| normalize_diagnosis_codes(cell).unwrap_or_default())
            .collect();
        set_string_list_column(df, columns::CLEAN_ICD, cleaned)
    }

    fn step_name(&self) -> &str {
        "clean_codes"
    }
}

/// `HasMHD`: any canonical code in the mental-health set.
pub struct MentalHealthStep;

impl FeatureStep for MentalHealthStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &FeatureContext<'_>,
        _state: &mut PipelineState,
    ) -> Result<()> {
        let cells = column_cells(df, columns::CLEAN_ICD)?;
        let flags = cells
            .iter()
            .map(|cell| Some(is_in_any(cell, &ctx.reference.mental_health)))
            .collect();
        set_i32_column(df, columns::HAS_MHD, flags)
    }

    fn step_name(&self) -> &str {
        "mental_health"
    }
}

/// `Sex_Bin`: 0 male, 1 female, null otherwise.
pub struct SexStep;

impl FeatureStep for SexStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &FeatureContext<'_>,
        _state: &mut PipelineState,
    ) -> Result<()> {
        let cells = column_cells(df, &ctx.config.columns.sex)?;
        let values = cells.iter().map(normalize_sex).collect();
        set_i32_column(df, columns::SEX_BIN, values)
    }

    fn step_name(&self) -> &str {
        "sex"
    }
}

/// Replaces the patient-status column with one indicator column per category.
pub struct PatientStatusStep;

impl FeatureStep for PatientStatusStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &FeatureContext<'_>,
        _state: &mut PipelineState,
    ) -> Result<()> {
        let status_config = &ctx.config.patient_status;
        let source = &ctx.config.columns.patient_status;
        let values: Vec<Option<String>> = column_cells(df, source)?
            .iter()
            .map(status_text)
            .collect();
        let encoder = OneHotEncoder::for_status(status_config, values.iter().map(Option::as_deref));

        let mut indicators = vec![Vec::with_capacity(values.len()); encoder.width()];
        for value in &values {
            for (column, bit) in indicators.iter_mut().zip(encoder.encode(value.as_deref())) {
                column.push(Some(bit));
            }
        }

        drop_column(df, source)?;
        for (name, column) in encoder.column_names().iter().zip(indicators) {
            set_i32_column(df, name, column)?;
        }
        for name in &status_config.drop {
            drop_column(df, name)?;
        }
        debug!(categories = encoder.width(), "encoded patient status");
        Ok(())
    }

    fn step_name(&self) -> &str {
        "patient_status"
    }
}

/// `Chronic_Diagnoses` and `Num_Chronic`.
pub struct ChronicStep;

impl FeatureStep for ChronicStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &FeatureContext<'_>,
        _state: &mut PipelineState,
    ) -> Result<()> {
        let codes = clean_code_lists(df)?;
        let mut matched = Vec::with_capacity(codes.len());
        let mut counts = Vec::with_capacity(codes.len());
        for row in &codes {
            let (found, count) = overlap(row, &ctx.reference.chronic);
            matched.push(found);
            counts.push(Some(count as i64));
        }
        set_string_list_column(df, columns::CHRONIC_DIAGNOSES, matched)?;
        set_i64_column(df, columns::NUM_CHRONIC, counts)
    }

    fn step_name(&self) -> &str {
        "chronic"
    }
}

/// `List_Risks` and `Num_Risks`.
pub struct RisksStep;

impl FeatureStep for RisksStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &FeatureContext<'_>,
        _state: &mut PipelineState,
    ) -> Result<()> {
        let risks: Vec<Vec<String>> = column_cells(df, &ctx.config.columns.risks)?
            .iter()
            .map(list_risks)
            .collect();
        let counts = risks.iter().map(|row| Some(row.len() as i64)).collect();
        set_string_list_column(df, columns::LIST_RISKS, risks)?;
        set_i64_column(df, columns::NUM_RISKS, counts)
    }

    fn step_name(&self) -> &str {
        "risks"
    }
}

/// `PhysComorb`, one `<category>_Bin` per category, and `Num_PhysComorb`.
pub struct PhysicalComorbidityStep;

impl FeatureStep for PhysicalComorbidityStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &FeatureContext<'_>,
        state: &mut PipelineState,
    ) -> Result<()> {
        let categories = &ctx.reference.physical_comorbidities;
        let codes = clean_code_lists(df)?;
        let tagged: Vec<Vec<String>> = codes
            .iter()
            .map(|row| categorize_multi(row, categories))
            .collect();

        let flags: Vec<(String, Vec<Option<i32>>)> = categories
            .names()
            .map(|name| {
                let column = tagged
                    .iter()
                    .map(|row| Some(i32::from(row.iter().any(|tag| tag == name))))
                    .collect();
                (columns::comorbidity_flag(name), column)
            })
            .collect();
        let counts = tagged.iter().map(|row| Some(row.len() as i64)).collect();

        set_string_list_column(df, columns::PHYS_COMORB, tagged)?;
        for (name, column) in flags {
            set_i32_column(df, &name, column)?;
        }
        set_i64_column(df, columns::NUM_PHYS_COMORB, counts)?;
        state.report.comorbidity_categories = categories.len();
        Ok(())
    }

    fn step_name(&self) -> &str {
        "physical_comorbidity"
    }
}

/// Age at death, or at the configured reference year.
pub struct AgeStep;

impl FeatureStep for AgeStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &FeatureContext<'_>,
        _state: &mut PipelineState,
    ) -> Result<()> {
        let config = ctx.config;
        let births = column_cells(df, &config.columns.birth_year)?;
        let deaths = column_cells(df, &config.columns.deceased_year)?;
        let ages = births
            .iter()
            .zip(&deaths)
            .map(|(birth, death)| derive_age(birth, death, config.reference_year))
            .collect();
        set_i64_column(df, &config.age_column, ages)
    }

    fn step_name(&self) -> &str {
        "age"
    }
}

/// Long-term and short-term medication counts.
pub struct MedicationStep;

impl FeatureStep for MedicationStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &FeatureContext<'_>,
        _state: &mut PipelineState,
    ) -> Result<()> {
        let medication = &ctx.config.medication;
        let cells = column_cells(df, &ctx.config.columns.medication_durations)?;
        let count = |bucket: DurationBucket| -> Vec<Option<i64>> {
            cells
                .iter()
                .map(|cell| Some(bucket.count(cell, medication)))
                .collect()
        };
        let long_term = count(DurationBucket::LongTerm);
        let short_term = count(DurationBucket::ShortTerm);
        set_i64_column(df, columns::LONG_TERM_MEDS, long_term)?;
        set_i64_column(df, columns::SHORT_TERM_MEDS, short_term)
    }

    fn step_name(&self) -> &str {
        "medication"
    }
}

/// Lab classification and per-patient risk summaries.
///
/// Records are keyed by patient identifier and joined back onto every row
/// with that identifier.
pub struct LabRiskStep;

impl FeatureStep for LabRiskStep {
    fn execute(
        &self,
        df: &mut DataFrame,
        ctx: &FeatureContext<'_>,
        state: &mut PipelineState,
    ) -> Result<()> {
        let id_column = &ctx.config.columns.patient_id;
        let mut records = build_lab_records(df, &ctx.config.columns)?;
        classify_all_labs(&mut records, ctx.registry);
        record_lab_counts(&records, &mut state.report);

        let ids = df.column(id_column)?;
        let mut statuses = Vec::with_capacity(df.height());
        let mut scores = Vec::with_capacity(df.height());
        let mut proportions = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let id = any_to_string(ids.get(idx)?);
            let labs = records
                .get(&id)
                .map(|patient| patient.labs.as_slice())
                .unwrap_or_default();
            statuses.push(
                labs.iter()
                    .map(|lab| lab.status.and_then(|s| s.code()).map(i32::from))
                    .collect(),
            );
            scores.push(Some(summarize_risk_score(labs)));
            proportions.push(summarize_risk_proportion(labs));
        }

        set_i32_list_column(df, columns::LAB_STATUSES, statuses)?;
        set_i64_column(df, columns::LAB_RISK_SCORE, scores)?;
        set_f64_column(df, columns::LAB_RISK_PROPORTION, proportions)
    }

    fn step_name(&self) -> &str {
        "lab_risk"
    }
}

fn record_lab_counts(records: &LabRecords, report: &mut FeatureReport) {
    report.patients_with_labs = records.values().filter(|p| !p.labs.is_empty()).count();
    for lab in records.values().flat_map(|p| &p.labs) {
        report.lab_observations += 1;
        match lab.outcome() {
            LabOutcome::Evaluated(_) => report.evaluable_labs += 1,
            LabOutcome::Unevaluable(reason) => {
                *report
                    .unevaluable_labs
                    .entry(reason.as_str().to_string())
                    .or_default() += 1;
            }
        }
    }
    info!(
        patients = records.len(),
        patients_with_labs = report.patients_with_labs,
        observations = report.lab_observations,
        evaluable = report.evaluable_labs,
        unevaluable = report.unevaluable_total(),
        "classified labs"
    );
}

fn clean_code_lists(df: &DataFrame) -> Result<Vec<Vec<String>>> {
    Ok(column_cells(df, columns::CLEAN_ICD)?
        .iter()
        .map(|cell| {
            cell.as_list()
                .unwrap_or_default()
                .iter()
                .filter_map(RawValue::as_text)
                .map(str::to_string)
                .collect()
        })
        .collect())
}

fn status_text(cell: &RawValue) -> Option<String> {
    match cell {
        RawValue::Text(s) => Some(s.clone()),
        RawValue::Null => None,
        RawValue::Float(v) if v.is_nan() => None,
        RawValue::Int(v) => Some(v.to_string()),
        RawValue::Float(v) => Some(format_numeric(*v)),
        RawValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
