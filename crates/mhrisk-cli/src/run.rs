//! One feature-derivation run: config, reference data, table in, table out.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use mhrisk_ingest::{
    IngestError, TableFormat, load_project_config, load_reference_sets, read_patient_table,
    write_feature_table,
};
use mhrisk_model::FeatureReport;
use mhrisk_transform::{FeatureOutput, derive_features};

/// What to run. Paths given here take precedence over the config's `[data]`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: PathBuf,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    /// Where to write the JSON run report, if anywhere.
    pub report: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: TableFormat,
    pub report: FeatureReport,
    pub report_path: Option<PathBuf>,
    pub elapsed: Duration,
}

pub fn run_features(options: &RunOptions) -> Result<RunResult> {
    let span = info_span!("run", config = %options.config.display());
    let _guard = span.enter();
    let started = Instant::now();

    let config = load_project_config(&options.config)
        .with_context(|| format!("load config {}", options.config.display()))?;
    let input = options
        .input
        .clone()
        .or_else(|| config.data.input.clone())
        .ok_or(IngestError::MissingPath { what: "input" })?;
    let output = options
        .output
        .clone()
        .or_else(|| config.data.output.clone())
        .ok_or(IngestError::MissingPath { what: "output" })?;
    // Fail on an unusable output path before doing any work.
    TableFormat::from_path(&output)?;

    let reference = load_reference_sets(&config).context("load reference tables")?;
    let patients = read_patient_table(&input)
        .with_context(|| format!("read patient table {}", input.display()))?;
    let FeatureOutput { mut frame, report } =
        derive_features(patients, &config.pipeline, &reference).context("derive features")?;
    let format = write_feature_table(&mut frame, &output)
        .with_context(|| format!("write feature table {}", output.display()))?;

    if let Some(path) = &options.report {
        write_report(&report, path)?;
    }

    let elapsed = started.elapsed();
    info!(
        rows = report.rows_out,
        columns = report.output_columns.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "run complete"
    );
    Ok(RunResult {
        input,
        output,
        format,
        report,
        report_path: options.report.clone(),
        elapsed,
    })
}

/// Writes the run report as pretty-printed JSON.
pub fn write_report(report: &FeatureReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create report directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report).context("serialize run report")?;
    fs::write(path, json).with_context(|| format!("write run report {}", path.display()))?;
    Ok(())
}
