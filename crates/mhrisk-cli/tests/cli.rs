//! Run orchestration against on-disk fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use mhrisk_cli::run::{RunOptions, run_features};
use mhrisk_ingest::{TableFormat, read_patient_table, write_feature_table};
use mhrisk_model::FeatureReport;
use mhrisk_transform::LabRegistry;
use polars::prelude::{
    Column, DataFrame, IntoColumn, IntoSeries, ListChunked, NamedFrom, Series,
};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn list_column(name: &str, rows: Vec<Option<Vec<&str>>>) -> Column {
    let lists: ListChunked = rows
        .into_iter()
        .map(|row| row.map(|items| Series::new("".into(), items)))
        .collect();
    lists.with_name(name.into()).into_series().into_column()
}

fn durations_column(name: &str, rows: Vec<Option<Vec<f64>>>) -> Column {
    let lists: ListChunked = rows
        .into_iter()
        .map(|row| row.map(|items| Series::new("".into(), items)))
        .collect();
    lists.with_name(name.into()).into_series().into_column()
}

fn patients() -> DataFrame {
    DataFrame::new(vec![
        Series::new("Patient_ID".into(), &["P1", "P2", "P3"]).into_column(),
        Series::new("Sex".into(), &["Female", "Male", "Male"]).into_column(),
        Series::new("BirthYear".into(), &[1950_i64, 1960, 1970]).into_column(),
        Series::new("DeceasedYear".into(), &[None, Some(2012_i64), None]).into_column(),
        list_column(
            "ICD-9",
            vec![Some(vec!["250.00", "296.20"]), Some(vec!["401.9"]), None],
        ),
        durations_column("Med_Durations", vec![Some(vec![40.0, 3.0]), None, Some(vec![])]),
        list_column("LabTests", vec![Some(vec!["HDL"]), Some(vec!["LDL"]), None]),
        list_column(
            "Lab_Performed_Dates",
            vec![Some(vec!["2014-03-01"]), Some(vec!["2011-07-15"]), None],
        ),
        list_column("Lab_Test_Results", vec![Some(vec!["1.2"]), Some(vec!["<1.5"]), None]),
        list_column(
            "Lab_UnitOfMeasure",
            vec![Some(vec!["mmol/L"]), Some(vec!["mmol/L"]), None],
        ),
        Series::new(
            "PatientStatus_calc".into(),
            &[Some("Active"), Some("Inactive"), None],
        )
        .into_column(),
        list_column("Risks", vec![Some(vec!["Smoker"]), None, None]),
    ])
    .unwrap()
}

/// A project directory with reference tables, a patient table and a config.
fn project(data_section: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "chronic.csv", "Code\n250.00\n493\n");
    write(dir.path(), "physcomorb.csv", "PhysComorb,ICD-9\nDiabetes,\"250, 250.01\"\n");
    let mut table = patients();
    write_feature_table(&mut table, &dir.path().join("patients.parquet")).unwrap();
    let config = format!(
        r#"
{data_section}

[reference]
chronic_conditions = "chronic.csv"
physical_comorbidities = "physcomorb.csv"

[mental_health_groups]
depression = ["296.2", "311"]

[patient_status]
categories = ["Active", "Inactive", "External"]
"#
    );
    let config_path = write(dir.path(), "project.toml", &config);
    (dir, config_path)
}

#[test]
fn run_writes_feature_table_and_report() {
    let (dir, config) = project(
        "[data]\ninput = \"patients.parquet\"\noutput = \"out/features.parquet\"",
    );
    let report_path = dir.path().join("out").join("report.json");
    let options = RunOptions {
        config,
        report: Some(report_path.clone()),
        ..RunOptions::default()
    };

    let result = run_features(&options).unwrap();
    assert_eq!(result.format, TableFormat::Parquet);
    assert_eq!(result.output, dir.path().join("out/features.parquet"));
    assert_eq!(result.report.rows_in, 3);
    assert_eq!(result.report.rows_dropped_missing_codes, 1);
    assert_eq!(result.report.rows_out, 2);
    assert_eq!(result.report.patients_with_labs, 2);
    assert_eq!(result.report.evaluable_labs, 2);
    assert_eq!(result.report.comorbidity_categories, 1);

    insta::assert_snapshot!(result.report.output_columns.join("\n"), @r"
    Patient_ID
    Sex
    BirthYear
    DeceasedYear
    ICD-9
    Med_Durations
    LabTests
    Lab_Performed_Dates
    Lab_Test_Results
    Lab_UnitOfMeasure
    Risks
    Clean_ICD
    HasMHD
    Sex_Bin
    Status_Active
    Status_Inactive
    Status_Unknown
    Chronic_Diagnoses
    Num_Chronic
    List_Risks
    Num_Risks
    PhysComorb
    Diabetes_Bin
    Num_PhysComorb
    Age_2015
    LongTermMeds_Num
    ShortTermMeds_Num
    Lab_Statuses
    Lab_Risk_Score
    Lab_Risk_Proportion
    ");

    let written = read_patient_table(&result.output).unwrap();
    assert_eq!(written.height(), 2);

    let json = fs::read_to_string(&report_path).unwrap();
    let report: FeatureReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report, result.report);
}

#[test]
fn command_line_paths_override_config() {
    let (dir, config) = project("[data]\noutput = \"ignored.parquet\"");
    let output = dir.path().join("features.csv");
    let options = RunOptions {
        config,
        input: Some(dir.path().join("patients.parquet")),
        output: Some(output.clone()),
        report: None,
    };

    let result = run_features(&options).unwrap();
    assert_eq!(result.format, TableFormat::Csv);
    assert!(!dir.path().join("ignored.parquet").exists());

    let text = fs::read_to_string(&output).unwrap();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("Patient_ID,Sex,"));
    assert_eq!(lines.count(), 2);
}

#[test]
fn selected_features_define_the_output() {
    let (dir, config_path) = project(
        "features = [\"Patient_ID\", \"HasMHD\", \"Lab_Risk_Score\"]\n\n[data]\ninput = \"patients.parquet\"\noutput = \"features.parquet\"",
    );
    let result = run_features(&RunOptions {
        config: config_path,
        ..RunOptions::default()
    })
    .unwrap();

    assert_eq!(
        result.report.output_columns,
        vec!["Patient_ID", "HasMHD", "Lab_Risk_Score"]
    );
    let written = read_patient_table(&dir.path().join("features.parquet")).unwrap();
    assert_eq!(written.width(), 3);
}

#[test]
fn missing_output_path_fails_before_reading() {
    let (_dir, config) = project("[data]\ninput = \"patients.parquet\"");
    let err = run_features(&RunOptions {
        config,
        ..RunOptions::default()
    })
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "no output path given in config or on the command line"
    );
}

#[test]
fn missing_config_names_the_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("absent.toml");
    let err = run_features(&RunOptions {
        config: config.clone(),
        ..RunOptions::default()
    })
    .unwrap_err();

    assert_eq!(err.to_string(), format!("load config {}", config.display()));
}

#[test]
fn standard_lab_rules_listing() {
    let listing: Vec<String> = LabRegistry::standard()
        .rules()
        .map(|rule| format!("{}: {}", rule.name(), rule.describe()))
        .collect();

    insta::assert_snapshot!(listing.join("\n"), @r"
    FASTING GLUCOSE: normal <= 6.1; borderline (6.1, 7); otherwise abnormal
    GFR: normal >= 90; borderline [60, 90); otherwise abnormal
    GLUCOSE TOLERANCE: normal < 7.8; borderline [7.8, 11.1); otherwise abnormal
    HBA1C: normal < 6; borderline [6, 6.5); otherwise abnormal
    HDL: normal >= 1 (male) / >= 1.3 (female); otherwise abnormal
    INR: normal <= 1.1; borderline [2, 3]; otherwise abnormal
    LDL: normal < 2; borderline [2, 3.5); otherwise abnormal
    MICROALBUMIN: normal < 30; borderline [30, 300]; otherwise abnormal
    TOTAL CHOLESTEROL: normal < 5.2; borderline [5.2, 6.2); otherwise abnormal
    TRIGLYCERIDES: normal < 1.7; borderline [1.7, 2.3); otherwise abnormal
    URINE ALBUMIN CREATININE RATIO: normal < 3; borderline [3, 30]; otherwise abnormal
    ");
}
