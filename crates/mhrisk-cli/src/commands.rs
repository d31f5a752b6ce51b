use anyhow::Result;
use comfy_table::{Cell, Table};

use mhrisk_cli::run::{RunOptions, RunResult};
use mhrisk_transform::LabRegistry;

use crate::cli::RunArgs;
use crate::summary::{apply_table_style, header_cell};

pub fn run_features(args: &RunArgs) -> Result<RunResult> {
    let options = RunOptions {
        config: args.config.clone(),
        input: args.input.clone(),
        output: args.output.clone(),
        report: args.report.clone(),
    };
    mhrisk_cli::run::run_features(&options)
}

pub fn run_labs() {
    let registry = LabRegistry::standard();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Test"),
        header_cell("Sex"),
        header_cell("Thresholds"),
    ]);
    apply_table_style(&mut table);
    for rule in registry.rules() {
        let sex = if rule.requires_sex() { "required" } else { "-" };
        table.add_row(vec![
            Cell::new(rule.name()),
            Cell::new(sex),
            Cell::new(rule.describe()),
        ]);
    }
    println!("{table}");
}
