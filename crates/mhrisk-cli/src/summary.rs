use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use mhrisk_cli::run::RunResult;

pub fn print_summary(result: &RunResult) {
    let report = &result.report;
    println!("Input: {}", result.input.display());
    println!("Output: {} ({:?})", result.output.display(), result.format);
    if let Some(path) = &result.report_path {
        println!("Run report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Rows in"), Cell::new(report.rows_in)]);
    table.add_row(vec![
        Cell::new("Dropped (no diagnosis codes)"),
        count_cell(report.rows_dropped_missing_codes, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Rows out").add_attribute(Attribute::Bold),
        Cell::new(report.rows_out).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Patients with labs"),
        Cell::new(report.patients_with_labs),
    ]);
    table.add_row(vec![
        Cell::new("Lab observations"),
        Cell::new(report.lab_observations),
    ]);
    table.add_row(vec![
        Cell::new("Evaluable labs"),
        Cell::new(report.evaluable_labs).fg(Color::Green),
    ]);
    for (reason, count) in &report.unevaluable_labs {
        table.add_row(vec![
            Cell::new(format!("  -> {reason}")).fg(Color::DarkGrey),
            count_cell(*count, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("Comorbidity categories"),
        Cell::new(report.comorbidity_categories),
    ]);
    table.add_row(vec![
        Cell::new("Output columns"),
        Cell::new(report.output_columns.len()),
    ]);
    println!("{table}");
    println!("Finished in {:.2}s", result.elapsed.as_secs_f64());
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
