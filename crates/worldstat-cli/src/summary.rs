use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use worldstat_model::{ClassificationSource, FileOutcome, RunSummary};

use crate::types::RunResult;

pub fn print_summary(result: &RunResult) {
    let summary = &result.summary;
    println!("Input: {}", result.raw_dir.display());
    match (&summary.output, summary.written, result.dry_run) {
        (Some(path), true, _) => println!("Output: {} ({})", path.display(), summary.write_mode),
        (Some(path), false, true) => println!("Output: {} (dry run)", path.display()),
        (Some(path), false, false) => println!("Output: {} (exists, not written)", path.display()),
        (None, _, _) => println!("Output: none"),
    }
    println!("{}", file_table(summary));
    println!("{}", totals_table(summary));
    if summary.no_measure_detected() {
        eprintln!("warning: no measure detected in any input file; nothing was written");
    }
}

/// Per-file outcome table.
pub fn file_table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Status"),
        header_cell("Measure"),
        header_cell("Via"),
        header_cell("Rows"),
        header_cell("Detail"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    for report in &summary.files {
        let row = match &report.outcome {
            FileOutcome::Normalized {
                measure,
                source,
                rows,
            } => {
                let (via, detail) = match source {
                    ClassificationSource::Hint => ("file name", "-".to_string()),
                    ClassificationSource::Heuristic { mean_abs, sampled } => (
                        "magnitude",
                        match mean_abs {
                            Some(mean) => format!("mean |value| {mean:.0} over {sampled}"),
                            None => "no values sampled".to_string(),
                        },
                    ),
                };
                vec![
                    Cell::new(&report.file),
                    Cell::new("normalized").fg(Color::Green),
                    Cell::new(measure),
                    Cell::new(via),
                    Cell::new(rows),
                    dim_cell(detail),
                ]
            }
            FileOutcome::Skipped { reason } => vec![
                Cell::new(&report.file),
                Cell::new("skipped")
                    .fg(Color::Yellow)
                    .add_attribute(Attribute::Bold),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                Cell::new(reason),
            ],
        };
        table.add_row(row);
    }
    table
}

/// Row counts of the measure tables and the merged result.
pub fn totals_table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("population"), count_cell(summary.population_rows)]);
    table.add_row(vec![Cell::new("gdp"), count_cell(summary.gdp_rows)]);
    table.add_row(vec![
        Cell::new("merged")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(summary.merged_rows).add_attribute(Attribute::Bold),
    ]);
    table
}

/// Writes the run summary as pretty JSON.
pub fn write_summary_json(summary: &RunSummary, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)
        .with_context(|| format!("write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: Option<usize>) -> Cell {
    match count {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
