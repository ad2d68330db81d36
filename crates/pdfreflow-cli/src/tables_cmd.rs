use std::path::Path;

use pdfreflow::{LogicalTable, ReflowOptions, table_label};

use crate::cli::OutputFormat;
use crate::shared::{csv_escape, run_document, to_json};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &OutputFormat,
    options: &ReflowOptions,
) -> Result<(), i32> {
    let result = run_document(file, pages, options)?;

    match format {
        OutputFormat::Text => {
            write_grid(&result.tables);
            Ok(())
        }
        OutputFormat::Json => {
            let out = serde_json::json!({
                "tables": result.tables,
                "summaries": result.table_summaries(),
            });
            println!("{}", to_json(&out, false)?);
            Ok(())
        }
        OutputFormat::Csv => {
            write_csv(&result.tables);
            Ok(())
        }
    }
}

fn table_strings(table: &LogicalTable) -> Vec<Vec<String>> {
    std::iter::once(table.header.clone())
        .chain(
            table
                .rows
                .iter()
                .map(|row| row.iter().map(ToString::to_string).collect()),
        )
        .collect()
}

fn write_grid(tables: &[LogicalTable]) {
    if tables.is_empty() {
        println!("No tables found.");
        return;
    }

    for (i, table) in tables.iter().enumerate() {
        let pages: Vec<String> = table.origin_pages.iter().map(ToString::to_string).collect();
        let modes: Vec<&str> = table.modes().iter().map(|m| m.as_str()).collect();
        println!(
            "--- {} (pages {}, modes {}) ---",
            table_label(i),
            pages.join(","),
            modes.join(",")
        );

        let rows = table_strings(table);
        let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut col_widths = vec![1usize; col_count];
        for row in &rows {
            for (ci, text) in row.iter().enumerate() {
                col_widths[ci] = col_widths[ci].max(text.chars().count());
            }
        }

        for row in &rows {
            let cells: Vec<String> = (0..col_count)
                .map(|ci| {
                    let text = row.get(ci).map(String::as_str).unwrap_or("");
                    format!("{:<width$}", text, width = col_widths[ci])
                })
                .collect();
            println!("| {} |", cells.join(" | "));
        }
        println!();
    }
}

fn write_csv(tables: &[LogicalTable]) {
    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("# {}", table_label(i));
        for row in table_strings(table) {
            let escaped: Vec<String> = row.iter().map(|c| csv_escape(c)).collect();
            println!("{}", escaped.join(","));
        }
    }
}
