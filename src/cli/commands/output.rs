//! Result printing shared by the query commands.

use crate::models::aggregate::AggregatedResult;
use crate::models::config::OutputFormat;
use crate::models::record::Measure;
use anyhow::Result;
use colored::Colorize;

/// Widest a key column is allowed to get in table output.
const MAX_COLUMN_WIDTH: usize = 32;

/// Format a value for display.
pub fn format_value(value: f64, measure: Measure, decimals: u32) -> String {
    if measure.is_integer() {
        format!("{:.0}", value)
    } else {
        format!("{:.*}", decimals as usize, value)
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width - 3).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Print an aggregated result in the requested format.
pub fn print_result(result: &AggregatedResult, format: OutputFormat, decimals: u32) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(result),
        OutputFormat::Simple => {
            print_simple(result, decimals);
            Ok(())
        }
        OutputFormat::Table => {
            print_table(result, decimals);
            Ok(())
        }
    }
}

/// Print result as JSON.
fn print_json(result: &AggregatedResult) -> Result<()> {
    let output = serde_json::json!({
        "group_by": result.group_by,
        "measure": result.measure,
        "rows": result.to_json_rows()?,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print result one row per line.
fn print_simple(result: &AggregatedResult, decimals: u32) {
    for row in &result.rows {
        let key = row
            .key
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" | ");
        let value = format_value(row.value, result.measure, decimals);
        if key.is_empty() {
            println!("{}", value);
        } else {
            println!("{} = {}", key, value);
        }
    }
}

/// Print result as table.
fn print_table(result: &AggregatedResult, decimals: u32) {
    if result.is_empty() {
        println!("{}", "No rows match the filters.".yellow());
        return;
    }

    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| {
            row.key
                .iter()
                .map(|v| truncate(&v.to_string(), MAX_COLUMN_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = result
        .group_by
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.as_str().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut header: Vec<String> = result
        .group_by
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", column.as_str(), width = *width))
        .collect();
    header.push(format!("{:>14}", result.measure.label()));
    println!("{}", header.join(" | ").bold());
    println!("{}", "-".repeat(header.join(" | ").chars().count()));

    for (row, key_cells) in result.rows.iter().zip(&cells) {
        let mut line: Vec<String> = key_cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        line.push(format!(
            "{:>14}",
            format_value(row.value, result.measure, decimals)
        ));
        println!("{}", line.join(" | "));
    }

    println!();
    println!(
        "{}",
        format!(
            "{} rows, total {}",
            result.len(),
            format_value(result.total(), result.measure, decimals)
        )
        .cyan()
    );
}
