//! Options command implementation.
//!
//! Lists filter choices: distinct column values and the date span.

use crate::core::Dataset;
use crate::models::config::OutputFormat;
use crate::models::record::Column;
use anyhow::Result;
use colored::Colorize;

/// Execute the options command.
pub fn execute_options(dataset: &Dataset, column: &str, format: OutputFormat) -> Result<()> {
    let column: Column = column.parse()?;
    let values = dataset.distinct_values(column)?;
    let span = dataset.date_span();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "column": column,
                "values": values,
                "date_span": span.map(|(start, end)| [start, end]),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Simple => {
            for value in &values {
                println!("{}", value);
            }
        }
        OutputFormat::Table => {
            if let Some((start, end)) = span {
                println!("{} {} to {}", "Dates:".bold(), start, end);
            }
            println!("{}", format!("{} ({}):", column, values.len()).bold());
            for value in &values {
                println!("  {}", value);
            }
        }
    }

    Ok(())
}
