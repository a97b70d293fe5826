//! Summary command implementation.

use crate::core::Dataset;
use crate::models::config::OutputFormat;
use crate::models::record::Column;
use anyhow::Result;
use colored::Colorize;

/// Execute the summary command: what was loaded and what was skipped.
pub fn execute_summary(dataset: &Dataset, format: OutputFormat) -> Result<()> {
    let report = dataset.report();

    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "report": report,
            "date_span": dataset.date_span().map(|(start, end)| [start, end]),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Dataset Summary".bold().cyan());
    println!("{}", "=".repeat(40));
    println!("  Rows read:    {}", report.rows_read);
    println!("  Rows kept:    {}", report.kept.to_string().green());
    if report.skipped > 0 {
        println!("  Rows skipped: {}", report.skipped.to_string().yellow());
        println!("    Bad date:    {}", report.bad_date);
        println!("    Bad measure: {}", report.bad_measure);
        println!("    Malformed:   {}", report.malformed);
    } else {
        println!("  Rows skipped: 0");
    }

    if let Some((start, end)) = dataset.date_span() {
        println!("  Dates:        {} to {}", start, end);
    }

    let without_coordinates = dataset
        .records()
        .iter()
        .filter(|r| !r.has_coordinates())
        .count();
    println!("  No coordinates: {}", without_coordinates);

    for column in [Column::County, Column::City, Column::StoreName] {
        let count = dataset.distinct_values(column)?.len();
        println!("  Distinct {:<11} {}", format!("{}:", column), count);
    }

    Ok(())
}
