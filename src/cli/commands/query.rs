//! Query command implementation.
//!
//! Generic filter-then-aggregate over any grouping columns.

use super::output;
use crate::cli::args::{resolve_measure, FilterArgs};
use crate::core::Dataset;
use crate::models::aggregate::AggregationRequest;
use crate::models::config::{Config, OutputFormat};
use anyhow::Result;

/// Execute the query command.
pub fn execute_query(
    dataset: &Dataset,
    filters: &FilterArgs,
    group_by: &str,
    measure: Option<&str>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let criteria = filters.to_criteria()?;
    let measure = resolve_measure(measure, config.query.measure)?;
    let columns: Vec<&str> = group_by
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    let request = AggregationRequest::parse(&columns, measure.as_str())?;

    let result = dataset.query(&criteria, &request);

    output::print_result(&result, format, config.display.decimals)
}
