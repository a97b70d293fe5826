//! Bar command implementation.

use super::output;
use crate::cli::args::{resolve_measure, FilterArgs};
use crate::core::Dataset;
use crate::models::aggregate::Axis;
use crate::models::config::{Config, OutputFormat};
use anyhow::Result;

/// Execute the bar command: city or county totals, largest first.
pub fn execute_bar(
    dataset: &Dataset,
    filters: &FilterArgs,
    measure: Option<&str>,
    axis: &str,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let criteria = filters.to_criteria()?;
    let measure = resolve_measure(measure, config.query.measure)?;
    let axis: Axis = axis.parse()?;

    let result = dataset.bar_aggregation(&criteria, axis, measure, config.display.decimals);

    output::print_result(&result, format, config.display.decimals)
}
