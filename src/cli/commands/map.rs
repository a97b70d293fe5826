//! Map command implementation.
//!
//! Store-level totals, the data behind the map markers.

use super::output;
use crate::cli::args::{resolve_measure, FilterArgs};
use crate::core::Dataset;
use crate::models::config::{Config, OutputFormat};
use anyhow::Result;

/// Execute the map command.
pub fn execute_map(
    dataset: &Dataset,
    filters: &FilterArgs,
    measure: Option<&str>,
    min: Option<f64>,
    max: Option<f64>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let criteria = filters.to_criteria()?;
    let measure = resolve_measure(measure, config.query.measure)?;

    let result = match (min, max) {
        (None, None) => dataset.map_aggregation(&criteria, measure),
        (min, max) => dataset.map_aggregation_within(
            &criteria,
            measure,
            min.unwrap_or(f64::NEG_INFINITY),
            max.unwrap_or(f64::INFINITY),
        ),
    };

    output::print_result(&result, format, config.display.decimals)
}
