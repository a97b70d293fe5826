//! Range command implementation.
//!
//! Reports the bounds of the store totals, which seed the map value window.

use super::output::format_value;
use crate::cli::args::{resolve_measure, FilterArgs};
use crate::core::Dataset;
use crate::models::config::{Config, OutputFormat};
use crate::Error;
use anyhow::Result;
use colored::Colorize;

/// Bounds from a range query, or `fallback` when nothing matched.
///
/// The flag is `true` when the fallback was used. Errors other than an
/// empty result are returned unchanged.
pub fn bounds_or_fallback(
    bounds: crate::Result<(f64, f64)>,
    fallback: [f64; 2],
) -> crate::Result<(f64, f64, bool)> {
    match bounds {
        Ok((min, max)) => Ok((min, max, false)),
        Err(Error::EmptyResult(reason)) => {
            tracing::warn!("{}; using the configured fallback range", reason);
            let [min, max] = fallback;
            Ok((min, max, true))
        }
        Err(e) => Err(e),
    }
}

/// Execute the range command.
pub fn execute_range(
    dataset: &Dataset,
    filters: &FilterArgs,
    measure: Option<&str>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let criteria = filters.to_criteria()?;
    let measure = resolve_measure(measure, config.query.measure)?;

    let (min, max, fallback) = bounds_or_fallback(
        dataset.slider_bounds(&criteria, measure),
        config.query.fallback_range,
    )?;

    let decimals = config.display.decimals;
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "measure": measure,
                "min": min,
                "max": max,
                "fallback": fallback,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Simple => {
            println!(
                "{} {}",
                format_value(min, measure, decimals),
                format_value(max, measure, decimals)
            );
        }
        OutputFormat::Table => {
            println!("{}", format!("{} per store", measure.label()).bold());
            println!("  Min: {}", format_value(min, measure, decimals));
            println!("  Max: {}", format_value(max, measure, decimals));
            if fallback {
                println!("{}", "  (no stores match the filters, showing fallback)".yellow());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::criteria::{FilterCriteria, Selection};
    use crate::models::record::{Column, Measure, SaleRecord};
    use chrono::NaiveDate;

    fn create_test_dataset() -> Dataset {
        let day = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        Dataset::from_records(vec![
            SaleRecord::new(day)
                .with_text(Column::StoreName, "Hy-Vee")
                .with_text(Column::City, "Ames")
                .with_coordinates(42.02, -93.61)
                .with_measures(4, 40.0, 3.0),
            SaleRecord::new(day)
                .with_text(Column::StoreName, "Fareway")
                .with_text(Column::City, "Ankeny")
                .with_coordinates(41.72, -93.6)
                .with_measures(9, 90.0, 6.75),
        ])
    }

    #[test]
    fn test_bounds_from_matching_stores() {
        let dataset = create_test_dataset();
        let bounds = dataset.slider_bounds(&FilterCriteria::all(), Measure::BottlesSold);

        assert_eq!(
            bounds_or_fallback(bounds, [0.0, 100.0]).unwrap(),
            (4.0, 9.0, false)
        );
    }

    #[test]
    fn test_empty_selection_uses_fallback() {
        let dataset = create_test_dataset();
        let criteria = FilterCriteria::all().with_city(Selection::none());
        let bounds = dataset.slider_bounds(&criteria, Measure::SaleDollars);

        assert_eq!(
            bounds_or_fallback(bounds, [0.0, 100.0]).unwrap(),
            (0.0, 100.0, true)
        );
    }

    #[test]
    fn test_other_errors_pass_through() {
        let bounds = Err(Error::invalid_filter("unknown measure 'profit'"));

        assert!(matches!(
            bounds_or_fallback(bounds, [0.0, 100.0]),
            Err(Error::InvalidFilter(_))
        ));
    }
}
