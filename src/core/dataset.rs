//! Immutable dataset handle.
//!
//! A `Dataset` is built once at startup, either from a file or from
//! records already in memory, and is read-only from then on. Clones share
//! the same records, so one handle can be passed to every query and to
//! other threads without locking. The records are freed when the last
//! clone is dropped at shutdown.

use super::aggregate::{
    aggregate_request, round_values, sort_by_value_desc, value_range, within_value_range,
};
use super::filter::filter;
use super::loader::{self, LoadOptions};
use super::transform::{SkipReport, Transformed};
use crate::models::aggregate::{AggregatedResult, AggregationRequest, Axis};
use crate::models::criteria::FilterCriteria;
use crate::models::record::{Column, Measure, SaleRecord};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Shared, read-only sales data.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[SaleRecord]>,
    report: SkipReport,
}

impl Dataset {
    /// Load and transform a dataset file.
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self> {
        let transformed = loader::load(path, options)?;
        Ok(Self::from_transformed(transformed))
    }

    /// Wrap the output of a transformation.
    pub fn from_transformed(transformed: Transformed) -> Self {
        Self {
            records: transformed.records.into(),
            report: transformed.report,
        }
    }

    /// Wrap records already in memory.
    pub fn from_records(records: Vec<SaleRecord>) -> Self {
        let report = SkipReport {
            rows_read: records.len(),
            kept: records.len(),
            ..SkipReport::default()
        };
        Self {
            records: records.into(),
            report,
        }
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// What happened to the source rows at load time.
    pub fn report(&self) -> &SkipReport {
        &self.report
    }

    /// Records matching `criteria`.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&SaleRecord> {
        filter(self.records.iter(), criteria)
    }

    /// Filter then aggregate.
    pub fn query(&self, criteria: &FilterCriteria, request: &AggregationRequest) -> AggregatedResult {
        aggregate_request(self.filter(criteria), request)
    }

    /// Store-level totals for map markers.
    ///
    /// Records without both coordinates cannot be placed on a map and are
    /// left out of this query only; every other query keeps them.
    pub fn map_aggregation(&self, criteria: &FilterCriteria, measure: Measure) -> AggregatedResult {
        let filtered = self.filter(criteria);
        let total = filtered.len();
        let placeable: Vec<&SaleRecord> = filtered
            .into_iter()
            .filter(|record| record.has_coordinates())
            .collect();

        let dropped = total - placeable.len();
        if dropped > 0 {
            tracing::warn!("{} records without coordinates left off the map", dropped);
        }

        aggregate_request(placeable, &AggregationRequest::store_level(measure))
    }

    /// Store-level totals restricted to a value window, as shown on the map.
    pub fn map_aggregation_within(
        &self,
        criteria: &FilterCriteria,
        measure: Measure,
        min: f64,
        max: f64,
    ) -> AggregatedResult {
        within_value_range(self.map_aggregation(criteria, measure), min, max)
    }

    /// City or county totals, rounded and sorted largest first.
    pub fn bar_aggregation(
        &self,
        criteria: &FilterCriteria,
        axis: Axis,
        measure: Measure,
        decimals: u32,
    ) -> AggregatedResult {
        let result = self.query(criteria, &AggregationRequest::by_axis(axis, measure));
        sort_by_value_desc(round_values(result, decimals))
    }

    /// Bounds of the store-level totals, used for the map value window.
    ///
    /// Uses the same grouping as [`Dataset::map_aggregation`], county
    /// included, so the bounds always match the markers being windowed.
    ///
    /// Fails with [`Error::EmptyResult`] when nothing matches; the caller
    /// picks the fallback.
    pub fn slider_bounds(&self, criteria: &FilterCriteria, measure: Measure) -> Result<(f64, f64)> {
        value_range(&self.map_aggregation(criteria, measure))
    }

    /// Sorted distinct non-missing values of a text column.
    pub fn distinct_values(&self, column: Column) -> Result<Vec<String>> {
        if !column.is_text() {
            return Err(Error::invalid_filter(format!(
                "column '{}' has no text values to list",
                column
            )));
        }

        let values: BTreeSet<&str> = self
            .records
            .iter()
            .filter_map(|record| record.text(column))
            .collect();
        Ok(values.into_iter().map(str::to_string).collect())
    }

    /// Earliest and latest record dates.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().map(|record| record.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(min, max), d| (min.min(d), max.max(d))))
    }
}
