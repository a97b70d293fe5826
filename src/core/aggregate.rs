//! Grouping and summation of filtered records.

use crate::models::aggregate::{AggregatedResult, AggregatedRow, AggregationRequest, GroupValue};
use crate::models::record::{Column, Measure, SaleRecord};
use crate::{Error, Result};
use rustc_hash::FxHashMap;

/// Running sum for one group.
///
/// Whole-number measures are summed as integers so large bottle counts
/// stay exact; decimal measures are summed as `f64` like the input.
#[derive(Debug, Clone, Copy)]
enum Sum {
    Integer(u64),
    Decimal(f64),
}

impl Sum {
    fn zero(measure: Measure) -> Self {
        if measure.is_integer() {
            Sum::Integer(0)
        } else {
            Sum::Decimal(0.0)
        }
    }

    fn add(&mut self, record: &SaleRecord, measure: Measure) {
        match self {
            Sum::Integer(total) => *total = total.saturating_add(record.bottles_sold),
            Sum::Decimal(total) => *total += record.measure(measure),
        }
    }

    fn value(&self) -> f64 {
        match self {
            Sum::Integer(total) => *total as f64,
            Sum::Decimal(total) => *total,
        }
    }
}

/// Group records by the exact tuple of `group_by` values and sum `measure`.
///
/// Missing grouping values form their own group. Rows come out in the
/// order their group was first seen. An empty `group_by` yields a single
/// row covering every record (or no rows for no records).
pub fn aggregate<'a, I>(records: I, group_by: &[Column], measure: Measure) -> AggregatedResult
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let mut positions: FxHashMap<Vec<GroupValue>, usize> = FxHashMap::default();
    let mut groups: Vec<(Vec<GroupValue>, Sum)> = Vec::new();

    for record in records {
        let key: Vec<GroupValue> = group_by.iter().map(|c| record.group_value(*c)).collect();
        let index = match positions.get(&key) {
            Some(&index) => index,
            None => {
                let index = groups.len();
                positions.insert(key.clone(), index);
                groups.push((key, Sum::zero(measure)));
                index
            }
        };
        groups[index].1.add(record, measure);
    }

    tracing::debug!(
        "Aggregated {} by [{}] into {} groups",
        measure,
        group_by
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        groups.len()
    );

    AggregatedResult {
        group_by: group_by.to_vec(),
        measure,
        rows: groups
            .into_iter()
            .map(|(key, sum)| AggregatedRow {
                key,
                value: sum.value(),
            })
            .collect(),
    }
}

/// Aggregate according to a request.
pub fn aggregate_request<'a, I>(records: I, request: &AggregationRequest) -> AggregatedResult
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    aggregate(records, &request.group_by, request.measure)
}

/// Minimum and maximum `value` across all rows.
///
/// Fails with [`Error::EmptyResult`] when there are no rows.
pub fn value_range(result: &AggregatedResult) -> Result<(f64, f64)> {
    let mut values = result.rows.iter().map(|row| row.value);
    let first = values.next().ok_or_else(|| {
        Error::EmptyResult(format!(
            "no groups to take the {} range of",
            result.measure
        ))
    })?;

    Ok(values.fold((first, first), |(min, max), v| (min.min(v), max.max(v))))
}

/// Sort rows by value, largest first. Ties keep their current order.
pub fn sort_by_value_desc(mut result: AggregatedResult) -> AggregatedResult {
    result
        .rows
        .sort_by(|a, b| b.value.total_cmp(&a.value));
    result
}

/// Round every value to `decimals` places.
///
/// Rounding is a display step applied after aggregation, never during it.
pub fn round_values(mut result: AggregatedResult, decimals: u32) -> AggregatedResult {
    let factor = 10f64.powi(decimals.min(15) as i32);
    for row in &mut result.rows {
        row.value = (row.value * factor).round() / factor;
    }
    result
}

/// Keep rows whose value lies within `[min, max]`.
pub fn within_value_range(mut result: AggregatedResult, min: f64, max: f64) -> AggregatedResult {
    result.rows.retain(|row| row.value >= min && row.value <= max);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sale(county: Option<&str>, bottles: u64, dollars: f64) -> SaleRecord {
        let record = SaleRecord::new(NaiveDate::from_ymd_opt(2021, 3, 1).unwrap())
            .with_measures(bottles, dollars, 0.0);
        match county {
            Some(c) => record.with_text(Column::County, c),
            None => record,
        }
    }

    #[test]
    fn test_null_keys_form_their_own_group() {
        let records = vec![sale(Some("Polk"), 1, 1.0), sale(None, 2, 2.0), sale(None, 3, 3.0)];
        let result = aggregate(&records, &[Column::County], Measure::BottlesSold);

        assert_eq!(result.len(), 2);
        assert_eq!(result.value_of(&[GroupValue::Null]), Some(5.0));
        assert_eq!(result.value_of(&[GroupValue::text("Polk")]), Some(1.0));
    }

    #[test]
    fn test_first_seen_order() {
        let records = vec![sale(Some("Story"), 1, 1.0), sale(Some("Polk"), 1, 1.0)];
        let result = aggregate(&records, &[Column::County], Measure::BottlesSold);
        assert_eq!(result.rows[0].key, vec![GroupValue::text("Story")]);
    }

    #[test]
    fn test_empty_group_by_is_a_single_group() {
        let records = vec![sale(Some("Polk"), 1, 10.25), sale(Some("Story"), 1, 5.5)];
        let result = aggregate(&records, &[], Measure::SaleDollars);

        assert_eq!(result.len(), 1);
        assert!(result.rows[0].key.is_empty());
        assert_eq!(result.rows[0].value, 15.75);
    }

    #[test]
    fn test_no_records_no_rows() {
        let records: Vec<SaleRecord> = Vec::new();
        assert!(aggregate(&records, &[], Measure::SaleDollars).is_empty());
    }

    #[test]
    fn test_value_range_empty() {
        let records: Vec<SaleRecord> = Vec::new();
        let result = aggregate(&records, &[Column::County], Measure::SaleDollars);
        assert!(matches!(value_range(&result), Err(Error::EmptyResult(_))));
    }

    #[test]
    fn test_value_range_single_row() {
        let records = vec![sale(Some("Polk"), 4, 1.0)];
        let result = aggregate(&records, &[Column::County], Measure::BottlesSold);
        assert_eq!(value_range(&result).unwrap(), (4.0, 4.0));
    }

    #[test]
    fn test_sort_and_round() {
        let records = vec![
            sale(Some("Story"), 1, 1.005),
            sale(Some("Polk"), 1, 20.123),
            sale(Some("Linn"), 1, 7.777),
        ];
        let result = aggregate(&records, &[Column::County], Measure::SaleDollars);
        let result = round_values(sort_by_value_desc(result), 2);

        let values: Vec<f64> = result.rows.iter().map(|r| r.value).collect();
        assert_eq!(values[0], 20.12);
        assert_eq!(values[1], 7.78);
        assert_eq!(result.rows[2].key, vec![GroupValue::text("Story")]);
    }

    #[test]
    fn test_within_value_range_is_inclusive() {
        let records = vec![
            sale(Some("Story"), 3, 0.0),
            sale(Some("Polk"), 12, 0.0),
            sale(Some("Linn"), 20, 0.0),
        ];
        let result = aggregate(&records, &[Column::County], Measure::BottlesSold);
        let windowed = within_value_range(result, 3.0, 12.0);

        assert_eq!(windowed.len(), 2);
        assert_eq!(windowed.value_of(&[GroupValue::text("Linn")]), None);
    }
}
