//! Aggregation request and result models.

use super::record::{Column, Measure};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// A float usable as part of a group key.
///
/// Equality, hashing and ordering go through the bit pattern, with `-0.0`
/// folded into `0.0` and every NaN treated as the same value.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct Coordinate(pub f64);

impl Coordinate {
    pub fn as_f64(&self) -> f64 {
        self.0
    }

    fn key(&self) -> u64 {
        if self.0.is_nan() {
            f64::NAN.to_bits()
        } else if self.0 == 0.0 {
            0.0f64.to_bits()
        } else {
            self.0.to_bits()
        }
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Coordinate {}

impl std::hash::Hash for Coordinate {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        f64::from_bits(self.key()).total_cmp(&f64::from_bits(other.key()))
    }
}

/// One component of a group key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum GroupValue {
    /// Missing value. Missing values form their own group.
    Null,
    Date(NaiveDate),
    Number(Coordinate),
    Text(String),
}

impl GroupValue {
    /// Convenience constructor for text keys.
    pub fn text<S: Into<String>>(s: S) -> Self {
        GroupValue::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, GroupValue::Null)
    }
}

impl std::fmt::Display for GroupValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupValue::Null => write!(f, "(missing)"),
            GroupValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            GroupValue::Number(n) => write!(f, "{}", n.0),
            GroupValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Bar chart x-axis choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    City,
    County,
}

impl Axis {
    pub fn column(&self) -> Column {
        match self {
            Axis::City => Column::City,
            Axis::County => Column::County,
        }
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "city" => Ok(Axis::City),
            "county" => Ok(Axis::County),
            other => Err(Error::invalid_filter(format!(
                "unknown axis '{}', expected city or county",
                other
            ))),
        }
    }
}

/// Grouping and measure selection for one aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationRequest {
    /// Ordered grouping columns. Empty means one group covering every record.
    pub group_by: Vec<Column>,
    /// Measure to sum.
    pub measure: Measure,
}

impl AggregationRequest {
    pub fn new(group_by: Vec<Column>, measure: Measure) -> Self {
        Self { group_by, measure }
    }

    /// Grouping used for store markers on the map.
    pub fn store_level(measure: Measure) -> Self {
        Self::new(
            vec![
                Column::StoreName,
                Column::Address,
                Column::City,
                Column::County,
                Column::Lat,
                Column::Lon,
            ],
            measure,
        )
    }

    /// Grouping used for the city/county bar chart.
    pub fn by_axis(axis: Axis, measure: Measure) -> Self {
        Self::new(vec![axis.column()], measure)
    }

    /// Build a request from column and measure names.
    ///
    /// Fails with `InvalidFilter` naming the first unknown column or measure.
    pub fn parse<S: AsRef<str>>(group_by: &[S], measure: &str) -> Result<Self> {
        let group_by = group_by
            .iter()
            .map(|name| name.as_ref().parse::<Column>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(group_by, measure.parse()?))
    }
}

/// One output row: the group key and the summed measure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRow {
    /// Group key values, aligned with `AggregatedResult::group_by`.
    pub key: Vec<GroupValue>,
    /// Summed measure.
    pub value: f64,
}

/// Result of an aggregation. Computed per query and never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedResult {
    pub group_by: Vec<Column>,
    pub measure: Measure,
    pub rows: Vec<AggregatedRow>,
}

impl AggregatedResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a grouping column in each row key.
    pub fn column_index(&self, column: Column) -> Option<usize> {
        self.group_by.iter().position(|c| *c == column)
    }

    /// Value of the row whose key equals `key`, if any.
    pub fn value_of(&self, key: &[GroupValue]) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.key.as_slice() == key)
            .map(|row| row.value)
    }

    /// Sum of all row values.
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|row| row.value).sum()
    }

    /// Rows as flat JSON objects: one member per grouping column plus `value`.
    pub fn to_json_rows(&self) -> Result<Vec<serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| -> Result<serde_json::Value> {
                let mut object = serde_json::Map::new();
                for (column, value) in self.group_by.iter().zip(&row.key) {
                    object.insert(column.as_str().to_string(), serde_json::to_value(value)?);
                }
                object.insert("value".to_string(), serde_json::json!(row.value));
                Ok(serde_json::Value::Object(object))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_coordinate_key_semantics() {
        assert_eq!(Coordinate(0.0), Coordinate(-0.0));
        assert_eq!(Coordinate(f64::NAN), Coordinate(f64::NAN));
        assert!(Coordinate(-93.6) < Coordinate(41.5));

        let mut set = HashSet::new();
        set.insert(Coordinate(0.0));
        assert!(set.contains(&Coordinate(-0.0)));
    }

    #[test]
    fn test_request_parse() {
        let request = AggregationRequest::parse(&["city", "county"], "bottles_sold").unwrap();
        assert_eq!(request.group_by, vec![Column::City, Column::County]);
        assert_eq!(request.measure, Measure::BottlesSold);

        let empty: [&str; 0] = [];
        assert!(AggregationRequest::parse(&empty, "sale_dollars")
            .unwrap()
            .group_by
            .is_empty());
    }

    #[test]
    fn test_request_parse_rejects_unknown_names() {
        assert!(matches!(
            AggregationRequest::parse(&["city", "zip"], "sale_dollars"),
            Err(Error::InvalidFilter(_))
        ));
        assert!(matches!(
            AggregationRequest::parse(&["city"], "profit"),
            Err(Error::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_axis_from_str() {
        assert_eq!("county".parse::<Axis>().unwrap().column(), Column::County);
        assert!("store".parse::<Axis>().is_err());
    }

    #[test]
    fn test_to_json_rows() {
        let result = AggregatedResult {
            group_by: vec![Column::City],
            measure: Measure::SaleDollars,
            rows: vec![
                AggregatedRow {
                    key: vec![GroupValue::text("Ames")],
                    value: 100.0,
                },
                AggregatedRow {
                    key: vec![GroupValue::Null],
                    value: 5.5,
                },
            ],
        };

        let rows = result.to_json_rows().unwrap();
        assert_eq!(rows[0], serde_json::json!({"city": "Ames", "value": 100.0}));
        assert_eq!(rows[1], serde_json::json!({"city": null, "value": 5.5}));
    }
}
