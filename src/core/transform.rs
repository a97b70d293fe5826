//! Raw row transformation.
//!
//! Maps source columns onto the sale record shape, parses dates and
//! measures, and normalises missing text. Rows whose date or measures
//! cannot be parsed are rejected (never coerced to zero) and counted in
//! a [`SkipReport`].

use crate::models::record::SaleRecord;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// Text values treated as missing after trimming.
const NULL_MARKERS: &[&str] = &["nan", "NaN", "null", "NULL", "None"];

/// Accepted header spellings per logical column, compared case-insensitively.
const DATE: &[&str] = &["date"];
const STORE_NAME: &[&str] = &["store name", "store_name"];
const ADDRESS: &[&str] = &["address"];
const CITY: &[&str] = &["city"];
const COUNTY: &[&str] = &["county"];
const CATEGORY_NAME: &[&str] = &["category name", "category_name"];
const VENDOR_NAME: &[&str] = &["vendor name", "vendor_name"];
const LATITUDE: &[&str] = &["latitude", "lat"];
const LONGITUDE: &[&str] = &["longitude", "lon"];
const STORE_LOCATION: &[&str] = &["store location", "store_location"];
const BOTTLES_SOLD: &[&str] = &["bottles sold", "bottles_sold"];
const SALE_DOLLARS: &[&str] = &["sale (dollars)", "sale_dollars"];
const VOLUME_SOLD: &[&str] = &["volume sold (liters)", "volume_sold_liters"];

/// One raw row as read from the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// Line number in the source (the header is line 1).
    pub line: u64,
    /// Field values in header order.
    pub values: Vec<String>,
}

/// Raw rows plus the header they are laid out by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    /// Rows the reader could not decode at all.
    pub unreadable: usize,
}

impl RawTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            unreadable: 0,
        }
    }

    /// Append a row, numbering it after the previous one.
    pub fn push<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let line = self.rows.last().map_or(2, |r| r.line + 1);
        self.rows.push(RawRow {
            line,
            values: values.into_iter().map(Into::into).collect(),
        });
    }
}

/// Why a row was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BadDate,
    BadMeasure,
    Malformed,
}

/// Counts of rows read, kept, and rejected during transformation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkipReport {
    pub rows_read: usize,
    pub kept: usize,
    pub skipped: usize,
    pub bad_date: usize,
    pub bad_measure: usize,
    pub malformed: usize,
}

impl SkipReport {
    fn record(&mut self, reason: SkipReason) {
        self.skipped += 1;
        match reason {
            SkipReason::BadDate => self.bad_date += 1,
            SkipReason::BadMeasure => self.bad_measure += 1,
            SkipReason::Malformed => self.malformed += 1,
        }
    }
}

/// Output of [`transform`].
#[derive(Debug, Clone, Default)]
pub struct Transformed {
    pub records: Vec<SaleRecord>,
    pub report: SkipReport,
}

/// Where store coordinates come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coordinates {
    Columns { lat: usize, lon: usize },
    StoreLocation(usize),
}

/// Header positions of every logical column.
#[derive(Debug, Clone, Copy)]
struct Schema {
    width: usize,
    date: usize,
    store_name: usize,
    address: usize,
    city: usize,
    county: usize,
    category_name: usize,
    vendor_name: usize,
    coordinates: Coordinates,
    bottles_sold: usize,
    sale_dollars: usize,
    volume_sold_liters: usize,
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let name = h.trim().trim_start_matches('\u{feff}').to_lowercase();
        aliases.contains(&name.as_str())
    })
}

impl Schema {
    /// Resolve header positions, naming every missing column on failure.
    fn resolve(headers: &[String]) -> Result<Self> {
        let mut missing = Vec::new();
        let mut require = |name: &str, aliases: &[&str]| {
            let index = find_column(headers, aliases);
            if index.is_none() {
                missing.push(name.to_string());
            }
            index.unwrap_or_default()
        };

        let date = require("date", DATE);
        let store_name = require("store_name", STORE_NAME);
        let address = require("address", ADDRESS);
        let city = require("city", CITY);
        let county = require("county", COUNTY);
        let category_name = require("category_name", CATEGORY_NAME);
        let vendor_name = require("vendor_name", VENDOR_NAME);
        let bottles_sold = require("bottles_sold", BOTTLES_SOLD);
        let sale_dollars = require("sale_dollars", SALE_DOLLARS);
        let volume_sold_liters = require("volume_sold_liters", VOLUME_SOLD);

        let lat = find_column(headers, LATITUDE);
        let lon = find_column(headers, LONGITUDE);
        let coordinates = match (lat, lon, find_column(headers, STORE_LOCATION)) {
            (Some(lat), Some(lon), _) => Coordinates::Columns { lat, lon },
            (_, _, Some(location)) => Coordinates::StoreLocation(location),
            (lat, lon, None) => {
                if lat.is_none() {
                    missing.push("lat".to_string());
                }
                if lon.is_none() {
                    missing.push("lon".to_string());
                }
                Coordinates::StoreLocation(0)
            }
        };

        if !missing.is_empty() {
            return Err(Error::schema(missing));
        }

        Ok(Self {
            width: headers.len(),
            date,
            store_name,
            address,
            city,
            county,
            category_name,
            vendor_name,
            coordinates,
            bottles_sold,
            sale_dollars,
            volume_sold_liters,
        })
    }
}

/// Transform raw rows into sale records.
///
/// Fails with [`Error::Schema`] when a required column is absent. Rows
/// with an unparseable date or measure are skipped and counted; all other
/// rows come through in input order.
pub fn transform(raw: &RawTable) -> Result<Transformed> {
    let schema = Schema::resolve(&raw.headers)?;

    let mut report = SkipReport {
        rows_read: raw.rows.len() + raw.unreadable,
        ..SkipReport::default()
    };
    for _ in 0..raw.unreadable {
        report.record(SkipReason::Malformed);
    }

    let mut records = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        match parse_row(&schema, row) {
            Ok(record) => records.push(record),
            Err((reason, err)) => {
                tracing::debug!("Skipping row: {}", err);
                report.record(reason);
            }
        }
    }
    report.kept = records.len();

    tracing::info!(
        "Transformed {} rows: {} kept, {} skipped",
        report.rows_read,
        report.kept,
        report.skipped
    );
    if report.skipped > 0 {
        tracing::warn!(
            "Skipped {} rows ({} bad dates, {} bad measures, {} malformed)",
            report.skipped,
            report.bad_date,
            report.bad_measure,
            report.malformed
        );
    }

    Ok(Transformed { records, report })
}

fn row_error(row: &RawRow, column: &str, reason: String) -> Error {
    Error::Parse {
        line: row.line,
        column: column.to_string(),
        reason,
    }
}

fn parse_row(
    schema: &Schema,
    row: &RawRow,
) -> std::result::Result<SaleRecord, (SkipReason, Error)> {
    if row.values.len() != schema.width {
        let reason = format!(
            "expected {} fields, found {}",
            schema.width,
            row.values.len()
        );
        return Err((SkipReason::Malformed, row_error(row, "row", reason)));
    }
    let field = move |index: usize| row.values[index].as_str();

    let date = parse_date(field(schema.date))
        .map_err(|reason| (SkipReason::BadDate, row_error(row, "date", reason)))?;

    let bottles_sold = parse_count(field(schema.bottles_sold)).map_err(|reason| {
        (SkipReason::BadMeasure, row_error(row, "bottles_sold", reason))
    })?;
    let sale_dollars = parse_amount(field(schema.sale_dollars)).map_err(|reason| {
        (SkipReason::BadMeasure, row_error(row, "sale_dollars", reason))
    })?;
    let volume_sold_liters =
        parse_amount(field(schema.volume_sold_liters)).map_err(|reason| {
            (SkipReason::BadMeasure, row_error(row, "volume_sold_liters", reason))
        })?;

    let (lat, lon) = match schema.coordinates {
        Coordinates::Columns { lat, lon } => (
            parse_coordinate(field(lat), 90.0),
            parse_coordinate(field(lon), 180.0),
        ),
        Coordinates::StoreLocation(index) => parse_point(field(index)).unzip(),
    };

    Ok(SaleRecord {
        date,
        store_name: normalize_text(field(schema.store_name)),
        address: normalize_text(field(schema.address)),
        city: normalize_text(field(schema.city)),
        county: normalize_text(field(schema.county)),
        category_name: normalize_text(field(schema.category_name)),
        vendor_name: normalize_text(field(schema.vendor_name)),
        lat,
        lon,
        bottles_sold,
        sale_dollars,
        volume_sold_liters,
    })
}

/// Trim a text field, mapping blanks and null markers to `None`.
pub fn normalize_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || NULL_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse `YYYY-MM-DD`, `MM/DD/YYYY`, or an ISO timestamp.
pub fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty date".to_string());
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    // Timestamps such as 2021-03-01T00:00:00.000
    if let (Some(prefix), Some(sep)) = (trimmed.get(..10), trimmed.get(10..11)) {
        if sep == "T" || sep == " " {
            if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                return Ok(date);
            }
        }
    }

    Err(format!("unrecognised date '{}'", trimmed))
}

fn clean_number(value: &str) -> String {
    let trimmed = value.trim();
    trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .trim()
        .replace(',', "")
}

/// Parse a non-negative decimal amount.
pub fn parse_amount(value: &str) -> std::result::Result<f64, String> {
    let cleaned = clean_number(value);
    if cleaned.is_empty() {
        return Err("empty value".to_string());
    }
    let amount: f64 = cleaned
        .parse()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;
    if !amount.is_finite() {
        return Err(format!("'{}' is not finite", value.trim()));
    }
    if amount < 0.0 {
        return Err(format!("'{}' is negative", value.trim()));
    }
    // Fold -0.0 into 0.0
    Ok(amount + 0.0)
}

/// Parse a non-negative whole count. `12.0` is accepted as 12.
pub fn parse_count(value: &str) -> std::result::Result<u64, String> {
    let cleaned = clean_number(value);
    if let Ok(count) = cleaned.parse::<u64>() {
        return Ok(count);
    }
    let amount = parse_amount(value)?;
    if amount.fract() != 0.0 || amount > u64::MAX as f64 {
        return Err(format!("'{}' is not a whole number", value.trim()));
    }
    Ok(amount as u64)
}

/// Parse a coordinate, treating blanks and out-of-range values as missing.
fn parse_coordinate(value: &str, limit: f64) -> Option<f64> {
    let parsed: f64 = value.trim().parse().ok()?;
    (parsed.is_finite() && parsed.abs() <= limit).then_some(parsed)
}

/// Parse `POINT (lon lat)` into `(lat, lon)`.
fn parse_point(value: &str) -> Option<(f64, f64)> {
    let body = value.trim().strip_prefix("POINT")?.trim();
    let body = body.strip_prefix('(')?.strip_suffix(')')?;
    let mut parts = body.split_whitespace();
    let lon = parse_coordinate(parts.next()?, 180.0)?;
    let lat = parse_coordinate(parts.next()?, 90.0)?;
    if parts.next().is_some() {
        return None;
    }
    Some((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Ames "), Some("Ames".to_string()));
        assert_eq!(normalize_text(""), None);
        assert_eq!(normalize_text("   "), None);
        assert_eq!(normalize_text("NaN"), None);
        assert_eq!(normalize_text("NULL"), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        assert_eq!(parse_date("2021-03-01").unwrap(), expected);
        assert_eq!(parse_date("03/01/2021").unwrap(), expected);
        assert_eq!(parse_date("2021-03-01T00:00:00.000").unwrap(), expected);
        assert_eq!(parse_date(" 2021-03-01 00:00:00").unwrap(), expected);
        assert!(parse_date("").is_err());
        assert!(parse_date("2021-13-01").is_err());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.50").unwrap(), 12.5);
        assert_eq!(parse_amount(" $1,234.56 ").unwrap(), 1234.56);
        assert_eq!(parse_amount("-0").unwrap(), 0.0);
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("NaN").is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("12").unwrap(), 12);
        assert_eq!(parse_count("12.0").unwrap(), 12);
        assert_eq!(parse_count("1,200").unwrap(), 1200);
        assert!(parse_count("1.5").is_err());
        assert!(parse_count("-1").is_err());
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("41.59", 90.0), Some(41.59));
        assert_eq!(parse_coordinate("", 90.0), None);
        assert_eq!(parse_coordinate("95", 90.0), None);
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(
            parse_point("POINT (-93.61 41.59)"),
            Some((41.59, -93.61))
        );
        assert_eq!(parse_point("POINT(-93.61 41.59)"), Some((41.59, -93.61)));
        assert_eq!(parse_point(""), None);
        assert_eq!(parse_point("POINT (-93.61)"), None);
    }

    #[test]
    fn test_schema_reports_every_missing_column() {
        let raw = RawTable::new(["Date", "City"]);
        match transform(&raw) {
            Err(Error::Schema { missing }) => {
                assert!(missing.contains(&"store_name".to_string()));
                assert!(missing.contains(&"sale_dollars".to_string()));
                assert!(missing.contains(&"lat".to_string()));
                assert!(missing.contains(&"lon".to_string()));
                assert!(!missing.contains(&"date".to_string()));
                assert!(!missing.contains(&"city".to_string()));
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_raw_table_line_numbers() {
        let mut raw = RawTable::new(["a"]);
        raw.push(["1"]);
        raw.push(["2"]);
        assert_eq!(raw.rows[0].line, 2);
        assert_eq!(raw.rows[1].line, 3);
    }
}
