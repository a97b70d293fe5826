//! Integration tests for aggregation.
//!
//! Tests cover:
//! - Conservation of the measure total
//! - Value range bounds
//! - The single-day city scenario and the county bottle scenario
//! - Grouping by store-level columns including coordinates

use chrono::NaiveDate;
use liquor_sales::core::aggregate::{aggregate, aggregate_request, value_range};
use liquor_sales::core::filter::filter;
use liquor_sales::models::aggregate::{AggregationRequest, GroupValue};
use liquor_sales::models::criteria::{FilterCriteria, Selection};
use liquor_sales::models::record::{Column, Measure, SaleRecord};
use liquor_sales::Error;

// ========== TEST FIXTURES ==========

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn county_sale(county: &str, bottles: u64) -> SaleRecord {
    SaleRecord::new(date("2021-03-01"))
        .with_text(Column::County, county)
        .with_measures(bottles, bottles as f64 * 10.5, bottles as f64 * 0.75)
}

fn store_sale(store: &str, city: &str, lat: f64, lon: f64, dollars: f64) -> SaleRecord {
    SaleRecord::new(date("2021-03-01"))
        .with_text(Column::StoreName, store)
        .with_text(Column::Address, "1 Main St")
        .with_text(Column::City, city)
        .with_text(Column::County, "Polk")
        .with_coordinates(lat, lon)
        .with_measures(1, dollars, 1.0)
}

fn create_mixed_records() -> Vec<SaleRecord> {
    vec![
        county_sale("Polk", 5),
        county_sale("Polk", 7),
        county_sale("Story", 3),
        county_sale("Linn", 11),
        SaleRecord::new(date("2021-03-02")).with_measures(4, 40.25, 3.5),
        county_sale("Story", 2),
    ]
}

// ========== SCENARIOS ==========

#[test]
fn test_single_day_city_scenario() {
    let records = vec![
        SaleRecord::new(date("2021-03-01"))
            .with_text(Column::City, "Ames")
            .with_measures(0, 100.0, 0.0),
        SaleRecord::new(date("2021-03-02"))
            .with_text(Column::City, "Ames")
            .with_measures(0, 50.0, 0.0),
    ];
    let criteria =
        FilterCriteria::all().with_dates(Some(date("2021-03-01")), Some(date("2021-03-01")));

    let result = aggregate(filter(&records, &criteria), &[Column::City], Measure::SaleDollars);

    assert_eq!(result.len(), 1);
    assert_eq!(result.rows[0].key, vec![GroupValue::text("Ames")]);
    assert_eq!(result.rows[0].value, 100.0);
}

#[test]
fn test_county_bottles_scenario() {
    let records = vec![
        county_sale("Polk", 5),
        county_sale("Polk", 7),
        county_sale("Story", 3),
    ];

    let result = aggregate(&records, &[Column::County], Measure::BottlesSold);

    assert_eq!(result.len(), 2);
    assert_eq!(result.value_of(&[GroupValue::text("Polk")]), Some(12.0));
    assert_eq!(result.value_of(&[GroupValue::text("Story")]), Some(3.0));
    assert_eq!(value_range(&result).unwrap(), (3.0, 12.0));
}

// ========== CONSERVATION ==========

#[test]
fn test_single_group_conserves_every_measure() {
    let records = create_mixed_records();

    for measure in Measure::ALL {
        let result = aggregate(&records, &[], measure);
        let direct: f64 = records.iter().map(|r| r.measure(measure)).sum();

        assert_eq!(result.len(), 1);
        assert_eq!(result.rows[0].value, direct, "measure {}", measure);
    }
}

#[test]
fn test_grouped_totals_conserve_the_measure() {
    let records = create_mixed_records();
    let result = aggregate(&records, &[Column::County], Measure::BottlesSold);
    let direct: u64 = records.iter().map(|r| r.bottles_sold).sum();

    assert_eq!(result.total(), direct as f64);
    // Polk, Story, Linn and the missing county
    assert_eq!(result.len(), 4);
    assert_eq!(result.value_of(&[GroupValue::Null]), Some(4.0));
}

#[test]
fn test_filtered_conservation() {
    let records = create_mixed_records();
    let criteria = FilterCriteria::all().with_county(Selection::only(["Story", "Linn"]));
    let filtered = filter(&records, &criteria);

    let result = aggregate(filtered.iter().copied(), &[], Measure::SaleDollars);
    let direct: f64 = filtered.iter().map(|r| r.sale_dollars).sum();
    assert_eq!(result.rows[0].value, direct);
}

// ========== RANGE ==========

#[test]
fn test_value_range_bounds_every_row() {
    let records = create_mixed_records();

    for measure in Measure::ALL {
        let result = aggregate(&records, &[Column::County], measure);
        let (min, max) = value_range(&result).unwrap();

        assert!(result.rows.iter().all(|r| r.value >= min && r.value <= max));
        assert!(result.rows.iter().any(|r| r.value == min));
        assert!(result.rows.iter().any(|r| r.value == max));
    }
}

#[test]
fn test_value_range_of_empty_filter() {
    let records = create_mixed_records();
    let criteria = FilterCriteria::all().with_county(Selection::none());
    let result = aggregate(filter(&records, &criteria), &[Column::County], Measure::SaleDollars);

    assert!(result.is_empty());
    assert!(matches!(value_range(&result), Err(Error::EmptyResult(_))));
}

// ========== STORE-LEVEL GROUPING ==========

#[test]
fn test_store_level_grouping() {
    let records = vec![
        store_sale("Hy-Vee #3", "Ames", 42.02, -93.61, 10.0),
        store_sale("Hy-Vee #3", "Ames", 42.02, -93.61, 15.5),
        store_sale("Hy-Vee #3", "Ames", 42.03, -93.61, 1.0),
        store_sale("Casey's", "Ankeny", 41.72, -93.6, 7.0),
    ];
    let request = AggregationRequest::store_level(Measure::SaleDollars);
    let result = aggregate_request(&records, &request);

    // A different coordinate makes a different store group
    assert_eq!(result.len(), 3);
    assert_eq!(result.rows[0].value, 25.5);

    let lat = result.column_index(Column::Lat).unwrap();
    assert_eq!(result.rows[0].key[lat].to_string(), "42.02");
}

#[test]
fn test_store_level_keeps_missing_coordinates_as_a_group() {
    let mut records = vec![store_sale("Hy-Vee #3", "Ames", 42.02, -93.61, 10.0)];
    records.push(
        SaleRecord::new(date("2021-03-01"))
            .with_text(Column::StoreName, "Hy-Vee #3")
            .with_text(Column::Address, "1 Main St")
            .with_text(Column::City, "Ames")
            .with_text(Column::County, "Polk")
            .with_measures(1, 2.0, 1.0),
    );

    let result = aggregate_request(&records, &AggregationRequest::store_level(Measure::SaleDollars));

    assert_eq!(result.len(), 2);
    assert_eq!(result.total(), 12.0);
}

#[test]
fn test_large_integer_sums_are_exact() {
    let records: Vec<SaleRecord> = (0..3)
        .map(|_| county_sale("Polk", 0).with_measures(3_000_000_000_000_001, 0.0, 0.0))
        .collect();
    let result = aggregate(&records, &[], Measure::BottlesSold);

    assert_eq!(result.rows[0].value, 9_000_000_000_000_003u64 as f64);
}
