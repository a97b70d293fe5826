//! Sale record data model.

use super::aggregate::{Coordinate, GroupValue};
use crate::Error;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One row of the dataset after transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Invoice date.
    pub date: NaiveDate,
    /// Store name.
    pub store_name: Option<String>,
    /// Store street address.
    pub address: Option<String>,
    /// City the store is in.
    pub city: Option<String>,
    /// County the store is in.
    pub county: Option<String>,
    /// Liquor category (e.g., "American Vodkas").
    pub category_name: Option<String>,
    /// Vendor name.
    pub vendor_name: Option<String>,
    /// Store latitude.
    pub lat: Option<f64>,
    /// Store longitude.
    pub lon: Option<f64>,
    /// Number of bottles sold.
    pub bottles_sold: u64,
    /// Sale amount in dollars.
    pub sale_dollars: f64,
    /// Volume sold in litres.
    pub volume_sold_liters: f64,
}

impl SaleRecord {
    /// Create a record with only the date set.
    ///
    /// Every other field starts out missing or zero; the builder methods
    /// below fill them in.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            store_name: None,
            address: None,
            city: None,
            county: None,
            category_name: None,
            vendor_name: None,
            lat: None,
            lon: None,
            bottles_sold: 0,
            sale_dollars: 0.0,
            volume_sold_liters: 0.0,
        }
    }

    /// Set a text column. Non-text columns are left untouched.
    pub fn with_text(mut self, column: Column, value: &str) -> Self {
        let value = Some(value.to_string());
        match column {
            Column::StoreName => self.store_name = value,
            Column::Address => self.address = value,
            Column::City => self.city = value,
            Column::County => self.county = value,
            Column::CategoryName => self.category_name = value,
            Column::VendorName => self.vendor_name = value,
            Column::Date | Column::Lat | Column::Lon => {}
        }
        self
    }

    /// Set the store coordinates.
    pub fn with_coordinates(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    /// Set all three measures.
    pub fn with_measures(mut self, bottles_sold: u64, sale_dollars: f64, volume: f64) -> Self {
        self.bottles_sold = bottles_sold;
        self.sale_dollars = sale_dollars;
        self.volume_sold_liters = volume;
        self
    }

    /// Value of a text column, `None` when missing or when the column is not text.
    pub fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::StoreName => self.store_name.as_deref(),
            Column::Address => self.address.as_deref(),
            Column::City => self.city.as_deref(),
            Column::County => self.county.as_deref(),
            Column::CategoryName => self.category_name.as_deref(),
            Column::VendorName => self.vendor_name.as_deref(),
            Column::Date | Column::Lat | Column::Lon => None,
        }
    }

    /// Value of any column as a grouping value.
    pub fn group_value(&self, column: Column) -> GroupValue {
        match column {
            Column::Date => GroupValue::Date(self.date),
            Column::Lat => self.lat.map(Coordinate).map_or(GroupValue::Null, GroupValue::Number),
            Column::Lon => self.lon.map(Coordinate).map_or(GroupValue::Null, GroupValue::Number),
            text => self
                .text(text)
                .map_or(GroupValue::Null, |s| GroupValue::Text(s.to_string())),
        }
    }

    /// Value of a measure as a float.
    pub fn measure(&self, measure: Measure) -> f64 {
        match measure {
            Measure::BottlesSold => self.bottles_sold as f64,
            Measure::SaleDollars => self.sale_dollars,
            Measure::VolumeSoldLiters => self.volume_sold_liters,
        }
    }

    /// Whether both latitude and longitude are present.
    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

/// A non-measure column of the sale record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Date,
    StoreName,
    Address,
    City,
    County,
    CategoryName,
    VendorName,
    Lat,
    Lon,
}

impl Column {
    /// Every groupable column, in record order.
    pub const ALL: [Column; 9] = [
        Column::Date,
        Column::StoreName,
        Column::Address,
        Column::City,
        Column::County,
        Column::CategoryName,
        Column::VendorName,
        Column::Lat,
        Column::Lon,
    ];

    /// Column name as used in result tables and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Date => "date",
            Column::StoreName => "store_name",
            Column::Address => "address",
            Column::City => "city",
            Column::County => "county",
            Column::CategoryName => "category_name",
            Column::VendorName => "vendor_name",
            Column::Lat => "lat",
            Column::Lon => "lon",
        }
    }

    /// Whether the column holds free text.
    pub fn is_text(&self) -> bool {
        !matches!(self, Column::Date | Column::Lat | Column::Lon)
    }

    /// Whether the column can carry a categorical filter restriction.
    pub fn is_filterable(&self) -> bool {
        matches!(
            self,
            Column::County | Column::City | Column::CategoryName | Column::VendorName
        )
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Column {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == name)
            .ok_or_else(|| {
                if Measure::from_str(name).is_ok() {
                    Error::invalid_filter(format!("'{}' is a measure, not a grouping column", name))
                } else {
                    Error::invalid_filter(format!("unknown column '{}'", name))
                }
            })
    }
}

/// The numeric quantity being summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    BottlesSold,
    SaleDollars,
    VolumeSoldLiters,
}

impl Measure {
    pub const ALL: [Measure; 3] = [
        Measure::BottlesSold,
        Measure::SaleDollars,
        Measure::VolumeSoldLiters,
    ];

    /// Measure name as used in result tables and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Measure::BottlesSold => "bottles_sold",
            Measure::SaleDollars => "sale_dollars",
            Measure::VolumeSoldLiters => "volume_sold_liters",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Measure::BottlesSold => "Bottles sold",
            Measure::SaleDollars => "Sale ($)",
            Measure::VolumeSoldLiters => "Volume sold (in litres)",
        }
    }

    /// Whether the measure is a whole-number count.
    pub fn is_integer(&self) -> bool {
        matches!(self, Measure::BottlesSold)
    }
}

impl std::fmt::Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Measure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Measure::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| Error::invalid_filter(format!("unknown measure '{}'", name)))
    }
}
