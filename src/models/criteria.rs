//! Filter criteria model.

use super::record::{Column, SaleRecord};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Allowed values for one categorical column.
///
/// `All` places no restriction. `Only` with an empty set selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl Selection {
    /// Selection of the given values.
    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Only(values.into_iter().map(Into::into).collect())
    }

    /// Selection that matches nothing.
    pub fn none() -> Self {
        Selection::Only(BTreeSet::new())
    }

    /// Parse a comma-separated list.
    ///
    /// `None` or the single word `all` (any case) means no restriction.
    /// An empty or blank string selects nothing.
    pub fn from_list(list: Option<&str>) -> Self {
        match list {
            None => Selection::All,
            Some(list) if list.trim().eq_ignore_ascii_case("all") => Selection::All,
            Some(list) => Selection::only(
                list.split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty()),
            ),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Whether a record value passes. Missing values only pass `All`.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(allowed) => value.is_some_and(|v| allowed.contains(v)),
        }
    }
}

/// A single restriction. Restrictions are independent AND conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restriction {
    /// Inclusive date bounds; a missing bound is open.
    DateRange {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    /// Allowed values for a filterable text column.
    Categorical { column: Column, selection: Selection },
}

impl Restriction {
    /// Build a categorical restriction, rejecting columns that cannot be filtered.
    pub fn categorical(column: Column, selection: Selection) -> Result<Self> {
        if !column.is_filterable() {
            return Err(Error::invalid_filter(format!(
                "column '{}' cannot be used as a filter",
                column
            )));
        }
        Ok(Restriction::Categorical { column, selection })
    }

    /// Whether a record satisfies this restriction.
    pub fn matches(&self, record: &SaleRecord) -> bool {
        match self {
            Restriction::DateRange { start, end } => {
                start.map_or(true, |s| record.date >= s) && end.map_or(true, |e| record.date <= e)
            }
            Restriction::Categorical { column, selection } => {
                selection.matches(record.text(*column))
            }
        }
    }
}

/// User-chosen restrictions narrowing which records take part in a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Inclusive lower date bound.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub county: Selection,
    #[serde(default)]
    pub city: Selection,
    #[serde(default)]
    pub category_name: Selection,
    #[serde(default)]
    pub vendor_name: Selection,
}

impl FilterCriteria {
    /// Criteria that match every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_county(mut self, selection: Selection) -> Self {
        self.county = selection;
        self
    }

    pub fn with_city(mut self, selection: Selection) -> Self {
        self.city = selection;
        self
    }

    pub fn with_category(mut self, selection: Selection) -> Self {
        self.category_name = selection;
        self
    }

    pub fn with_vendor(mut self, selection: Selection) -> Self {
        self.vendor_name = selection;
        self
    }

    /// Set the selection for a filterable column by name.
    pub fn with_selection(self, column: Column, selection: Selection) -> Result<Self> {
        match column {
            Column::County => Ok(self.with_county(selection)),
            Column::City => Ok(self.with_city(selection)),
            Column::CategoryName => Ok(self.with_category(selection)),
            Column::VendorName => Ok(self.with_vendor(selection)),
            other => Err(Error::invalid_filter(format!(
                "column '{}' cannot be used as a filter",
                other
            ))),
        }
    }

    /// The active restrictions: the date range first, then each
    /// categorical column that is not `All`.
    pub fn restrictions(&self) -> Vec<Restriction> {
        let mut restrictions = Vec::new();

        if self.start_date.is_some() || self.end_date.is_some() {
            restrictions.push(Restriction::DateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }

        let categorical = [
            (Column::County, &self.county),
            (Column::City, &self.city),
            (Column::CategoryName, &self.category_name),
            (Column::VendorName, &self.vendor_name),
        ];
        for (column, selection) in categorical {
            if !selection.is_all() {
                restrictions.push(Restriction::Categorical {
                    column,
                    selection: selection.clone(),
                });
            }
        }

        restrictions
    }

    /// Whether no restriction is active.
    pub fn is_unrestricted(&self) -> bool {
        self.restrictions().is_empty()
    }
}

/// Parse a `YYYY-MM-DD` date bound.
pub fn parse_date_bound(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        Error::invalid_filter(format!(
            "date '{}' is not in YYYY-MM-DD format ({})",
            value, e
        ))
    })
}
