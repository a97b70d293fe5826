//! Command line argument definitions.

use crate::models::config::OutputFormat;
use crate::models::criteria::{parse_date_bound, FilterCriteria, Selection};
use crate::models::record::Measure;
use crate::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Liquor Sales - Iowa liquor sales reports by store, city and county
#[derive(Parser, Debug)]
#[command(name = "liquor-sales")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the sales file (overrides the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store totals for map markers
    Map {
        #[command(flatten)]
        filters: FilterArgs,

        /// Measure: bottles_sold, sale_dollars, volume_sold_liters
        #[arg(short, long)]
        measure: Option<String>,

        /// Only show stores whose total is at least this value
        #[arg(long)]
        min: Option<f64>,

        /// Only show stores whose total is at most this value
        #[arg(long)]
        max: Option<f64>,
    },

    /// City or county totals, largest first
    Bar {
        #[command(flatten)]
        filters: FilterArgs,

        /// Measure: bottles_sold, sale_dollars, volume_sold_liters
        #[arg(short, long)]
        measure: Option<String>,

        /// X-axis: city or county
        #[arg(short, long, default_value = "city")]
        axis: String,
    },

    /// Minimum and maximum store totals (map value window bounds)
    Range {
        #[command(flatten)]
        filters: FilterArgs,

        /// Measure: bottles_sold, sale_dollars, volume_sold_liters
        #[arg(short, long)]
        measure: Option<String>,
    },

    /// Aggregate by any columns
    Query {
        #[command(flatten)]
        filters: FilterArgs,

        /// Grouping columns, comma separated (empty for a single total)
        #[arg(short, long, default_value = "")]
        group_by: String,

        /// Measure: bottles_sold, sale_dollars, volume_sold_liters
        #[arg(short, long)]
        measure: Option<String>,
    },

    /// List the values available for a filter column
    Options {
        /// Column: county, city, category_name, vendor_name, store_name, address
        #[arg(value_name = "COLUMN")]
        column: String,
    },

    /// Show what was loaded from the sales file
    Summary,
}

/// Filter flags shared by every query command.
///
/// A missing selection flag, or the value `all`, means "all values";
/// an empty one (e.g. `--county=`) selects nothing.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// First day to include (YYYY-MM-DD)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start_date: Option<String>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end_date: Option<String>,

    /// Counties to include, comma separated
    #[arg(long)]
    pub county: Option<String>,

    /// Cities to include, comma separated
    #[arg(long)]
    pub city: Option<String>,

    /// Categories to include, comma separated
    #[arg(long)]
    pub category: Option<String>,

    /// Vendors to include, comma separated
    #[arg(long)]
    pub vendor: Option<String>,
}

impl FilterArgs {
    /// Build filter criteria, validating the date bounds.
    pub fn to_criteria(&self) -> Result<FilterCriteria> {
        let start = self
            .start_date
            .as_deref()
            .map(parse_date_bound)
            .transpose()?;
        let end = self.end_date.as_deref().map(parse_date_bound).transpose()?;

        Ok(FilterCriteria::all()
            .with_dates(start, end)
            .with_county(Selection::from_list(self.county.as_deref()))
            .with_city(Selection::from_list(self.city.as_deref()))
            .with_category(Selection::from_list(self.category.as_deref()))
            .with_vendor(Selection::from_list(self.vendor.as_deref())))
    }
}

/// Resolve a measure flag, falling back to the configured default.
pub fn resolve_measure(flag: Option<&str>, default: Measure) -> Result<Measure> {
    flag.map(|name| name.parse::<Measure>())
        .transpose()
        .map(|m| m.unwrap_or(default))
}
