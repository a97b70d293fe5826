//! Liquor Sales Library
//!
//! Filtering and aggregation of Iowa liquor sales data: load the sales
//! file once into a read-only [`core::Dataset`], then answer map and bar
//! chart queries against it.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;

pub use error::{Error, Result};
