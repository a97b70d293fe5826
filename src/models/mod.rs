//! Data models.

pub mod aggregate;
pub mod config;
pub mod criteria;
pub mod record;

pub use aggregate::{AggregatedResult, AggregatedRow, AggregationRequest, Axis, GroupValue};
pub use criteria::{FilterCriteria, Restriction, Selection};
pub use record::{Column, Measure, SaleRecord};
