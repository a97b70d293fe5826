//! Sales query engine.

pub mod aggregate;
pub mod dataset;
pub mod filter;
pub mod loader;
pub mod transform;

pub use aggregate::{aggregate, round_values, sort_by_value_desc, value_range, within_value_range};
pub use dataset::Dataset;
pub use filter::filter;
pub use loader::LoadOptions;
pub use transform::{transform, RawTable, SkipReport, Transformed};
