//! CLI command implementations.

pub mod bar;
pub mod map;
pub mod options;
pub mod output;
pub mod query;
pub mod range;
pub mod summary;

use crate::core::{Dataset, LoadOptions};
use crate::models::config::DatasetConfig;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Load the dataset once, showing a spinner while it is read.
pub fn load_dataset(path: &Path, config: &DatasetConfig) -> Result<Dataset> {
    let delimiter = config.delimiter_byte()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Loading {}...", path.display()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = Dataset::load(path, &LoadOptions { delimiter });
    pb.finish_and_clear();

    result.with_context(|| format!("Failed to load dataset: {}", path.display()))
}
