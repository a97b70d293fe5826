//! Configuration model.

use super::record::Measure;
use crate::{Error, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset configuration.
    pub dataset: DatasetConfig,
    /// Query defaults.
    pub query: QueryConfig,
    /// Output configuration.
    pub display: DisplayConfig,
}

/// Dataset configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the sales file.
    pub path: PathBuf,
    /// Field delimiter.
    pub delimiter: char,
}

/// Query defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Measure used when none is given.
    pub measure: Measure,
    /// Range reported when a range query has no rows.
    pub fallback_range: [f64; 2],
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Decimal places kept by the rounding step.
    pub decimals: u32,
    /// Output format.
    pub format: OutputFormat,
}

/// How query results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Simple,
    Json,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data").join("Iowa_liquor_sales_2021_minimal_with_type.csv"),
            delimiter: ',',
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            measure: Measure::SaleDollars,
            fallback_range: [0.0, 0.0],
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            decimals: 2,
            format: OutputFormat::Table,
        }
    }
}

impl DatasetConfig {
    /// Delimiter as a single byte. Only ASCII delimiters are supported.
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                Error::other(format!(
                    "Delimiter '{}' must be a single ASCII character",
                    self.delimiter
                ))
            })
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("liquor_sales")
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs_config_path().join("config.toml")
}

/// Load configuration from the default location.
pub fn load_config() -> Config {
    load_config_from(&default_config_path())
}

/// Read and parse a configuration file.
pub fn read_config(config_path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(config_path)?;
    Ok(toml::from_str(&content)?)
}

/// Load configuration from a file, falling back to defaults.
pub fn load_config_from(config_path: &Path) -> Config {
    if !config_path.exists() {
        return Config::default();
    }

    match read_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring config {}: {}", config_path.display(), e);
            Config::default()
        }
    }
}
