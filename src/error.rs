//! Error types for the liquor sales engine.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the liquor sales engine.
#[derive(Error, Debug)]
pub enum Error {
    // Load errors
    #[error("Dataset is missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Row {line}: invalid {column}: {reason}")]
    Parse {
        line: u64,
        column: String,
        reason: String,
    },

    #[error("Dataset not found: {0}")]
    PathNotFound(String),

    // Query errors
    #[error("Query produced no rows: {0}")]
    EmptyResult(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // CSV errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Config errors
    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Create a schema error from the names of the missing columns.
    pub fn schema<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Error::Schema {
            missing: missing.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an invalid filter error.
    pub fn invalid_filter<S: Into<String>>(msg: S) -> Self {
        Error::InvalidFilter(msg.into())
    }
}
