//! Dataset file loading.
//!
//! Reads a delimited file with a header row into a [`RawTable`] and hands
//! it to [`transform`].

use super::transform::{transform, RawRow, RawTable, Transformed};
use crate::Result;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Options for reading the dataset file.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Read raw rows from any reader.
///
/// Rows that cannot be decoded (wrong field count, invalid UTF-8) are
/// counted in `RawTable::unreadable` instead of failing the read. I/O
/// failures and an unreadable header abort.
pub fn read_raw<R: Read>(reader: R, options: &LoadOptions) -> Result<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let mut table = RawTable::new(headers);

    for (index, result) in csv_reader.records().enumerate() {
        match result {
            Ok(record) => {
                let line = record
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(index as u64 + 2);
                table.rows.push(RawRow {
                    line,
                    values: record.iter().map(|v| v.to_string()).collect(),
                });
            }
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                tracing::debug!("Unreadable row: {}", e);
                table.unreadable += 1;
            }
        }
    }

    tracing::debug!(
        "Read {} rows ({} unreadable) with {} columns",
        table.rows.len(),
        table.unreadable,
        table.headers.len()
    );

    Ok(table)
}

/// Read raw rows from a file.
pub fn read_raw_file(path: &Path, options: &LoadOptions) -> Result<RawTable> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }

    let file = File::open(path)?;
    read_raw(file, options)
}

/// Read and transform a dataset file.
pub fn load(path: &Path, options: &LoadOptions) -> Result<Transformed> {
    tracing::info!("Loading dataset: {}", path.display());
    let raw = read_raw_file(path, options)?;
    transform(&raw)
}
