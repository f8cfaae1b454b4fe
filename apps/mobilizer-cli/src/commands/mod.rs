//! CLI command implementations
//!
//! Each command renders its output to a `String`; `main` prints it.

pub mod check_duplicates;
pub mod check_scope;
pub mod seed;
pub mod user_roles;

use std::path::Path;

use clap::ValueEnum;
use mobilizer_locations::{read_csv_records, read_tuple_bytes, RawRecord};

use crate::error::{CliError, CliResult};

/// Layout of a delimitation input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// `(country, state, lga, ward, 'delimitation'),` lines
    Tuple,
    /// CSV with a header row naming the five columns
    Csv,
}

impl InputFormat {
    /// Guess from the file extension: `.csv` is CSV, anything else tuples.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Tuple,
        }
    }
}

/// Read raw delimitation records from `path`.
pub fn load_records(path: &Path, format: Option<InputFormat>) -> CliResult<Vec<RawRecord>> {
    let format = format.unwrap_or_else(|| InputFormat::detect(path));
    let data = std::fs::read(path)
        .map_err(|e| CliError::Io(format!("Failed to read {}: {e}", path.display())))?;

    let records = match format {
        InputFormat::Csv => read_csv_records(&data)?,
        InputFormat::Tuple => read_tuple_bytes(&data),
    };

    tracing::debug!(
        path = %path.display(),
        format = ?format,
        records = records.len(),
        "Loaded delimitation records"
    );
    Ok(records)
}
