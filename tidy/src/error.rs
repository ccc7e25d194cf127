//! Error types for the cbc-tidy pipelines.
//!
//! One enum per concern, converted upward with `#[from]` so `?` works
//! across module boundaries:
//!
//! - [`CsvError`] - reading, decoding and writing CSV files
//! - [`GeoidError`] - district text parsing and state lookup
//! - [`TidyError`] - demographic reshaping
//! - [`PipelineError`] - top-level orchestration
//!
//! Missing demographic categories and zero denominators are not errors;
//! they surface as undefined values in the output.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading or writing CSV files.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Failed to read or write a file.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content could not be decoded.
    #[error("Failed to decode content as {0}")]
    Encoding(String),

    /// Malformed CSV content or a field that does not deserialize.
    #[error("Invalid CSV at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// File has no header row.
    #[error("CSV file is empty")]
    EmptyFile,

    /// A required column is absent from the header row.
    #[error("Missing column: {0}")]
    MissingColumn(String),
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        CsvError::Parse {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// GEOID Errors
// =============================================================================

/// Errors while deriving a GEOID from a roster district field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeoidError {
    /// State name is not in the FIPS table.
    #[error("Unknown state name: '{0}'")]
    UnknownState(String),

    /// District segment is not `<number><ordinal suffix>`.
    #[error("Malformed district '{district}' in '{text}'")]
    MalformedDistrict { text: String, district: String },

    /// Roster has no district column.
    #[error("Roster is missing the '{0}' column")]
    MissingColumn(String),

    /// Failure on a specific roster row (1-based, header excluded).
    #[error("Row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<GeoidError>,
    },
}

impl GeoidError {
    /// Attach the roster row number to an error.
    pub fn at_row(self, row: usize) -> Self {
        GeoidError::Row {
            row,
            source: Box::new(self),
        }
    }

    /// The underlying error, without row context.
    pub fn root(&self) -> &GeoidError {
        match self {
            GeoidError::Row { source, .. } => source.root(),
            other => other,
        }
    }
}

// =============================================================================
// Demographic Errors
// =============================================================================

/// Errors while tidying the demographic extract.
#[derive(Debug, Error)]
pub enum TidyError {
    /// The same geography appears twice for one category.
    #[error("Duplicate rows for GEOID {geoid} (LNNUMBER {category})")]
    DuplicateGeography { geoid: String, category: u32 },

    /// Reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level error returned by [`crate::transform::pipeline::run_all`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// GEOID assignment error.
    #[error("GEOID error: {0}")]
    Geoid(#[from] GeoidError),

    /// Demographic tidy error.
    #[error("Tidy error: {0}")]
    Tidy(#[from] TidyError),

    /// Report serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for GEOID operations.
pub type GeoidResult<T> = Result<T, GeoidError>;

/// Result type for demographic operations.
pub type TidyResult<T> = Result<T, TidyError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
