//! # cbc-tidy - Census CVAP district tidy and roster GEOID assignment
//!
//! Two batch steps, run in this order:
//!
//! 1. **Demographic tidy**: the Census CVAP congressional district
//!    extract (one row per district and line item) becomes one row per
//!    district with Black and total CVAP/population counts and shares.
//! 2. **Roster GEOID assignment**: each roster row's `cd` text
//!    (`"Texas - 18th"`) is turned into a GEOID (`50000US4818`) and the
//!    roster is rewritten with a leading `GEOID` column.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  raw/CD.csv │────▶│    Tidy     │────▶│  cvap.csv   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   cbc.csv   │────▶│ FIPS lookup │────▶│   cbc.csv   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per concern
//! - [`models`] - Records, [`Geoid`], [`Table`]
//! - [`fips`] - State name ↔ FIPS code table
//! - [`parser`] - CSV I/O with encoding detection
//! - [`transform`] - Tidy, GEOID assignment, pipeline
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Lookup data
pub mod fips;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, GeoidError, PipelineError, TidyError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Geoid, RawDemographicRecord, Table, TidyRecord};

// =============================================================================
// Re-exports - Lookup
// =============================================================================

pub use fips::{fips_to_state, state_to_fips};

// =============================================================================
// Re-exports - CSV
// =============================================================================

pub use parser::{read_records, read_table, write_table};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    assign_geoids, parse_geoid, ratio, run_all, run_geoid_assignment, run_tidy,
    tidy_demographics, write_tidy_csv, AssignSummary, PipelineOptions, PipelineReport,
    TidySummary,
};
