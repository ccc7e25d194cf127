//! Derive GEOIDs from roster district text.
//!
//! The roster's `cd` column reads like `"California - 12th"`. The state
//! name before the first `-` is looked up in the FIPS table; the segment
//! after the last `-` must be a district number with an ordinal suffix.
//!
//! At-large seats (`"Alaska - At-large"`) and suffix-less numbers are
//! rejected rather than guessed at.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::Path;

use crate::error::{GeoidError, GeoidResult, PipelineResult};
use crate::fips::state_to_fips;
use crate::logs::{log_error, log_info, log_success};
use crate::models::{Geoid, Table, DISTRICT_COLUMN, GEOID_COLUMN};
use crate::parser::{read_table, write_table};

/// `<1-2 digits><st|nd|rd|th>`, case-insensitive suffix.
static ORDINAL_DISTRICT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})(?i:st|nd|rd|th)$").expect("valid district regex"));

/// What a roster run did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssignSummary {
    /// Roster rows rewritten
    pub rows: usize,
    /// Distinct GEOIDs assigned
    pub distinct_geoids: usize,
    /// True if the roster already carried a GEOID column
    pub replaced_existing: bool,
}

/// Parse `"<state> - <district><suffix>"` into a [`Geoid`].
///
/// ```
/// use cbc_tidy::parse_geoid;
///
/// assert_eq!(parse_geoid("Texas - 1st").unwrap().to_string(), "50000US4801");
/// ```
pub fn parse_geoid(text: &str) -> GeoidResult<Geoid> {
    let mut segments = text.split('-');
    // split always yields at least one segment
    let state = segments.next().unwrap_or_default().trim();
    let district = text.rsplit('-').next().unwrap_or_default().trim();

    let fips = state_to_fips(state).ok_or_else(|| GeoidError::UnknownState(state.to_string()))?;

    let malformed = || GeoidError::MalformedDistrict {
        text: text.to_string(),
        district: district.to_string(),
    };

    if segments.next().is_none() {
        return Err(malformed());
    }

    let number = ORDINAL_DISTRICT
        .captures(district)
        .and_then(|caps| caps.get(1))
        .ok_or_else(malformed)?
        .as_str()
        .parse::<u8>()
        .map_err(|_| malformed())?;

    Geoid::new(fips, number)
}

/// Compute a GEOID for every roster row and put it in a leading
/// `GEOID` column.
///
/// All rows are parsed before the table is touched, so the first failure
/// returns an error (tagged with its 1-based row) and no partial result.
pub fn assign_geoids(mut table: Table) -> GeoidResult<Table> {
    let districts = table
        .column(DISTRICT_COLUMN)
        .ok_or_else(|| GeoidError::MissingColumn(DISTRICT_COLUMN.to_string()))?;

    let geoids = districts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            parse_geoid(text)
                .map(|g| g.to_string())
                .map_err(|e| e.at_row(i + 1))
        })
        .collect::<GeoidResult<Vec<String>>>()?;

    table.set_leading_column(GEOID_COLUMN, geoids);
    Ok(table)
}

/// Read the roster at `path`, assign GEOIDs, and write it back in place.
///
/// Nothing is written when any row fails to resolve.
pub fn run_geoid_assignment(path: &Path) -> PipelineResult<AssignSummary> {
    log_info(format!("📖 Reading roster: {}", path.display()));
    let table = read_table(path)?;
    log_success(format!("Read {} rows", table.len()));

    let replaced_existing = table.column_index(GEOID_COLUMN).is_some();
    if replaced_existing {
        log_info("Roster already has a GEOID column, recomputing it");
    }

    let table = assign_geoids(table).map_err(|e| {
        log_error(e.to_string());
        e
    })?;

    let mut distinct: Vec<&str> = table
        .rows
        .iter()
        .map(|row| row[0].as_str())
        .collect();
    distinct.sort_unstable();
    distinct.dedup();

    let summary = AssignSummary {
        rows: table.len(),
        distinct_geoids: distinct.len(),
        replaced_existing,
    };

    write_table(path, &table)?;
    log_success(format!(
        "Assigned {} GEOIDs ({} distinct) to {}",
        summary.rows,
        summary.distinct_geoids,
        path.display()
    ));

    Ok(summary)
}
