//! Reshape the CVAP extract into one row per congressional district.
//!
//! The extract has one row per (GEOID, LNNUMBER). Two line items are
//! kept, indexed by GEOID and joined onto the "Total" line:
//!
//! ```text
//! GEOID  LNNUMBER  TOT_EST  CVAP_EST         GEOID  cvap  bvap  bvap_pct ...
//! A      1         700      500         →    A      500   100   0.2
//! A      5         150      100              B      ...
//! B      1         ...
//! ```
//!
//! A district missing its Black line keeps its row with undefined Black
//! fields. Ratios are undefined when either side is missing or the
//! denominator is zero.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Serialize;

use crate::error::{TidyError, TidyResult};
use crate::logs::{log_info, log_success, log_warning, log_warning_indent};
use crate::models::{
    RawDemographicRecord, Table, TidyRecord, CATEGORY_BLACK, CATEGORY_TOTAL, GEOID_COLUMN,
    TIDY_COLUMNS,
};
use crate::parser::{read_records, write_table};

/// What a tidy run did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TidySummary {
    /// Rows read from the extract
    pub input_rows: usize,
    /// Rows written (one per district)
    pub geographies: usize,
    /// Districts with no Black line
    pub missing_black: usize,
    /// Districts whose Black line had no Total line (dropped)
    pub orphaned_black: usize,
    /// Districts with at least one undefined ratio
    pub undefined_ratios: usize,
}

/// `num / den`, undefined if either is missing or `den` is zero.
pub fn ratio(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    match (num, den) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// Rows of one category, keyed by GEOID.
fn index_category(
    records: &[RawDemographicRecord],
    category: u32,
) -> TidyResult<BTreeMap<&str, &RawDemographicRecord>> {
    let mut index = BTreeMap::new();
    for record in records.iter().filter(|r| r.category == category) {
        if index.insert(record.geoid.as_str(), record).is_some() {
            return Err(TidyError::DuplicateGeography {
                geoid: record.geoid.clone(),
                category,
            });
        }
    }
    Ok(index)
}

/// Join the Total and Black lines into one record per GEOID.
///
/// Output is sorted by GEOID and has exactly one row per GEOID that has
/// a Total line.
pub fn tidy_demographics(records: &[RawDemographicRecord]) -> TidyResult<Vec<TidyRecord>> {
    let totals = index_category(records, CATEGORY_TOTAL)?;
    let black = index_category(records, CATEGORY_BLACK)?;

    let tidy = totals
        .iter()
        .map(|(geoid, total)| {
            let black_line = black.get(geoid);
            let bvap = black_line.and_then(|b| b.cvap_estimate);
            let black_pop = black_line.and_then(|b| b.total_estimate);

            TidyRecord {
                geoid: geoid.to_string(),
                display_name: total.display_name.clone(),
                bvap,
                cvap: total.cvap_estimate,
                bvap_pct: ratio(bvap, total.cvap_estimate),
                black_pop,
                total_pop: total.total_estimate,
                black_pct: ratio(black_pop, total.total_estimate),
            }
        })
        .collect();

    Ok(tidy)
}

/// Build the output table, GEOID first.
pub fn to_table(records: &[TidyRecord]) -> Table {
    let headers = std::iter::once(GEOID_COLUMN)
        .chain(TIDY_COLUMNS)
        .map(str::to_string)
        .collect();

    let mut table = Table::new(headers);
    table.rows = records.iter().map(TidyRecord::to_row).collect();
    table
}

/// Write tidy records to `path`, replacing the file.
pub fn write_tidy_csv(path: &Path, records: &[TidyRecord]) -> TidyResult<()> {
    write_table(path, &to_table(records))?;
    Ok(())
}

/// Read the extract at `input`, tidy it, and write `output`.
pub fn run_tidy(input: &Path, output: &Path) -> TidyResult<TidySummary> {
    log_info(format!("📖 Reading demographic extract: {}", input.display()));
    let records: Vec<RawDemographicRecord> = read_records(input)?;
    log_success(format!("Read {} rows", records.len()));

    let tidy = tidy_demographics(&records)?;
    let summary = summarize(&records, &tidy);

    if summary.missing_black > 0 {
        log_warning(format!(
            "{} district(s) have no LNNUMBER {} line",
            summary.missing_black, CATEGORY_BLACK
        ));
        for record in tidy.iter().filter(|r| r.black_pop.is_none()).take(5) {
            log_warning_indent(record.geoid.clone(), 1);
        }
    }
    if summary.orphaned_black > 0 {
        log_warning(format!(
            "{} LNNUMBER {} line(s) have no Total line and were dropped",
            summary.orphaned_black, CATEGORY_BLACK
        ));
    }
    if summary.undefined_ratios > 0 {
        log_warning(format!(
            "{} district(s) have an undefined ratio",
            summary.undefined_ratios
        ));
    }

    write_tidy_csv(output, &tidy)?;
    log_success(format!(
        "Wrote {} districts to {}",
        summary.geographies,
        output.display()
    ));

    Ok(summary)
}

/// GEOIDs that have a line for `category`.
fn ids_for(records: &[RawDemographicRecord], category: u32) -> BTreeSet<&str> {
    records
        .iter()
        .filter(|r| r.category == category)
        .map(|r| r.geoid.as_str())
        .collect()
}

fn summarize(records: &[RawDemographicRecord], tidy: &[TidyRecord]) -> TidySummary {
    let totals = ids_for(records, CATEGORY_TOTAL);
    let black = ids_for(records, CATEGORY_BLACK);

    TidySummary {
        input_rows: records.len(),
        geographies: tidy.len(),
        missing_black: totals.difference(&black).count(),
        orphaned_black: black.difference(&totals).count(),
        undefined_ratios: tidy.iter().filter(|r| r.has_undefined_ratio()).count(),
    }
}
