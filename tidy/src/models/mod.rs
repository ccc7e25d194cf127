//! Domain models shared by both pipelines.
//!
//! - [`RawDemographicRecord`] - one row of the CVAP extract
//! - [`TidyRecord`] - one reshaped row per district
//! - [`Geoid`] - congressional district identifier
//! - [`Table`] - ordered string table used for the roster

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GeoidError;
use crate::fips;

// =============================================================================
// Column names and category codes
// =============================================================================

/// Geography identifier column, in both input and output files.
pub const GEOID_COLUMN: &str = "GEOID";

/// Free-text district column in the roster.
pub const DISTRICT_COLUMN: &str = "cd";

/// `LNNUMBER` for the "Total" line.
pub const CATEGORY_TOTAL: u32 = 1;

/// `LNNUMBER` for the "Black or African American Alone" line.
pub const CATEGORY_BLACK: u32 = 5;

/// Column order of the tidy output (after the GEOID index).
pub const TIDY_COLUMNS: [&str; 7] = [
    "display_name",
    "bvap",
    "cvap",
    "bvap_pct",
    "black_pop",
    "total_pop",
    "black_pct",
];

// =============================================================================
// Demographic records
// =============================================================================

/// One row of the raw extract: a (geography, category) pair.
///
/// Columns not listed here (`LNTITLE`, `TOT_MOE`, `CVAP_MOE`, ...) are
/// ignored. Empty estimates deserialize to `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDemographicRecord {
    #[serde(rename = "GEONAME")]
    pub display_name: String,
    #[serde(rename = "GEOID")]
    pub geoid: String,
    #[serde(rename = "LNNUMBER")]
    pub category: u32,
    #[serde(rename = "TOT_EST")]
    pub total_estimate: Option<f64>,
    #[serde(rename = "CVAP_EST")]
    pub cvap_estimate: Option<f64>,
}

/// One reshaped row per district. `None` means undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TidyRecord {
    pub geoid: String,
    pub display_name: String,
    pub bvap: Option<f64>,
    pub cvap: Option<f64>,
    pub bvap_pct: Option<f64>,
    pub black_pop: Option<f64>,
    pub total_pop: Option<f64>,
    pub black_pct: Option<f64>,
}

impl TidyRecord {
    /// Cells in output order, GEOID first.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.geoid.clone(),
            self.display_name.clone(),
            format_count(self.bvap),
            format_count(self.cvap),
            format_ratio(self.bvap_pct),
            format_count(self.black_pop),
            format_count(self.total_pop),
            format_ratio(self.black_pct),
        ]
    }

    /// True when either ratio is undefined.
    pub fn has_undefined_ratio(&self) -> bool {
        self.bvap_pct.is_none() || self.black_pct.is_none()
    }
}

/// Whole-number estimates print without a fractional part.
fn format_count(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

fn format_ratio(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// =============================================================================
// GEOID
// =============================================================================

/// Summary level prefix for congressional districts.
pub const GEOID_PREFIX: &str = "50000US";

/// Congressional district identifier: `50000US` + state FIPS + district.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct Geoid {
    state_fips: &'static str,
    district: u8,
}

impl Geoid {
    /// Build from a known FIPS code and a district number below 100.
    pub fn new(state_fips: &str, district: u8) -> Result<Self, GeoidError> {
        let (code, _) = fips::states()
            .find(|(code, _)| *code == state_fips)
            .ok_or_else(|| GeoidError::UnknownState(state_fips.to_string()))?;
        if district > 99 {
            return Err(GeoidError::MalformedDistrict {
                text: state_fips.to_string(),
                district: district.to_string(),
            });
        }
        Ok(Self {
            state_fips: code,
            district,
        })
    }

    pub fn state_fips(&self) -> &'static str {
        self.state_fips
    }

    pub fn district(&self) -> u8 {
        self.district
    }

    pub fn state_name(&self) -> &'static str {
        fips::fips_to_state(self.state_fips).unwrap_or_default()
    }
}

impl fmt::Display for Geoid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{:02}", GEOID_PREFIX, self.state_fips, self.district)
    }
}

impl From<Geoid> for String {
    fn from(geoid: Geoid) -> Self {
        geoid.to_string()
    }
}

impl FromStr for Geoid {
    type Err = GeoidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || GeoidError::MalformedDistrict {
            text: s.to_string(),
            district: s.get(GEOID_PREFIX.len() + 2..).unwrap_or_default().to_string(),
        };

        let rest = s.strip_prefix(GEOID_PREFIX).ok_or_else(malformed)?;
        if rest.len() != 4 || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let district: u8 = rest[2..].parse().map_err(|_| malformed())?;
        Geoid::new(&rest[..2], district)
    }
}

// =============================================================================
// Table
// =============================================================================

/// Ordered string table: header row plus data rows of the same width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Index of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Values of a column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    /// Put `values` in a column named `name` at position 0.
    ///
    /// An existing column of that name is removed first, so repeated
    /// calls leave the table shape unchanged.
    pub fn set_leading_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());

        if let Some(idx) = self.column_index(name) {
            self.headers.remove(idx);
            for row in &mut self.rows {
                if idx < row.len() {
                    row.remove(idx);
                }
            }
        }

        self.headers.insert(0, name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(0, value);
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geoid_display_pads_district() {
        let geoid = Geoid::new("48", 1).unwrap();
        assert_eq!(geoid.to_string(), "50000US4801");
        assert_eq!(geoid.state_name(), "Texas");
    }

    #[test]
    fn test_geoid_from_str() {
        let geoid: Geoid = "50000US0612".parse().unwrap();
        assert_eq!(geoid.state_fips(), "06");
        assert_eq!(geoid.district(), 12);
        assert_eq!(geoid.to_string(), "50000US0612");
    }

    #[test]
    fn test_geoid_from_str_rejects_bad_shape() {
        assert!("50000US061".parse::<Geoid>().is_err());
        assert!("5001800US0612".parse::<Geoid>().is_err());
        assert!("50000USAB12".parse::<Geoid>().is_err());
    }

    #[test]
    fn test_geoid_unknown_fips() {
        let err = Geoid::new("03", 1).unwrap_err();
        assert_eq!(err, GeoidError::UnknownState("03".into()));
    }

    #[test]
    fn test_geoid_serializes_as_string() {
        let geoid = Geoid::new("39", 3).unwrap();
        assert_eq!(serde_json::to_value(geoid).unwrap(), "50000US3903");
    }

    #[test]
    fn test_tidy_row_formatting() {
        let record = TidyRecord {
            geoid: "5001800US0101".into(),
            display_name: "District 1, Alabama".into(),
            bvap: Some(100.0),
            cvap: Some(400.0),
            bvap_pct: Some(0.25),
            black_pop: None,
            total_pop: Some(0.0),
            black_pct: None,
        };
        assert_eq!(
            record.to_row(),
            vec!["5001800US0101", "District 1, Alabama", "100", "400", "0.25", "", "0", ""]
        );
        assert!(record.has_undefined_ratio());
    }

    #[test]
    fn test_set_leading_column_replaces_existing() {
        let mut table = Table::new(vec!["name".into(), "GEOID".into(), "cd".into()]);
        table.rows.push(vec!["A".into(), "old".into(), "Texas - 1st".into()]);

        table.set_leading_column("GEOID", vec!["new".into()]);

        assert_eq!(table.headers, vec!["GEOID", "name", "cd"]);
        assert_eq!(table.rows[0], vec!["new", "A", "Texas - 1st"]);
    }

    #[test]
    fn test_column_values() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        table.rows.push(vec!["1".into(), "2".into()]);
        table.rows.push(vec!["3".into()]);
        assert_eq!(table.column("b"), Some(vec!["2", ""]));
        assert_eq!(table.column("c"), None);
    }
}
