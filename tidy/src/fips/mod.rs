//! State ↔ FIPS code lookup.
//!
//! The 50 states plus the District of Columbia, keyed by their 2-digit
//! FIPS code. Both directions are built once from [`FIPS_STATES`] and
//! never mutated; the name index is a pure inversion of the code index.

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};

/// FIPS code → state name, in FIPS order.
pub const FIPS_STATES: [(&str, &str); 51] = [
    ("01", "Alabama"),
    ("02", "Alaska"),
    ("04", "Arizona"),
    ("05", "Arkansas"),
    ("06", "California"),
    ("08", "Colorado"),
    ("09", "Connecticut"),
    ("10", "Delaware"),
    ("11", "District of Columbia"),
    ("12", "Florida"),
    ("13", "Georgia"),
    ("15", "Hawaii"),
    ("16", "Idaho"),
    ("17", "Illinois"),
    ("18", "Indiana"),
    ("19", "Iowa"),
    ("20", "Kansas"),
    ("21", "Kentucky"),
    ("22", "Louisiana"),
    ("23", "Maine"),
    ("24", "Maryland"),
    ("25", "Massachusetts"),
    ("26", "Michigan"),
    ("27", "Minnesota"),
    ("28", "Mississippi"),
    ("29", "Missouri"),
    ("30", "Montana"),
    ("31", "Nebraska"),
    ("32", "Nevada"),
    ("33", "New Hampshire"),
    ("34", "New Jersey"),
    ("35", "New Mexico"),
    ("36", "New York"),
    ("37", "North Carolina"),
    ("38", "North Dakota"),
    ("39", "Ohio"),
    ("40", "Oklahoma"),
    ("41", "Oregon"),
    ("42", "Pennsylvania"),
    ("44", "Rhode Island"),
    ("45", "South Carolina"),
    ("46", "South Dakota"),
    ("47", "Tennessee"),
    ("48", "Texas"),
    ("49", "Utah"),
    ("50", "Vermont"),
    ("51", "Virginia"),
    ("53", "Washington"),
    ("54", "West Virginia"),
    ("55", "Wisconsin"),
    ("56", "Wyoming"),
];

static FIPS_TO_STATE: Lazy<BTreeMap<&'static str, &'static str>> =
    Lazy::new(|| FIPS_STATES.iter().copied().collect());

static STATE_TO_FIPS: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| invert(&FIPS_TO_STATE));

/// Swap keys and values.
fn invert<'a>(forward: &BTreeMap<&'a str, &'a str>) -> HashMap<&'a str, &'a str> {
    forward.iter().map(|(code, name)| (*name, *code)).collect()
}

/// FIPS code for an exact state name (`"Texas"` → `"48"`).
pub fn state_to_fips(name: &str) -> Option<&'static str> {
    STATE_TO_FIPS.get(name).copied()
}

/// State name for a FIPS code (`"48"` → `"Texas"`).
pub fn fips_to_state(code: &str) -> Option<&'static str> {
    FIPS_TO_STATE.get(code).copied()
}

/// All `(code, name)` pairs in FIPS order.
pub fn states() -> impl Iterator<Item = (&'static str, &'static str)> {
    FIPS_TO_STATE.iter().map(|(code, name)| (*code, *name))
}
