//! Run both pipelines in their fixed order.
//!
//! # Example
//!
//! ```rust,ignore
//! use cbc_tidy::{run_all, PipelineOptions};
//!
//! let report = run_all(&PipelineOptions::default())?;
//! println!("{} districts, {} roster rows", report.tidy.geographies, report.roster.rows);
//! ```

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::demographic::{run_tidy, TidySummary};
use super::geoid::{run_geoid_assignment, AssignSummary};
use crate::error::PipelineResult;
use crate::logs::{log_info, LOGGER};

/// Default location of the raw CVAP extract.
pub const DEFAULT_DEMOGRAPHIC_INPUT: &str = "./raw/CD.csv";

/// Default location of the tidy output.
pub const DEFAULT_DEMOGRAPHIC_OUTPUT: &str = "./cvap.csv";

/// Default roster location (read and rewritten in place).
pub const DEFAULT_ROSTER: &str = "./cbc.csv";

/// File locations for a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOptions {
    /// Raw CVAP extract
    pub demographic_input: PathBuf,
    /// Tidy output, replaced on every run
    pub demographic_output: PathBuf,
    /// Roster, rewritten with a GEOID column
    pub roster: PathBuf,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            demographic_input: PathBuf::from(DEFAULT_DEMOGRAPHIC_INPUT),
            demographic_output: PathBuf::from(DEFAULT_DEMOGRAPHIC_OUTPUT),
            roster: PathBuf::from(DEFAULT_ROSTER),
        }
    }
}

/// Outcome of a full run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub options: PipelineOptions,
    pub tidy: TidySummary,
    pub roster: AssignSummary,
    pub warnings: usize,
}

impl PipelineReport {
    /// Write the report as pretty JSON.
    pub fn save(&self, path: &Path) -> PipelineResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Demographic tidy, then roster GEOID assignment.
///
/// Stops at the first failure. A roster failure leaves the roster file
/// untouched, though the tidy output has already been replaced.
pub fn run_all(options: &PipelineOptions) -> PipelineResult<PipelineReport> {
    let warnings_before = LOGGER.warning_count();

    log_info("📊 Step 1/2: demographic tidy");
    let tidy = run_tidy(&options.demographic_input, &options.demographic_output)?;

    log_info("🗺️  Step 2/2: roster GEOID assignment");
    let roster = run_geoid_assignment(&options.roster)?;

    Ok(PipelineReport {
        options: options.clone(),
        tidy,
        roster,
        warnings: LOGGER.warning_count().saturating_sub(warnings_before),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    const EXTRACT: &str = "GEONAME,LNTITLE,GEOID,LNNUMBER,TOT_EST,TOT_MOE,CVAP_EST,CVAP_MOE\n\
        \"Congressional District 12, California\",Total,5001800US0612,1,760000,0,520000,0\n\
        \"Congressional District 12, California\",Black or African American Alone,5001800US0612,5,114000,0,91000,0\n";

    const ROSTER: &str = "name,cd\nB. Lee,California - 12th\n";

    fn options_in(dir: &Path) -> PipelineOptions {
        PipelineOptions {
            demographic_input: dir.join("raw").join("CD.csv"),
            demographic_output: dir.join("cvap.csv"),
            roster: dir.join("cbc.csv"),
        }
    }

    fn seed(options: &PipelineOptions, roster: &str) {
        fs::create_dir_all(options.demographic_input.parent().unwrap()).unwrap();
        fs::write(&options.demographic_input, EXTRACT).unwrap();
        fs::write(&options.roster, roster).unwrap();
    }

    #[test]
    fn test_default_options() {
        let opts = PipelineOptions::default();
        assert_eq!(opts.demographic_input, PathBuf::from("./raw/CD.csv"));
        assert_eq!(opts.demographic_output, PathBuf::from("./cvap.csv"));
        assert_eq!(opts.roster, PathBuf::from("./cbc.csv"));
    }

    #[test]
    fn test_run_all() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_in(dir.path());
        seed(&options, ROSTER);

        let report = run_all(&options).unwrap();

        assert_eq!(report.tidy.geographies, 1);
        assert_eq!(report.roster.rows, 1);
        let roster = fs::read_to_string(&options.roster).unwrap();
        assert!(roster.starts_with("GEOID,name,cd\n50000US0612,"));
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_in(dir.path());
        seed(&options, ROSTER);

        run_all(&options).unwrap();
        let tidy_first = fs::read(&options.demographic_output).unwrap();
        let roster_first = fs::read(&options.roster).unwrap();

        run_all(&options).unwrap();

        assert_eq!(fs::read(&options.demographic_output).unwrap(), tidy_first);
        assert_eq!(fs::read(&options.roster).unwrap(), roster_first);
    }

    #[test]
    fn test_unknown_state_aborts_roster() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_in(dir.path());
        let roster = "name,cd\nX,Puerto Rico - 1st\n";
        seed(&options, roster);

        let err = run_all(&options).unwrap_err();

        assert!(matches!(err, PipelineError::Geoid(_)));
        assert_eq!(fs::read_to_string(&options.roster).unwrap(), roster);
    }

    #[test]
    fn test_missing_extract_stops_before_roster() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_in(dir.path());
        fs::write(&options.roster, ROSTER).unwrap();

        let err = run_all(&options).unwrap_err();

        assert!(err.to_string().contains("not found"));
        assert_eq!(fs::read_to_string(&options.roster).unwrap(), ROSTER);
        assert!(!options.demographic_output.exists());
    }

    #[test]
    fn test_report_serializes() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_in(dir.path());
        seed(&options, ROSTER);

        let report = run_all(&options).unwrap();
        let path = dir.path().join("report.json");
        report.save(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["tidy"]["geographies"], 1);
        assert_eq!(json["roster"]["distinct_geoids"], 1);
    }
}
