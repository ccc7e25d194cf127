//! Transformation module.
//!
//! - Demographic: CVAP extract to one row per district
//! - GEOID: district text to GEOID, roster rewrite
//! - Pipeline: both steps in order

pub mod demographic;
pub mod geoid;
pub mod pipeline;

pub use demographic::{ratio, run_tidy, tidy_demographics, write_tidy_csv, TidySummary};
pub use geoid::{assign_geoids, parse_geoid, run_geoid_assignment, AssignSummary};
pub use pipeline::*;
