//! cbc-tidy CLI
//!
//! ```bash
//! cbc-tidy                           # tidy raw/CD.csv, then assign GEOIDs in cbc.csv
//! cbc-tidy run --report report.json  # same, with explicit paths and a JSON report
//! cbc-tidy tidy                      # demographic tidy only
//! cbc-tidy assign                    # roster GEOID assignment only
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! cbc-tidy geoid "Texas - 18th"      # parse one district string
//! cbc-tidy states                    # print the FIPS table
//! ```
//!
//! Paths can also come from `CBC_TIDY_*` environment variables or a
//! `.env` file.

use cbc_tidy::logs::{log_success, LogFormat, LOGGER};
use cbc_tidy::transform::pipeline::{
    DEFAULT_DEMOGRAPHIC_INPUT, DEFAULT_DEMOGRAPHIC_OUTPUT, DEFAULT_ROSTER,
};
use cbc_tidy::{
    fips, parse_geoid, run_all, run_geoid_assignment, run_tidy, PipelineOptions,
};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cbc-tidy")]
#[command(about = "Tidy Census CVAP district data and assign GEOIDs to a caucus roster", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Progress output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,
}

#[derive(Args, Clone)]
struct DemographicPaths {
    /// Raw CVAP extract
    #[arg(long, env = "CBC_TIDY_DEMOGRAPHIC_INPUT", default_value = DEFAULT_DEMOGRAPHIC_INPUT)]
    demographic_input: PathBuf,

    /// Tidy output file (replaced)
    #[arg(long, env = "CBC_TIDY_DEMOGRAPHIC_OUTPUT", default_value = DEFAULT_DEMOGRAPHIC_OUTPUT)]
    demographic_output: PathBuf,
}

#[derive(Args, Clone)]
struct RosterPath {
    /// Roster file (rewritten in place)
    #[arg(long, env = "CBC_TIDY_ROSTER", default_value = DEFAULT_ROSTER)]
    roster: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Run both pipelines: demographic tidy, then roster GEOID assignment
    Run {
        #[command(flatten)]
        demographic: DemographicPaths,

        #[command(flatten)]
        roster: RosterPath,

        /// Write a JSON run report
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Demographic tidy only
    Tidy {
        #[command(flatten)]
        demographic: DemographicPaths,
    },

    /// Roster GEOID assignment only
    Assign {
        #[command(flatten)]
        roster: RosterPath,
    },

    /// Parse one district string and print its GEOID
    Geoid {
        /// District text, e.g. "Texas - 18th"
        text: String,
    },

    /// Print the state FIPS table
    States,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOGGER.set_quiet(cli.quiet);
    LOGGER.set_format(cli.log_format);

    let result = match cli.command {
        None => cmd_run(&default_options(), None),

        Some(Commands::Run {
            demographic,
            roster,
            report,
        }) => {
            let options = PipelineOptions {
                demographic_input: demographic.demographic_input,
                demographic_output: demographic.demographic_output,
                roster: roster.roster,
            };
            cmd_run(&options, report.as_deref())
        }

        Some(Commands::Tidy { demographic }) => cmd_tidy(
            &demographic.demographic_input,
            &demographic.demographic_output,
        ),

        Some(Commands::Assign { roster }) => cmd_assign(&roster.roster),

        Some(Commands::Geoid { text }) => cmd_geoid(&text),

        Some(Commands::States) => cmd_states(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

/// Defaults, overridden by environment variables when set.
fn default_options() -> PipelineOptions {
    let env_path = |key: &str, fallback: &str| {
        std::env::var_os(key)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(fallback))
    };

    PipelineOptions {
        demographic_input: env_path("CBC_TIDY_DEMOGRAPHIC_INPUT", DEFAULT_DEMOGRAPHIC_INPUT),
        demographic_output: env_path("CBC_TIDY_DEMOGRAPHIC_OUTPUT", DEFAULT_DEMOGRAPHIC_OUTPUT),
        roster: env_path("CBC_TIDY_ROSTER", DEFAULT_ROSTER),
    }
}

fn cmd_run(options: &PipelineOptions, report: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let result = run_all(options)?;

    if let Some(path) = report {
        result.save(path)?;
        log_success(format!("Report written to: {}", path.display()));
    }

    log_success(format!(
        "✨ Done: {} districts, {} roster rows, {} warning(s)",
        result.tidy.geographies, result.roster.rows, result.warnings
    ));
    Ok(())
}

fn cmd_tidy(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    run_tidy(input, output)?;
    Ok(())
}

fn cmd_assign(roster: &Path) -> Result<(), Box<dyn std::error::Error>> {
    run_geoid_assignment(roster)?;
    Ok(())
}

fn cmd_geoid(text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let geoid = parse_geoid(text)?;
    println!("{}", geoid);
    eprintln!("   {} ({}), district {:02}", geoid.state_name(), geoid.state_fips(), geoid.district());
    Ok(())
}

fn cmd_states() -> Result<(), Box<dyn std::error::Error>> {
    for (code, name) in fips::states() {
        println!("{}  {}", code, name);
    }
    Ok(())
}
