use crate::io::output::{OutputFormat, ReportSection};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "studioplan")]
#[command(about = "Resource-planning dashboard metrics for content studios", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Calculate dashboard metrics from exported records
    Report {
        /// Snapshot JSON file, or a directory with tasks.json, brands.json, ...
        #[arg(short, long, env = "STUDIOPLAN_DATA")]
        data: PathBuf,

        /// Reporting window in days (defaults to filters.default_period_days)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        period: Option<u32>,

        /// Only tasks for this client id
        #[arg(long)]
        client: Option<String>,

        /// Only tasks for this brand id
        #[arg(long)]
        brand: Option<String>,

        /// Only tasks assigned to this collaborator name
        #[arg(long)]
        collaborator: Option<String>,

        /// Only tasks with this status (legacy names accepted)
        #[arg(long)]
        status: Option<String>,

        /// Only tasks with this priority
        #[arg(long)]
        priority: Option<String>,

        /// Only tasks with this content type
        #[arg(long = "content-type")]
        content_type: Option<String>,

        /// Dashboard section to output
        #[arg(long, value_enum, default_value = "all")]
        section: ReportSection,

        /// Output format (defaults to output.default_format, then terminal)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (skips discovery of .studioplan.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Reference instant as RFC 3339 (defaults to the current time)
        #[arg(long, value_parser = parse_reference_time)]
        now: Option<chrono::DateTime<chrono::Utc>>,

        /// Disable colored output
        #[arg(long = "no-color")]
        no_color: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize a .studioplan.toml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_reference_time(value: &str) -> Result<chrono::DateTime<chrono::Utc>, String> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}
