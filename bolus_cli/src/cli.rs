//! CLI argument definitions and shared statics.

use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

pub const DEFAULT_CONFIG: &str = "etc/bolus.toml";

#[derive(Parser, Debug)]
#[command(name = "bolus", version, about = "Insulin bolus advisor")]
pub struct Cli {
    /// Path to config TOML. Built-in defaults are used when the default path is absent.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Print results and errors as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG takes precedence
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("expected RFC 3339 timestamp: {e}"))
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recommend a bolus from current glucose, carbs and trend
    Recommend {
        /// Current glucose in mg/dL
        #[arg(long, allow_hyphen_values = true)]
        bg: f64,
        /// Carbohydrates to cover, in grams
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        carbs: f64,
        /// Glucose rate of change in mg/dL/min; derived from --readings when omitted
        #[arg(long, allow_hyphen_values = true)]
        trend: Option<f64>,
        /// Override the profile target glucose (mg/dL)
        #[arg(long)]
        target: Option<f64>,
        /// Insulin administration log CSV (timestamp,dose)
        #[arg(long, value_name = "FILE")]
        history: Option<PathBuf>,
        /// CGM readings CSV (timestamp,glucose)
        #[arg(long, value_name = "FILE")]
        readings: Option<PathBuf>,
        /// Evaluate as of this instant instead of the system clock
        #[arg(long, value_name = "RFC3339", value_parser = parse_rfc3339)]
        now: Option<DateTime<Utc>>,
    },
    /// Report insulin on board from an administration log
    Iob {
        /// Insulin administration log CSV (timestamp,dose)
        #[arg(long, value_name = "FILE")]
        history: PathBuf,
        /// Evaluate as of this instant instead of the system clock
        #[arg(long, value_name = "RFC3339", value_parser = parse_rfc3339)]
        now: Option<DateTime<Utc>>,
    },
    /// Bound an externally suggested dose with the safety limits
    Clamp {
        /// Suggested dose in units
        #[arg(long, allow_hyphen_values = true)]
        raw: f64,
    },
    /// Validate the configuration and print the effective values
    CheckConfig,
}
