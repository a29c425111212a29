//! CLI parse: clap types for geoctx. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// geoctx - Geospatial context aggregation
#[derive(Parser, Debug)]
#[command(name = "geoctx")]
#[command(about = "Aggregate geospatial context from independent sources")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query every configured source around a point
    Aggregate {
        /// Latitude in degrees, -90..=90
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in degrees, -180..=180
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in kilometres
        #[arg(long, default_value = "5.0", allow_negative_numbers = true)]
        radius_km: f64,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Override the session timeout (0 disables it)
        #[arg(long)]
        session_timeout_ms: Option<u64>,
    },
    /// List configured sources
    Sources {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
