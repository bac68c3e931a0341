//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values. Paths and URLs left out on
//! the command line come from the configuration file.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// vatsim-heatmap - who is controlling where on VATSIM
///
/// Fetch the online controller list, summarize it per airspace area and
/// service type, or resolve an airport's coordinates.
///
/// Examples:
///   vatsim-heatmap fetch
///   vatsim-heatmap summarize --format markdown -o summary.md
///   vatsim-heatmap lookup ellx
///   vatsim-heatmap --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(subcommand_required = false, arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .vatsim-heatmap.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .vatsim-heatmap.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Download the list of online controllers
    Fetch {
        /// API endpoint to query
        #[arg(long, value_name = "URL", env = "VATSIM_FEED_URL")]
        url: Option<String>,

        /// File the raw response is written to
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Summarize a downloaded controller list per area and service type
    Summarize {
        /// Controller list to read
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Summary file to write
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (csv, markdown, json)
        #[arg(long, value_name = "FORMAT")]
        format: Option<OutputFormat>,
    },

    /// Print the coordinates of an airport
    Lookup {
        /// ICAO airport code (case-insensitive)
        icao: String,

        /// CSV reference table with icao, latitude and longitude columns
        #[arg(long, value_name = "FILE")]
        table: Option<PathBuf>,
    },
}

/// Output format for the summary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated values (default)
    #[default]
    Csv,
    /// Markdown table
    Markdown,
    /// JSON document
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        let Some(command) = &self.command else {
            return Err("A command is required (fetch, summarize or lookup)".to_string());
        };

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match command {
            Command::Fetch { url, timeout, .. } => {
                if let Some(url) = url {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        return Err("Feed URL must start with 'http://' or 'https://'".to_string());
                    }
                }
                if *timeout == Some(0) {
                    return Err("Timeout must be at least 1 second".to_string());
                }
            }
            Command::Summarize { .. } => {}
            Command::Lookup { icao, .. } => {
                if icao.trim().is_empty() {
                    return Err("ICAO code must not be empty".to_string());
                }
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `[general] verbose` setting; `--quiet` wins
    /// over both it and `--verbose`.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
