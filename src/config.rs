//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.vatsim-heatmap.toml` files.

use crate::cli::{Args, Command, OutputFormat};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = ".vatsim-heatmap.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Feed retrieval settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Summary settings.
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Airport lookup settings.
    #[serde(default)]
    pub lookup: LookupConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log at debug level unless `--quiet` is given.
    #[serde(default)]
    pub verbose: bool,
}

/// Controller feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// API endpoint listing online controllers.
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// Where the raw response is written.
    #[serde(default = "default_feed_file")]
    pub output: PathBuf,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            output: default_feed_file(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_feed_url() -> String {
    crate::fetch::DEFAULT_FEED_URL.to_string()
}

fn default_feed_file() -> PathBuf {
    PathBuf::from("data/current_vatsim_data.json")
}

fn default_timeout() -> u64 {
    30
}

/// Controller summary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Controller feed file to read.
    #[serde(default = "default_feed_file")]
    pub input: PathBuf,

    /// Summary file to write.
    #[serde(default = "default_summary_file")]
    pub output: PathBuf,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            input: default_feed_file(),
            output: default_summary_file(),
            format: OutputFormat::default(),
        }
    }
}

fn default_summary_file() -> PathBuf {
    PathBuf::from("data/vatsim_controller_summary.csv")
}

/// Airport lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// CSV reference table with `icao`, `latitude`, `longitude` columns.
    #[serde(default = "default_table")]
    pub table: PathBuf,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
        }
    }
}

fn default_table() -> PathBuf {
    PathBuf::from("data/iata-icao.csv")
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// where they were actually given.
    pub fn merge_with_args(&mut self, args: &Args) {
        match &args.command {
            Some(Command::Fetch {
                url,
                output,
                timeout,
            }) => {
                if let Some(url) = url {
                    self.fetch.url = url.clone();
                }
                if let Some(output) = output {
                    self.fetch.output = output.clone();
                }
                if let Some(timeout) = timeout {
                    self.fetch.timeout_seconds = *timeout;
                }
            }
            Some(Command::Summarize {
                input,
                output,
                format,
            }) => {
                if let Some(input) = input {
                    self.summary.input = input.clone();
                }
                if let Some(output) = output {
                    self.summary.output = output.clone();
                }
                if let Some(format) = format {
                    self.summary.format = *format;
                }
            }
            Some(Command::Lookup { table, .. }) => {
                if let Some(table) = table {
                    self.lookup.table = table.clone();
                }
            }
            None => {}
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fetch.url, "https://api.vatsim.net/v2/atc/online");
        assert_eq!(config.fetch.timeout_seconds, 30);
        assert_eq!(config.summary.input, config.fetch.output);
        assert_eq!(config.summary.format, OutputFormat::Csv);
        assert_eq!(config.lookup.table, PathBuf::from("data/iata-icao.csv"));
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true

[fetch]
url = "https://data.vatsim.net/v3/vatsim-data.json"
timeout_seconds = 10

[summary]
output = "out/summary.md"
format = "markdown"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.fetch.url, "https://data.vatsim.net/v3/vatsim-data.json");
        assert_eq!(config.fetch.timeout_seconds, 10);
        assert_eq!(config.fetch.output, default_feed_file());
        assert_eq!(config.summary.output, PathBuf::from("out/summary.md"));
        assert_eq!(config.summary.format, OutputFormat::Markdown);
        assert_eq!(config.lookup.table, default_table());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[fetch]"));
        assert!(toml_str.contains("[summary]"));
        assert!(toml_str.contains("[lookup]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.summary.output, default_summary_file());
    }

    #[test]
    fn test_merge_only_overrides_given_flags() {
        let mut config = Config::default();
        config.summary.output = PathBuf::from("from_file.csv");

        let mut args = make_args();
        args.command = Some(Command::Summarize {
            input: Some(PathBuf::from("feed.json")),
            output: None,
            format: Some(OutputFormat::Json),
        });
        config.merge_with_args(&args);

        assert_eq!(config.summary.input, PathBuf::from("feed.json"));
        assert_eq!(config.summary.output, PathBuf::from("from_file.csv"));
        assert_eq!(config.summary.format, OutputFormat::Json);
    }

    #[test]
    fn test_merge_fetch_flags() {
        let mut config = Config::default();
        let mut args = make_args();
        args.command = Some(Command::Fetch {
            url: Some("http://localhost:8080/atc".to_string()),
            output: None,
            timeout: Some(5),
        });
        config.merge_with_args(&args);

        assert_eq!(config.fetch.url, "http://localhost:8080/atc");
        assert_eq!(config.fetch.timeout_seconds, 5);
        assert_eq!(config.fetch.output, default_feed_file());
    }
}
