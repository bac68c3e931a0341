//! vatsim-heatmap - VATSIM controller activity summary
//!
//! A CLI tool that downloads the list of online VATSIM controllers,
//! ranks airspace areas by how many positions are staffed, and resolves
//! airport codes to coordinates.
//!
//! Exit codes:
//!   0 - Finished, including failures that were reported on stderr
//!       (missing input, HTTP error, malformed data)
//!   1 - Invalid arguments, or `--init-config` with an existing config file

mod analysis;
mod cli;
mod config;
mod error;
mod fetch;
mod input;
mod lookup;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, Command, OutputFormat};
use config::Config;
use models::{LookupOutcome, SummaryMetadata, SummaryReport};
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // The config file can turn on verbose logging, so it is read first
    let loaded = load_config(&args);
    let config_verbose = loaded.as_ref().map_or(false, |c| c.general.verbose);
    init_logging(args.log_level(config_verbose));

    info!("vatsim-heatmap v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let config = match loaded {
        Ok(config) => config,
        Err(e) if args.config.is_none() => {
            warn!("Failed to load config: {:#}", e);
            Config::default()
        }
        Err(e) => {
            report_failure(&e);
            return Ok(());
        }
    };

    run(&args, config).await;
    Ok(())
}

/// Handle --init-config: generate a default .vatsim-heatmap.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            config::CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE))?;

    println!("Created {} with default settings.", config::CONFIG_FILE);
    Ok(())
}

/// Initialize logging at the given level.
///
/// `RUST_LOG` takes precedence when it is set.
fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the selected command, reporting any failure on stderr.
///
/// A failed command writes no output file and does not abort the process.
async fn run(args: &Args, mut config: Config) {
    config.merge_with_args(args);

    if let Err(e) = dispatch(args, &config).await {
        report_failure(&e);
    }
}

fn report_failure(err: &anyhow::Error) {
    debug!("Command failed: {:?}", err);
    eprintln!("Error: {:#}", err);
}

/// Dispatch the selected command.
async fn dispatch(args: &Args, config: &Config) -> Result<()> {
    match &args.command {
        Some(Command::Fetch { .. }) => run_fetch(config, !args.quiet).await,
        Some(Command::Summarize { .. }) => {
            let report = create_controller_summary(
                &config.summary.input,
                &config.summary.output,
                config.summary.format,
            )?;
            print_summary(&report, &config.summary.output);
            Ok(())
        }
        Some(Command::Lookup { icao, .. }) => run_lookup(&config.lookup.table, icao),
        None => Ok(()),
    }
}

/// Download the controller feed to the configured file.
async fn run_fetch(config: &Config, show_progress: bool) -> Result<()> {
    let options = fetch::FetchOptions {
        url: config.fetch.url.clone(),
        timeout_seconds: config.fetch.timeout_seconds,
        show_progress,
    };

    let bytes = fetch::fetch_to_file(&options, &config.fetch.output)
        .await
        .with_context(|| format!("Failed to fetch {}", options.url))?;

    println!(
        "Saved {} bytes of controller data to '{}'.",
        bytes,
        config.fetch.output.display()
    );
    Ok(())
}

/// Read a controller feed, summarize it and write the summary.
///
/// The output is rendered completely before anything is written, so a
/// failure leaves no partial file behind.
fn create_controller_summary(
    input_path: &Path,
    output: &Path,
    format: OutputFormat,
) -> Result<SummaryReport> {
    let loaded = input::load_controllers(input_path)?;
    if !loaded.errors.is_empty() {
        warn!(
            "{} of {} records had no usable callsign and were skipped",
            loaded.errors.len(),
            loaded.total()
        );
    }

    let records_read = loaded.records.len();
    let classified = analysis::classify_records(loaded.records);
    let records_classified = analysis::qualifying_count(&classified);
    let rows = analysis::aggregate(&classified);
    info!(
        "Classified {} of {} controllers into {} areas",
        records_classified,
        records_read,
        rows.len()
    );

    let report = SummaryReport {
        metadata: SummaryMetadata {
            input: input_path.to_path_buf(),
            generated_at: Utc::now(),
            records_read,
            records_classified,
            records_unclassified: records_read - records_classified,
        },
        rows,
        record_errors: loaded.errors,
    };

    let content = match format {
        OutputFormat::Csv => report::generate_csv_report(&report.rows)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
        OutputFormat::Json => report::generate_json_report(&report)?,
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(output, content)
        .with_context(|| format!("Failed to write summary to {}", output.display()))?;

    Ok(report)
}

fn print_summary(report: &SummaryReport, output: &Path) {
    println!("Summary file '{}' generated successfully.", output.display());
    println!(
        "   Areas: {} | Positions counted: {} | Controllers read: {}",
        report.rows.len(),
        analysis::grand_total(&report.rows),
        report.metadata.records_read
    );
    for row in report.rows.iter().take(5) {
        println!("   {:<6} {}", row.area_code, row.total_score);
    }
}

/// Resolve an ICAO code and print its coordinates as JSON.
fn run_lookup(table_path: &Path, icao: &str) -> Result<()> {
    let table = lookup::AirportTable::load(table_path)?;
    let outcome = LookupOutcome::from(table.lookup(icao));

    if outcome.lat.is_none() {
        info!("No airport with ICAO code {}", icao.to_uppercase());
    }
    println!("{}", serde_json::to_string(&outcome)?);
    Ok(())
}

/// Load configuration from `--config`, the default file, or built-in defaults.
///
/// Runs before logging is set up, so it only returns; the caller decides
/// how to report a failure.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    Ok(Config::load_default()?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FEED: &str = r#"[
        {"cid": 1, "callsign": "EGLL_TWR"},
        {"cid": 2, "callsign": "EGLL_N_APP"},
        {"cid": 3, "callsign": "LON_S_CTR"},
        {"cid": 4, "callsign": "LON_N_CTR"},
        {"cid": 5, "callsign": "LON_CTR"},
        {"cid": 6, "callsign": "EGLL_ATIS"},
        {"cid": 7},
        {"cid": 8, "callsign": "AB_CTR"}
    ]"#;

    fn feed_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FEED.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_create_controller_summary_csv() {
        let feed = feed_file();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("summary.csv");

        let report = create_controller_summary(feed.path(), &output, OutputFormat::Csv).unwrap();

        assert_eq!(report.metadata.records_read, 7);
        assert_eq!(report.metadata.records_classified, 5);
        assert_eq!(report.metadata.records_unclassified, 2);
        assert_eq!(report.record_errors.len(), 1);

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "area_code,APP,TWR,GND,CTR,DEL,DEP,total_score\n\
             LON,0,0,0,3,0,0,3\n\
             EGLL,1,1,0,0,0,0,2\n"
        );
    }

    #[test]
    fn test_create_controller_summary_json() {
        let feed = feed_file();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("summary.json");

        create_controller_summary(feed.path(), &output, OutputFormat::Json).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["rows"][0]["area_code"], "LON");
        assert_eq!(written["record_errors"][0]["index"], 6);
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("current_vatsim_data.json");
        let output = dir.path().join("summary.csv");

        let err = create_controller_summary(&input, &output, OutputFormat::Csv).unwrap_err();

        assert!(err.to_string().contains("was not found"));
        assert!(!output.exists());
    }

    #[test]
    fn test_malformed_input_writes_nothing() {
        let mut feed = tempfile::NamedTempFile::new().unwrap();
        feed.write_all(b"{not json").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("summary.csv");

        assert!(create_controller_summary(feed.path(), &output, OutputFormat::Csv).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_empty_feed_writes_header_only() {
        let mut feed = tempfile::NamedTempFile::new().unwrap();
        feed.write_all(b"[]").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("summary.csv");

        let report = create_controller_summary(feed.path(), &output, OutputFormat::Csv).unwrap();

        assert!(report.rows.is_empty());
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "area_code,APP,TWR,GND,CTR,DEL,DEP,total_score\n"
        );
    }

    #[test]
    fn test_run_reports_missing_input_and_returns() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("summary.csv");
        let mut args = cli::tests::make_args();
        args.command = Some(Command::Summarize {
            input: Some(dir.path().join("current_vatsim_data.json")),
            output: Some(output.clone()),
            format: None,
        });

        tokio_test::block_on(run(&args, Config::default()));

        assert!(!output.exists());
    }

    #[test]
    fn test_run_writes_summary() {
        let feed = feed_file();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("summary.md");
        let mut args = cli::tests::make_args();
        args.command = Some(Command::Summarize {
            input: Some(feed.path().to_path_buf()),
            output: Some(output.clone()),
            format: Some(OutputFormat::Markdown),
        });

        tokio_test::block_on(run(&args, Config::default()));

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("| LON |"));
    }

    #[test]
    fn test_load_config_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[general]\nverbose = true\n").unwrap();
        let mut args = cli::tests::make_args();
        args.config = Some(file.path().to_path_buf());

        let config = load_config(&args).unwrap();
        assert!(config.general.verbose);
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::DEBUG);
    }

    #[test]
    fn test_load_config_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = cli::tests::make_args();
        args.config = Some(dir.path().join("absent.toml"));

        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_run_lookup_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_lookup(&dir.path().join("iata-icao.csv"), "ELLX").is_err());
    }
}
