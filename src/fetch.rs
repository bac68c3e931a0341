//! VATSIM controller feed retrieval.
//!
//! A single unauthenticated GET against the public API. The response
//! body is returned untouched so it can be written verbatim to disk.

use crate::error::AppError;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Public endpoint listing online controllers.
pub const DEFAULT_FEED_URL: &str = "https://api.vatsim.net/v2/atc/online";

/// Options for a feed request.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Endpoint to query.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Whether to show a spinner while waiting.
    pub show_progress: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            timeout_seconds: 30,
            show_progress: true,
        }
    }
}

/// Request the controller feed and return the raw body.
pub async fn fetch_online_controllers(options: &FetchOptions) -> Result<String, AppError> {
    info!("Requesting controller feed: {}", options.url);

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(options.timeout_seconds))
        .build()?;

    let spinner = options.show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Fetching {}", options.url));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let result = send(&client, &options.url).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let body = result?;
    debug!("Received {} bytes", body.len());
    Ok(body)
}

async fn send(client: &reqwest::Client, url: &str) -> Result<String, AppError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Api { status, body });
    }

    Ok(response.text().await?)
}

/// Fetch the feed and write the body to `output`.
///
/// Nothing is written unless the request succeeds.
pub async fn fetch_to_file(options: &FetchOptions, output: &Path) -> Result<usize, AppError> {
    let body = fetch_online_controllers(options).await?;
    write_body(output, &body)?;
    Ok(body.len())
}

/// Write a response body to disk, creating parent directories.
pub fn write_body(output: &Path, body: &str) -> Result<(), AppError> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, body)?;
    info!("Wrote {} bytes to {}", body.len(), output.display());
    Ok(())
}
