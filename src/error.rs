//! Error types.

use std::path::PathBuf;

/// Errors that can occur while fetching, reading or writing data.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input file or reference table is missing
    #[error("the file '{}' was not found", .0.display())]
    InputNotFound(PathBuf),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Input is not valid JSON
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input is valid JSON but not a list of controllers
    #[error("unexpected input layout: {0}")]
    Schema(String),

    /// Reading or writing delimited text failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Maps a "not found" I/O error onto `InputNotFound` for `path`.
    pub fn from_read(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            AppError::InputNotFound(path.to_path_buf())
        } else {
            AppError::Io(err)
        }
    }
}
