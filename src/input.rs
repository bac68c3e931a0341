//! Controller feed loading.
//!
//! Reads a file previously written by `fetch` and turns it into
//! controller records. Both the `v2/atc/online` layout (a bare array)
//! and the data-feed layout (an object with a `controllers` array) are
//! accepted. Elements without a usable callsign are reported and skipped.

use crate::error::AppError;
use crate::models::{ControllerRecord, RecordError};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Records read from a feed file, plus the elements that were skipped.
#[derive(Debug, Clone, Default)]
pub struct LoadedInput {
    pub records: Vec<ControllerRecord>,
    pub errors: Vec<RecordError>,
}

impl LoadedInput {
    /// Total number of elements seen in the input.
    pub fn total(&self) -> usize {
        self.records.len() + self.errors.len()
    }
}

/// Load controller records from a JSON file.
pub fn load_controllers(path: &Path) -> Result<LoadedInput, AppError> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::from_read(e, path))?;
    debug!("Read {} bytes from {}", content.len(), path.display());
    parse_controllers(&content)
}

/// Parse controller records from JSON text.
pub fn parse_controllers(content: &str) -> Result<LoadedInput, AppError> {
    let value: Value = serde_json::from_str(content)?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("controllers") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(AppError::Schema(
                    "'controllers' is not an array".to_string(),
                ))
            }
            None => {
                return Err(AppError::Schema(
                    "expected an array of controllers or an object with a 'controllers' array"
                        .to_string(),
                ))
            }
        },
        other => {
            return Err(AppError::Schema(format!(
                "expected an array of controllers, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut loaded = LoadedInput::default();
    for (index, item) in items.into_iter().enumerate() {
        match to_record(item) {
            Ok(record) => loaded.records.push(record),
            Err(reason) => {
                let error = RecordError { index, reason };
                warn!("Skipping {}", error);
                loaded.errors.push(error);
            }
        }
    }

    Ok(loaded)
}

fn to_record(item: Value) -> Result<ControllerRecord, String> {
    let mut fields = match item {
        Value::Object(fields) => fields,
        other => return Err(format!("expected an object, found {}", json_kind(&other))),
    };

    match fields.remove("callsign") {
        Some(Value::String(callsign)) => Ok(ControllerRecord {
            callsign,
            extra: fields,
        }),
        Some(other) => Err(format!("callsign is {}, not a string", json_kind(&other))),
        None => Err("missing callsign".to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
