//! Data models for the controller summary.
//!
//! This module contains the core data structures used throughout
//! the application for representing controllers, their classification,
//! and the aggregated summary table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Area code reported when a callsign has no recognizable prefix.
pub const UNKNOWN_AREA: &str = "UNKNOWN";

/// Service type reported when a callsign carries none of the known tokens.
pub const OTHER_SERVICE: &str = "OTHER";

/// Category of control service offered by a controller position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceType {
    /// Approach
    App,
    /// Tower
    Twr,
    /// Ground
    Gnd,
    /// Center / area control
    Ctr,
    /// Clearance delivery
    Del,
    /// Departure
    Dep,
}

impl ServiceType {
    /// All service types, in column and match-priority order.
    pub const ALL: [ServiceType; 6] = [
        ServiceType::App,
        ServiceType::Twr,
        ServiceType::Gnd,
        ServiceType::Ctr,
        ServiceType::Del,
        ServiceType::Dep,
    ];

    /// The callsign token for this service.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::App => "APP",
            ServiceType::Twr => "TWR",
            ServiceType::Gnd => "GND",
            ServiceType::Ctr => "CTR",
            ServiceType::Del => "DEL",
            ServiceType::Dep => "DEP",
        }
    }

    /// Position of this service in `ALL` (and in summary columns).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a single callsign.
///
/// `None` stands for the `UNKNOWN` / `OTHER` sentinels; use the
/// `*_str` accessors when the textual form is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub area_code: Option<String>,
    pub service_type: Option<ServiceType>,
}

impl Classification {
    /// Area code, or `UNKNOWN`.
    pub fn area_code_str(&self) -> &str {
        self.area_code.as_deref().unwrap_or(UNKNOWN_AREA)
    }

    /// Service type token, or `OTHER`.
    pub fn service_type_str(&self) -> &'static str {
        self.service_type
            .map(|t| t.as_str())
            .unwrap_or(OTHER_SERVICE)
    }

    /// Both parts are real values (neither is a sentinel).
    pub fn is_qualifying(&self) -> bool {
        self.area_code.is_some() && self.service_type.is_some()
    }
}

/// One online controller as delivered by the VATSIM API.
///
/// Only `callsign` is interpreted; every other field is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerRecord {
    pub callsign: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ControllerRecord {
    /// Creates a record carrying only a callsign.
    #[cfg(test)]
    pub fn new(callsign: impl Into<String>) -> Self {
        Self {
            callsign: callsign.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// A controller record together with its classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRecord {
    pub record: ControllerRecord,
    pub classification: Classification,
}

/// An input element that could not be read as a controller record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordError {
    /// Zero-based position in the input list.
    pub index: usize,
    /// Why the element was rejected.
    pub reason: String,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record #{}: {}", self.index, self.reason)
    }
}

/// Per-area counts of active controller positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub area_code: String,
    /// Counts indexed like `ServiceType::ALL`.
    pub counts: [usize; 6],
    pub total_score: usize,
}

impl SummaryRow {
    /// Creates an empty row for an area.
    pub fn new(area_code: impl Into<String>) -> Self {
        Self {
            area_code: area_code.into(),
            counts: [0; 6],
            total_score: 0,
        }
    }

    /// Count for a single service type.
    pub fn count(&self, service: ServiceType) -> usize {
        self.counts[service.index()]
    }
}

/// Metadata describing how a summary was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetadata {
    /// File the controller records were read from.
    pub input: PathBuf,
    /// When the summary was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of controller records read.
    pub records_read: usize,
    /// Records with both an area code and a service type.
    pub records_classified: usize,
    /// Records dropped because of a sentinel classification.
    pub records_unclassified: usize,
}

/// The complete controller summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub metadata: SummaryMetadata,
    pub rows: Vec<SummaryRow>,
    /// Input elements that were skipped.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub record_errors: Vec<RecordError>,
}

/// Geographic position of an airport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Printable lookup outcome; both fields are `null` when nothing matched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LookupOutcome {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl From<Option<Coordinates>> for LookupOutcome {
    fn from(found: Option<Coordinates>) -> Self {
        Self {
            lat: found.map(|c| c.lat),
            lon: found.map(|c| c.lon),
        }
    }
}
