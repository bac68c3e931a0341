//! Airport coordinate lookup.
//!
//! Resolves ICAO codes to latitude/longitude using a CSV reference table
//! (`iata-icao.csv`). The table needs a header row with at least `icao`,
//! `latitude` and `longitude` columns; other columns are ignored.

use crate::error::AppError;
use crate::models::Coordinates;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Columns the reference table must provide.
const REQUIRED_COLUMNS: [&str; 3] = ["icao", "latitude", "longitude"];

#[derive(Debug, Deserialize)]
struct AirportRow {
    icao: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
}

impl AirportRow {
    fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates {
            lat: self.latitude?,
            lon: self.longitude?,
        })
    }
}

/// ICAO code to coordinates, keeping the first row seen for each code.
///
/// A code whose first row has unusable coordinates maps to `None`; later
/// rows for that code are still ignored.
#[derive(Debug, Clone, Default)]
pub struct AirportTable {
    airports: HashMap<String, Option<Coordinates>>,
}

impl AirportTable {
    /// Load the reference table from a CSV file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let file = std::fs::File::open(path).map_err(|e| AppError::from_read(e, path))?;
        let table = Self::from_reader(file)?;
        debug!(
            "Loaded {} airports from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Build the table from any CSV source.
    ///
    /// Fails with `AppError::Schema` when the header lacks one of the
    /// required columns. Rows that can't be read at all are skipped with a
    /// warning; a row whose coordinates don't parse still claims its code.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AppError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?;
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|col| !headers.iter().any(|h| h == **col))
        {
            return Err(AppError::Schema(format!(
                "reference table has no '{}' column",
                missing
            )));
        }

        let mut airports = HashMap::new();
        for (line, result) in rdr.deserialize::<AirportRow>().enumerate() {
            let row = match result {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    warn!("Skipping airport row {}: {}", line + 2, e);
                    continue;
                }
            };
            if row.icao.is_empty() {
                continue;
            }
            let coordinates = row.coordinates();
            if coordinates.is_none() {
                warn!(
                    "Airport {} has unusable coordinates (row {})",
                    row.icao,
                    line + 2
                );
            }
            airports.entry(row.icao).or_insert(coordinates);
        }

        Ok(Self { airports })
    }

    /// Coordinates for an ICAO code, compared case-insensitively.
    pub fn lookup(&self, icao: &str) -> Option<Coordinates> {
        self.airports.get(&icao.to_uppercase()).copied().flatten()
    }

    /// Number of distinct airports in the table.
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}
