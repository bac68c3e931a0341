//! Callsign classification.
//!
//! VATSIM callsigns follow a loose `AREA[_SECTOR]_TYPE` convention
//! (`EGLL_TWR`, `LON_S_CTR`, `EDDF_N_APP`). This module pulls the area
//! code and the service type out of a callsign with two independent
//! scans. Neither scan can fail: anything that doesn't fit the
//! convention comes back as `None`.

use crate::models::{Classification, ClassifiedRecord, ControllerRecord, ServiceType};
use tracing::trace;

/// Area codes are 3 or 4 word characters long.
const AREA_LENGTHS: [usize; 2] = [4, 3];

/// Classify a callsign into area code and service type.
pub fn classify(callsign: &str) -> Classification {
    Classification {
        area_code: area_code(callsign),
        service_type: service_type(callsign),
    }
}

/// Classify every record, keeping the record alongside its classification.
pub fn classify_records(records: Vec<ControllerRecord>) -> Vec<ClassifiedRecord> {
    records
        .into_iter()
        .map(|record| {
            let classification = classify(&record.callsign);
            trace!(
                "{} -> {} {}",
                record.callsign,
                classification.area_code_str(),
                classification.service_type_str()
            );
            ClassifiedRecord {
                record,
                classification,
            }
        })
        .collect()
}

/// Leading run of 3-4 word characters directly followed by `_`, upper-cased.
///
/// `_` counts as a word character, so the run itself may contain
/// underscores. The longer candidate is tried first.
fn area_code(callsign: &str) -> Option<String> {
    let head: Vec<char> = callsign.chars().take(5).collect();
    let run = head.iter().take_while(|c| is_word_char(**c)).count();

    AREA_LENGTHS
        .iter()
        .find(|&&len| run >= len && head.get(len) == Some(&'_'))
        .map(|&len| head[..len].iter().collect::<String>().to_uppercase())
}

/// First `_` in the callsign that is followed by a known service token.
fn service_type(callsign: &str) -> Option<ServiceType> {
    let bytes = callsign.as_bytes();

    bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'_')
        .find_map(|(i, _)| {
            let rest = &bytes[i + 1..];
            ServiceType::ALL
                .into_iter()
                .find(|t| rest.starts_with(t.as_str().as_bytes()))
        })
}

fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
