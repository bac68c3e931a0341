//! Controller aggregation.
//!
//! This module turns classified controller records into the per-area
//! summary table: one row per area code, one count per service type,
//! ranked by total activity.

use crate::models::{ClassifiedRecord, ServiceType, SummaryRow};
use std::collections::BTreeMap;

/// Build summary rows from classified records.
///
/// Records with a sentinel area code or service type are ignored. Rows
/// are sorted by `total_score` descending, then by area code ascending.
pub fn aggregate(records: &[ClassifiedRecord]) -> Vec<SummaryRow> {
    let mut counts: BTreeMap<(&str, ServiceType), usize> = BTreeMap::new();

    for classified in records {
        let c = &classified.classification;
        if let (Some(area), Some(service)) = (c.area_code.as_deref(), c.service_type) {
            *counts.entry((area, service)).or_default() += 1;
        }
    }

    let mut rows: BTreeMap<&str, SummaryRow> = BTreeMap::new();
    for ((area, service), count) in counts {
        let row = rows.entry(area).or_insert_with(|| SummaryRow::new(area));
        row.counts[service.index()] = count;
    }

    let mut rows: Vec<SummaryRow> = rows
        .into_values()
        .map(|mut row| {
            row.total_score = row.counts.iter().sum();
            row
        })
        .collect();

    sort_by_total_score(&mut rows);
    rows
}

/// Sort rows by total score (highest first), area code breaking ties.
pub fn sort_by_total_score(rows: &mut [SummaryRow]) {
    rows.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| a.area_code.cmp(&b.area_code))
    });
}

/// Number of records that survive the sentinel filter.
pub fn qualifying_count(records: &[ClassifiedRecord]) -> usize {
    records
        .iter()
        .filter(|r| r.classification.is_qualifying())
        .count()
}

/// Sum of every row's total score.
pub fn grand_total(rows: &[SummaryRow]) -> usize {
    rows.iter().map(|r| r.total_score).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::{classify, classify_records};
    use crate::models::ControllerRecord;

    fn classified(callsigns: &[&str]) -> Vec<ClassifiedRecord> {
        callsigns
            .iter()
            .map(|cs| ClassifiedRecord {
                record: ControllerRecord::new(*cs),
                classification: classify(cs),
            })
            .collect()
    }

    fn row<'a>(rows: &'a [SummaryRow], area: &str) -> &'a SummaryRow {
        rows.iter()
            .find(|r| r.area_code == area)
            .unwrap_or_else(|| panic!("no row for {}", area))
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_aggregate_only_unqualified() {
        let records = classified(&["RANDOMSTRING", "EGLL_ATIS", "AB_CTR"]);
        assert!(aggregate(&records).is_empty());
    }

    #[test]
    fn test_aggregate_counts() {
        let records = classified(&[
            "EGLL_TWR",
            "EGLL_GND",
            "EGLL_N_APP",
            "EGLL_S_APP",
            "LON_S_CTR",
            "LON_N_CTR",
            "LON_CTR",
            "LON_E_CTR",
            "EDDF_DEL",
        ]);
        let rows = aggregate(&records);

        assert_eq!(rows.len(), 3);

        let egll = row(&rows, "EGLL");
        assert_eq!(egll.count(ServiceType::App), 2);
        assert_eq!(egll.count(ServiceType::Twr), 1);
        assert_eq!(egll.count(ServiceType::Gnd), 1);
        assert_eq!(egll.count(ServiceType::Ctr), 0);
        assert_eq!(egll.total_score, 4);

        let lon = row(&rows, "LON");
        assert_eq!(lon.count(ServiceType::Ctr), 4);
        assert_eq!(lon.total_score, 4);

        let eddf = row(&rows, "EDDF");
        assert_eq!(eddf.counts, [0, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_total_score_is_sum_of_counts() {
        let records = classified(&[
            "KJFK_TWR", "KJFK_DEP", "KJFK_APP", "KBOS_GND", "ZNY_CTR", "KJFK_DEL",
        ]);
        for row in aggregate(&records) {
            assert_eq!(row.counts.iter().sum::<usize>(), row.total_score);
        }
    }

    #[test]
    fn test_rows_sorted_by_total_score() {
        let records = classified(&[
            "EDDM_TWR", "LON_CTR", "LON_S_CTR", "LON_N_CTR", "EGLL_TWR", "EGLL_GND",
        ]);
        let rows = aggregate(&records);

        assert!(rows
            .windows(2)
            .all(|w| w[0].total_score >= w[1].total_score));
        assert_eq!(rows[0].area_code, "LON");
        assert_eq!(rows[1].area_code, "EGLL");
        assert_eq!(rows[2].area_code, "EDDM");
    }

    #[test]
    fn test_ties_broken_by_area_code() {
        let records = classified(&["LFPG_TWR", "EGLL_TWR", "KJFK_TWR"]);
        let areas: Vec<_> = aggregate(&records)
            .into_iter()
            .map(|r| r.area_code)
            .collect();
        assert_eq!(areas, vec!["EGLL", "KJFK", "LFPG"]);
    }

    #[test]
    fn test_unqualified_records_do_not_contribute() {
        let valid = classified(&["EGLL_TWR", "EGLL_APP", "LON_S_CTR"]);
        let mut mixed = valid.clone();
        mixed.extend(classified(&["EGLL_ATIS", "XX_TWR", "RANDOMSTRING", "LON_OBS"]));

        assert_eq!(aggregate(&valid), aggregate(&mixed));
    }

    #[test]
    fn test_classify_records_then_aggregate() {
        let callsigns = ["EGLL_TWR", "LON_S_CTR", "OBS_ONLY"];
        let records: Vec<_> = callsigns.iter().map(|c| ControllerRecord::new(*c)).collect();
        assert_eq!(
            aggregate(&classify_records(records)),
            aggregate(&classified(&callsigns))
        );
    }

    #[test]
    fn test_qualifying_count_and_grand_total() {
        let records = classified(&["EGLL_TWR", "LON_S_CTR", "EGLL_ATIS", "RANDOMSTRING"]);
        assert_eq!(qualifying_count(&records), 2);
        assert_eq!(grand_total(&aggregate(&records)), 2);
    }
}
