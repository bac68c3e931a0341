//! Summary report generation.
//!
//! This module renders the controller summary as CSV, Markdown or JSON.
//! Every renderer produces the whole document in memory; the caller
//! writes it out in one go.

use crate::analysis::grand_total;
use crate::models::{ServiceType, SummaryMetadata, SummaryReport, SummaryRow};
use anyhow::Result;

/// Name of the first column.
pub const AREA_COLUMN: &str = "area_code";

/// Name of the last column.
pub const TOTAL_COLUMN: &str = "total_score";

/// Header row shared by the CSV and Markdown tables.
pub fn header() -> Vec<&'static str> {
    std::iter::once(AREA_COLUMN)
        .chain(ServiceType::ALL.iter().map(|t| t.as_str()))
        .chain(std::iter::once(TOTAL_COLUMN))
        .collect()
}

fn row_fields(row: &SummaryRow) -> Vec<String> {
    std::iter::once(row.area_code.clone())
        .chain(ServiceType::ALL.iter().map(|t| row.count(*t).to_string()))
        .chain(std::iter::once(row.total_score.to_string()))
        .collect()
}

/// Generate the summary as comma-separated text.
pub fn generate_csv_report(rows: &[SummaryRow]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    wtr.write_record(header())?;
    for row in rows {
        wtr.write_record(row_fields(row))?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &SummaryReport) -> String {
    let mut output = String::new();

    output.push_str("# VATSIM Controller Summary\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_section(&report.rows));

    if !report.record_errors.is_empty() {
        output.push_str("## Skipped Records\n\n");
        for error in &report.record_errors {
            output.push_str(&format!("- {}\n", error));
        }
        output.push('\n');
    }

    output
}

fn generate_metadata_section(metadata: &SummaryMetadata) -> String {
    let mut section = String::new();

    section.push_str(&format!("- **Input:** `{}`\n", metadata.input.display()));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Controllers Read:** {}\n", metadata.records_read));
    section.push_str(&format!(
        "- **Classified:** {}\n",
        metadata.records_classified
    ));
    if metadata.records_unclassified > 0 {
        section.push_str(&format!(
            "- **Unclassified:** {}\n",
            metadata.records_unclassified
        ));
    }
    section.push('\n');

    section
}

fn generate_table_section(rows: &[SummaryRow]) -> String {
    let mut section = String::new();

    section.push_str("## Areas by Activity\n\n");

    if rows.is_empty() {
        section.push_str("No classifiable controllers were online.\n\n");
        return section;
    }

    let header = header();
    section.push_str(&format!("| {} |\n", header.join(" | ")));
    section.push_str("|:---|");
    section.push_str(&":---:|".repeat(header.len() - 1));
    section.push('\n');

    for row in rows {
        section.push_str(&format!("| {} |\n", row_fields(row).join(" | ")));
    }
    section.push_str(&format!("\n**Total positions:** {}\n\n", grand_total(rows)));

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &SummaryReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
