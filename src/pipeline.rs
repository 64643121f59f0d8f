//! High-level processing pipeline.
//!
//! One upload runs the full chain to completion, strictly in order:
//!
//! ```text
//! ┌──────────┐     ┌───────────┐     ┌────────────┐     ┌──────────┐     ┌────────────┐
//! │ XLSX in  │────▶│ Trimmer   │────▶│ Normalizer │────▶│ Expander │────▶│ XLSX out   │
//! │ (bytes)  │     │ (layout)  │     │ (headers,  │     │ (case    │     │ ("Processed│
//! └──────────┘     └───────────┘     │  dates)    │     │  split)  │     │  Data")    │
//!                                    └────────────┘     └──────────┘     └────────────┘
//! ```
//!
//! No component reads back from a later stage, there is no shared state
//! between runs, and the whole table is held in memory.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::logs::{log_info, log_success, log_warning};
use crate::error::PipelineResult;
use crate::expand::{expand, IdentifierColumn};
use crate::normalize::{date_columns, normalize, DateColumnPolicy, DateStyle};
use crate::sheet::{read_workbook, trim_report, ReportLayout};
use crate::table::Table;
use crate::xlsx::{write_xlsx, OUTPUT_SHEET_NAME};

/// Pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessOptions {
    /// How date columns are selected.
    pub date_policy: DateColumnPolicy,

    /// Display style for reformatted dates.
    pub date_style: DateStyle,

    /// Which column holds the packed case numbers.
    pub identifier: IdentifierColumn,
}

/// Result of a complete pipeline run.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// The normalized, expanded table, for preview.
    pub table: Table,

    /// The serialized output workbook.
    pub xlsx: Vec<u8>,

    /// Run metadata.
    pub info: SheetInfo,
}

/// Metadata about one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct SheetInfo {
    /// Rows in the raw worksheet, boilerplate included.
    pub raw_rows: usize,

    /// Data rows after trimming and header promotion.
    pub body_rows: usize,

    /// Data rows after identifier expansion.
    pub expanded_rows: usize,

    /// Which report template variant was detected.
    pub layout: ReportLayout,

    /// Column names the date policy selected.
    pub date_columns: Vec<String>,
}

/// Run the full pipeline on an uploaded workbook.
///
/// A malformed workbook is a hard failure with no partial output. A sheet
/// shorter than the fixed trim offsets produces an empty (but valid) result;
/// that precondition is the caller's to meet, not ours to check.
pub fn process_bytes(bytes: &[u8], options: &ProcessOptions) -> PipelineResult<ProcessResult> {
    log_info("Reading workbook...");
    let raw = read_workbook(bytes)?;
    let raw_rows = raw.len();
    log_success(format!("Read {} rows", raw_rows));

    let (table, layout) = trim_report(raw);
    log_success(format!(
        "Trimmed to {} data rows ({} layout)",
        table.row_count(),
        layout
    ));
    if table.is_empty() {
        log_warning("No data rows left after trimming");
    }

    let table = normalize(table, &options.date_policy, options.date_style);
    let date_column_names: Vec<String> = date_columns(&table, &options.date_policy)
        .into_iter()
        .map(|i| table.headers[i].clone())
        .collect();
    if !date_column_names.is_empty() {
        log_success(format!("Date columns: {}", date_column_names.join(", ")));
    }

    let body_rows = table.row_count();
    let expanded = expand(&table, &options.identifier);
    log_success(format!(
        "Expanded {} rows into {}",
        body_rows,
        expanded.row_count()
    ));

    let xlsx = write_xlsx(&expanded, OUTPUT_SHEET_NAME)?;

    let info = SheetInfo {
        raw_rows,
        body_rows,
        expanded_rows: expanded.row_count(),
        layout,
        date_columns: date_column_names,
    };

    Ok(ProcessResult {
        table: expanded,
        xlsx,
        info,
    })
}

/// Run the pipeline on a workbook file.
pub fn process_file<P: AsRef<Path>>(
    path: P,
    options: &ProcessOptions,
) -> PipelineResult<ProcessResult> {
    let bytes = std::fs::read(path)?;
    process_bytes(&bytes, options)
}
