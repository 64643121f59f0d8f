//! REST API types for the upload shell.
//!
//! The preview payload carries the whole processed table; inputs are single
//! small reports, so there is no pagination.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::pipeline::ProcessResult;
use crate::sheet::ReportLayout;

/// Response sent after an upload has been processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier.
    pub job_id: String,

    /// Status: "ready" or "empty".
    pub status: String,

    /// Column names of the processed table.
    pub headers: Vec<String>,

    /// Processed data rows.
    pub rows: Vec<Vec<String>>,

    /// Metadata about the run.
    pub metadata: ResponseMetadata,
}

/// Metadata about the processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Rows in the raw worksheet.
    pub raw_rows: usize,

    /// Data rows after trimming.
    pub body_rows: usize,

    /// Data rows after expansion.
    pub expanded_rows: usize,

    /// Detected report template variant.
    pub layout: ReportLayout,

    /// Columns the date policy selected.
    pub date_columns: Vec<String>,
}

impl From<ProcessResult> for UploadResponse {
    fn from(result: ProcessResult) -> Self {
        let status = if result.table.is_empty() { "empty" } else { "ready" };

        UploadResponse {
            job_id: Uuid::new_v4().to_string(),
            status: status.to_string(),
            headers: result.table.headers,
            rows: result.table.rows,
            metadata: ResponseMetadata {
                raw_rows: result.info.raw_rows,
                body_rows: result.info.body_rows,
                expanded_rows: result.info.expanded_rows,
                layout: result.info.layout,
                date_columns: result.info.date_columns,
            },
        }
    }
}

/// Create an error response body.
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "headers": [],
        "rows": [],
    })
}
