//! # caseflat - case-record spreadsheet normalizer & expander
//!
//! caseflat ingests the XLSX export of a legal/loan case-record report,
//! strips its boilerplate rows and placeholder columns, normalizes headers
//! and date formatting, and flattens rows whose case-number cell packs
//! several slash-separated cases into one row per case.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐     ┌───────────┐     ┌────────────┐     ┌──────────┐     ┌────────────┐
//! │ XLSX in  │────▶│ Trimmer   │────▶│ Normalizer │────▶│ Expander │────▶│ XLSX out   │
//! └──────────┘     └───────────┘     └────────────┘     └──────────┘     └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use caseflat::{process_bytes, ProcessOptions};
//!
//! let bytes = std::fs::read("report.xlsx")?;
//! let result = process_bytes(&bytes, &ProcessOptions::default())?;
//! std::fs::write("processed_data.xlsx", &result.xlsx)?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`table`] - In-memory tabular data model
//! - [`sheet`] - Workbook loading, trimming, layout classification
//! - [`normalize`] - Header de-duplication and date reformatting
//! - [`expand`] - One-to-many identifier expansion
//! - [`xlsx`] - Single-sheet XLSX serialization
//! - [`pipeline`] - End-to-end orchestration
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod table;

// Loading
pub mod sheet;

// Transformation
pub mod expand;
pub mod normalize;

// Serialization
pub mod xlsx;

// Orchestration
pub mod pipeline;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{PipelineError, ServerError, SheetError, XlsxWriteError};

// =============================================================================
// Re-exports - Data model
// =============================================================================

pub use table::{RawTable, Table};

// =============================================================================
// Re-exports - Loader/Trimmer
// =============================================================================

pub use sheet::{
    classify_layout, load_and_trim, read_workbook, trim_report, ReportLayout,
    LEADING_BOILERPLATE_ROWS, TRAILING_BOILERPLATE_ROWS,
};

// =============================================================================
// Re-exports - Normalizer
// =============================================================================

pub use normalize::{
    column_date_ratio, date_columns, dedup_headers, normalize, parse_date, DateColumnPolicy,
    DateStyle, DEFAULT_DATE_COLUMNS, MISSING_DATE_MARKER,
};

// =============================================================================
// Re-exports - Expander
// =============================================================================

pub use expand::{expand, split_identifier, IdentifierColumn, DEFAULT_IDENTIFIER_COLUMN};

// =============================================================================
// Re-exports - Serializer
// =============================================================================

pub use xlsx::{write_xlsx, write_xlsx_file, OUTPUT_SHEET_NAME, XLSX_MIME};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{process_bytes, process_file, ProcessOptions, ProcessResult, SheetInfo};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ResponseMetadata, UploadResponse};

// Server
pub mod server {
    pub use crate::api::server::{start_server, DOWNLOAD_FILE_NAME};
}
