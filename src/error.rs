//! Error types for the caseflat processing pipeline.
//!
//! One error enum per concern:
//!
//! - [`SheetError`] - workbook reading and report trimming
//! - [`XlsxWriteError`] - spreadsheet serialization
//! - [`PipelineError`] - top-level orchestration errors
//! - [`ServerError`] - HTTP layer errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Workbook Reading Errors
// =============================================================================

/// Errors while reading the uploaded workbook.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The workbook archive is malformed or not an XLSX file.
    #[error("Invalid workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    /// The workbook has no worksheets.
    #[error("Workbook contains no worksheets")]
    NoWorksheet,
}

// =============================================================================
// Spreadsheet Writing Errors
// =============================================================================

/// Errors while serializing the processed table to XLSX.
#[derive(Debug, Error)]
pub enum XlsxWriteError {
    /// Underlying I/O failure.
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive failure.
    #[error("Archive failed: {0}")]
    Zip(#[from] zip::result::ZipError),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::pipeline::process_bytes`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Workbook reading error.
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Serialization error.
    #[error("Serialize error: {0}")]
    Write(#[from] XlsxWriteError),

    /// Failed to read input.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for workbook reading.
pub type SheetResult<T> = Result<T, SheetError>;

/// Result type for spreadsheet writing.
pub type XlsxResult<T> = Result<T, XlsxWriteError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
