//! Error types for the assetgen pipeline.
//!
//! One enum per stage, wrapped by a top-level [`PipelineError`]:
//!
//! - [`WorkbookError`] - Opening or reading the workbook
//! - [`SchemaError`] - Missing sheets or columns
//! - [`EmitError`] - Writing output files
//! - [`ValidationError`] - Output records rejected by the embedded schemas
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Workbook Errors
// =============================================================================

/// Errors while loading a workbook.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// The file could not be opened or its format is not recognised.
    #[error("Failed to open workbook '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// A sheet exists but could not be read.
    #[error("Failed to read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },
}

// =============================================================================
// Schema Errors
// =============================================================================

/// The workbook does not have the shape the transformation needs.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Required sheet is absent.
    #[error("Missing sheet: '{0}'")]
    MissingSheet(String),

    /// Required column header is absent from a sheet.
    #[error("Missing column '{column}' in sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },
}

// =============================================================================
// Emit Errors
// =============================================================================

/// Errors while writing per-asset output.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Output directory could not be created.
    #[error("Failed to create directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be written.
    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors from output schema validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A record does not match its schema.
    #[error("{kind} for '{instance}' failed validation: {}", .errors.join("; "))]
    SchemaMismatch {
        kind: &'static str,
        instance: String,
        errors: Vec<String>,
    },

    /// A file on disk could not be read or is not JSON.
    #[error("Cannot read '{}': {message}", .path.display())]
    Unreadable { path: PathBuf, message: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::generate_metadata`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Workbook loading error.
    #[error("Workbook error: {0}")]
    Workbook(#[from] WorkbookError),

    /// Missing sheet or column.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Output writing error.
    #[error("Emit error: {0}")]
    Emit(#[from] EmitError),

    /// Output validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A processed asset row has no instance name to name its folder after.
    #[error("Asset row {row} has no instance name")]
    MissingInstanceName { row: usize },

    /// The instance name is not a single plain folder name (path separators,
    /// `..`, or an absolute path).
    #[error("Asset row {row} has instance name '{name}', which is not a plain folder name")]
    InvalidInstanceName { row: usize, name: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for workbook loading.
pub type WorkbookResult<T> = Result<T, WorkbookError>;

/// Result type for schema lookups.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for emitting files.
pub type EmitResult<T> = Result<T, EmitError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
