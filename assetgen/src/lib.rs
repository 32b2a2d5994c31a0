//! # assetgen - per-asset metadata and pointset generation
//!
//! assetgen reads an asset workbook (an "Assets" sheet and an "Asset Payload
//! Types" sheet) and writes one `metadata.json` and one `pointset.json` per
//! asset into a folder named after the asset.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌──────────────────┐
//! │  Workbook   │────▶│   Parser    │────▶│  Transform  │────▶│ <asset>/         │
//! │ (xlsx/ods)  │     │  (sheets)   │     │ (join+build)│     │  metadata.json   │
//! └─────────────┘     └─────────────┘     └─────────────┘     │  pointset.json   │
//!                                                             └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use assetgen::{generate_metadata, GenerateOptions};
//! use std::path::Path;
//!
//! let report = generate_metadata(Path::new("site/assets.xlsx"), &GenerateOptions::default())?;
//! println!("Wrote {} assets", report.emitted.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`schema`] - Sheet names and column headers
//! - [`models`] - Input rows and output records
//! - [`parser`] - Workbook loading
//! - [`transform`] - Normalization, join, and pipeline
//! - [`emit`] - Output directories and JSON layout
//! - [`validation`] - JSON Schema checks of output records
//! - [`logs`] - Console logging

// Core modules
pub mod error;
pub mod models;
pub mod schema;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod emit;

// Validation
pub mod validation;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    EmitError,
    PipelineError,
    PipelineResult,
    SchemaError,
    ValidationError,
    WorkbookError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    AssetMetadata,
    AssetRow,
    Location,
    PayloadTypeRow,
    PointsetData,
    Relationships,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{load_workbook, Cell, JoinKey, Sheet, Workbook};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    build_metadata,
    build_output,
    build_pointset,
    generate_from_workbook,
    generate_metadata,
    normalize_scalar,
    parse_fed_by,
    GenerateOptions,
    GenerateReport,
    SkippedAsset,
    ValidTypeSet,
};

// =============================================================================
// Re-exports - Emit
// =============================================================================

pub use emit::{AssetOutput, EmittedAsset, Emitter};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    check_output,
    is_valid_metadata,
    is_valid_pointset,
    validate_metadata,
    validate_output_dir,
    validate_pointset,
    FileCheck,
};
