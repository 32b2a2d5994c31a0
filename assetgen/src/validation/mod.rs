//! JSON Schema validation for emitted asset files.
//!
//! Schemas (Draft 7) are embedded at compile time from `schemas/`:
//! - `asset-metadata.json` - shape of `metadata.json`
//! - `asset-pointset.json` - shape of `pointset.json`
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use assetgen::validation::is_valid_pointset;
//!
//! assert!(is_valid_pointset(&json!({ "points": { "temp": { "units": "C" } } })));
//! assert!(!is_valid_pointset(&json!({ "points": {} })));
//! ```

use jsonschema::Validator;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::emit::{AssetOutput, METADATA_FILE, POINTSET_FILE};
use crate::error::ValidationError;

static METADATA_VALIDATOR: OnceLock<Validator> = OnceLock::new();
static POINTSET_VALIDATOR: OnceLock<Validator> = OnceLock::new();

fn compile(source: &str) -> Validator {
    let schema: Value = serde_json::from_str(source).expect("Invalid embedded schema");
    jsonschema::draft7::new(&schema).expect("Invalid embedded schema")
}

fn metadata_validator() -> &'static Validator {
    METADATA_VALIDATOR.get_or_init(|| compile(include_str!("../../schemas/asset-metadata.json")))
}

fn pointset_validator() -> &'static Validator {
    POINTSET_VALIDATOR.get_or_init(|| compile(include_str!("../../schemas/asset-pointset.json")))
}

fn collect_errors(validator: &Validator, data: &Value) -> Result<(), Vec<String>> {
    let errors: Vec<String> = validator.iter_errors(data).map(|e| e.to_string()).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate any JSON value against an arbitrary schema.
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator =
        jsonschema::draft7::new(schema).map_err(|e| vec![format!("Invalid schema: {}", e)])?;
    collect_errors(&validator, data)
}

/// Validate a `metadata.json` document.
pub fn validate_metadata(data: &Value) -> Result<(), Vec<String>> {
    collect_errors(metadata_validator(), data)
}

pub fn is_valid_metadata(data: &Value) -> bool {
    metadata_validator().is_valid(data)
}

/// Validate a `pointset.json` document.
pub fn validate_pointset(data: &Value) -> Result<(), Vec<String>> {
    collect_errors(pointset_validator(), data)
}

pub fn is_valid_pointset(data: &Value) -> bool {
    pointset_validator().is_valid(data)
}

/// Check the records of one asset before they are written.
pub fn check_output(output: &AssetOutput) -> Result<(), ValidationError> {
    let mismatch = |kind: &'static str, errors: Vec<String>| ValidationError::SchemaMismatch {
        kind,
        instance: output.folder.clone(),
        errors,
    };

    let metadata = serde_json::to_value(&output.metadata)
        .map_err(|e| mismatch("metadata", vec![e.to_string()]))?;
    validate_metadata(&metadata).map_err(|errors| mismatch("metadata", errors))?;

    if !output.pointset.is_empty() {
        let pointset = serde_json::to_value(&output.pointset)
            .map_err(|e| mismatch("pointset", vec![e.to_string()]))?;
        validate_pointset(&pointset).map_err(|errors| mismatch("pointset", errors))?;
    }

    Ok(())
}

/// Outcome of checking one file on disk.
#[derive(Debug, Clone)]
pub struct FileCheck {
    pub path: PathBuf,
    /// Empty when the file is valid.
    pub errors: Vec<String>,
}

impl FileCheck {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate every `<dir>/<asset>/metadata.json` and `pointset.json`.
///
/// Subdirectories without a `metadata.json` are not asset folders and are
/// ignored. Results are sorted by path.
pub fn validate_output_dir(dir: &Path) -> Result<Vec<FileCheck>, ValidationError> {
    let unreadable = |e: std::io::Error| ValidationError::Unreadable {
        path: dir.to_path_buf(),
        message: e.to_string(),
    };

    let mut asset_dirs: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(unreadable)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir() && path.join(METADATA_FILE).is_file())
        .collect();
    asset_dirs.sort();

    let mut checks = Vec::new();
    for asset_dir in asset_dirs {
        checks.push(check_file(&asset_dir.join(METADATA_FILE), validate_metadata));

        let pointset_path = asset_dir.join(POINTSET_FILE);
        if pointset_path.is_file() {
            checks.push(check_file(&pointset_path, validate_pointset));
        }
    }

    Ok(checks)
}

fn check_file(path: &Path, validate: fn(&Value) -> Result<(), Vec<String>>) -> FileCheck {
    let errors = match fs::read_to_string(path) {
        Err(e) => vec![format!("Cannot read file: {}", e)],
        Ok(content) => match serde_json::from_str::<Value>(&content) {
            Err(e) => vec![format!("Invalid JSON: {}", e)],
            Ok(value) => validate(&value).err().unwrap_or_default(),
        },
    };

    FileCheck {
        path: path.to_path_buf(),
        errors,
    }
}
