//! Write per-asset output directories.
//!
//! ```text
//! <output root>/
//! └── AHU-1/
//!     ├── metadata.json    always
//!     └── pointset.json    only when the asset type has points
//! ```
//!
//! Files are overwritten in place. There is no temp-file-and-rename step, so
//! a crash mid-write can leave a truncated file.

pub mod format;

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EmitError, EmitResult};
use crate::logs::log_success;
use crate::models::{AssetMetadata, PointsetData};

pub use format::{to_ascii_pretty, AsciiPrettyFormatter};

pub const METADATA_FILE: &str = "metadata.json";
pub const POINTSET_FILE: &str = "pointset.json";

/// Records for one asset, ready to be written.
#[derive(Debug, Clone)]
pub struct AssetOutput {
    /// Directory name under the output root.
    pub folder: String,
    pub metadata: AssetMetadata,
    pub pointset: PointsetData,
}

/// Paths written for one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedAsset {
    pub folder: String,
    pub metadata_path: PathBuf,
    pub pointset_path: Option<PathBuf>,
}

/// Writes asset directories under a root directory.
#[derive(Debug, Clone)]
pub struct Emitter {
    root: PathBuf,
}

impl Emitter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write `metadata.json`, then `pointset.json` if the pointset has points.
    pub fn emit(&self, output: &AssetOutput) -> EmitResult<EmittedAsset> {
        let dir = self.root.join(&output.folder);
        fs::create_dir_all(&dir).map_err(|source| EmitError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let metadata_path = dir.join(METADATA_FILE);
        write_json(&metadata_path, &output.metadata)?;
        log_success(metadata_created_line(&output.folder, &metadata_path));

        let pointset_path = if output.pointset.is_empty() {
            None
        } else {
            let path = dir.join(POINTSET_FILE);
            write_json(&path, &output.pointset)?;
            log_success(pointset_created_line(&output.folder, &path));
            Some(path)
        };

        Ok(EmittedAsset {
            folder: output.folder.clone(),
            metadata_path,
            pointset_path,
        })
    }
}

/// Confirmation printed after writing `metadata.json`.
pub fn metadata_created_line(instance: &str, path: &Path) -> String {
    format!(
        "Metadata file successfully created for instance {}: {}",
        instance,
        path.display()
    )
}

/// Confirmation printed after writing `pointset.json`.
pub fn pointset_created_line(asset: &str, path: &Path) -> String {
    format!(
        "Pointset file successfully created for asset {}: {}",
        asset,
        path.display()
    )
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> EmitResult<()> {
    let bytes = to_ascii_pretty(value)?;
    fs::write(path, bytes).map_err(|source| EmitError::Write {
        path: path.to_path_buf(),
        source,
    })
}
