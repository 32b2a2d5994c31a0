//! High-level pipeline: workbook in, asset directories out.
//!
//! # Example
//!
//! ```rust,ignore
//! use assetgen::{generate_metadata, GenerateOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = generate_metadata(Path::new("site/assets.xlsx"), &GenerateOptions::default())?;
//!     println!("{} assets written", report.emitted.len());
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use super::builder::{build_metadata, build_pointset, ValidTypeSet};
use crate::emit::{AssetOutput, EmittedAsset, Emitter};
use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_info, log_info_indent, log_warning};
use crate::models::{AssetRow, PayloadTypeRow};
use crate::parser::{load_workbook, Workbook};
use crate::schema::{sheets, AssetColumns, PayloadTypeColumns};
use crate::validation::check_output;

/// Options for the generation pipeline
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Where asset directories go. Defaults to the workbook's directory.
    pub output_dir: Option<PathBuf>,

    /// Skip schema validation of records before writing
    pub skip_validation: bool,
}

/// An asset row left out because its type has no payload definition.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedAsset {
    /// 1-based sheet row, header included
    pub row: usize,
    pub instance_name: String,
    pub points_type: String,
}

/// Result of a complete run
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    /// Directory asset folders were written under
    pub output_root: PathBuf,
    /// Number of rows in the Assets sheet
    pub asset_rows: usize,
    /// Assets written, in sheet order
    pub emitted: Vec<EmittedAsset>,
    /// Assets skipped by the type filter, in sheet order
    pub skipped: Vec<SkippedAsset>,
}

impl GenerateReport {
    pub fn pointset_count(&self) -> usize {
        self.emitted.iter().filter(|a| a.pointset_path.is_some()).count()
    }
}

/// Generate asset directories from the workbook at `path`.
///
/// This is the main entry point. It:
/// 1. Loads every sheet of the workbook
/// 2. Collects the valid points types from "Asset Payload Types"
/// 3. For each "Assets" row of a valid type, builds metadata and pointset
/// 4. Writes them under `<workbook dir>/<instance name>/`
///
/// The first failing row stops the run; folders written before it stay.
pub fn generate_metadata(
    path: &Path,
    options: &GenerateOptions,
) -> PipelineResult<GenerateReport> {
    log_info(format!("Reading workbook {}", path.display()));
    let workbook = load_workbook(path)?;

    let output_root = match &options.output_dir {
        Some(dir) => dir.clone(),
        None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    generate_from_workbook(&workbook, &output_root, options)
}

/// Run the pipeline on an already loaded workbook.
pub fn generate_from_workbook(
    workbook: &Workbook,
    output_root: &Path,
    options: &GenerateOptions,
) -> PipelineResult<GenerateReport> {
    let assets_sheet = workbook.require_sheet(sheets::ASSETS)?;
    let payload_sheet = workbook.require_sheet(sheets::PAYLOAD_TYPES)?;

    let payload_cols = PayloadTypeColumns::resolve(payload_sheet)?;
    let payload_rows: Vec<PayloadTypeRow> = payload_sheet
        .rows()
        .iter()
        .map(|cells| PayloadTypeRow::from_cells(cells, &payload_cols))
        .collect();
    let valid_types = ValidTypeSet::from_payload_rows(&payload_rows);
    log_info(format!(
        "{} payload rows, {} points types",
        payload_rows.len(),
        valid_types.len()
    ));

    let asset_cols = AssetColumns::resolve(assets_sheet)?;
    let emitter = Emitter::new(output_root);

    let mut report = GenerateReport {
        output_root: output_root.to_path_buf(),
        asset_rows: assets_sheet.len(),
        ..Default::default()
    };
    let mut seen_folders = HashSet::new();

    for (row, cells) in assets_sheet.numbered_rows() {
        let asset = AssetRow::from_cells(row, cells, &asset_cols);

        if !valid_types.accepts(&asset.points_type) {
            log_info_indent(
                format!("Skipping row {}: unknown points type '{}'", asset.row, asset.points_type),
                1,
            );
            report.skipped.push(SkippedAsset {
                row: asset.row,
                instance_name: asset.instance_name.to_string(),
                points_type: asset.points_type.to_string(),
            });
            continue;
        }

        let output = build_output(&asset, &payload_rows)?;

        if !seen_folders.insert(output.folder.clone()) {
            log_warning(format!(
                "Instance name '{}' appears more than once; row {} overwrites earlier output",
                output.folder, asset.row
            ));
        }

        if !options.skip_validation {
            check_output(&output)?;
        }

        report.emitted.push(emitter.emit(&output)?);
    }

    log_info(format!(
        "{} assets written ({} with pointsets), {} skipped",
        report.emitted.len(),
        report.pointset_count(),
        report.skipped.len()
    ));

    Ok(report)
}

/// Build both records for one asset row.
///
/// The instance name must be usable as a single folder name so that output
/// stays under the output root.
pub fn build_output(
    asset: &AssetRow,
    payload_rows: &[PayloadTypeRow],
) -> PipelineResult<AssetOutput> {
    if asset.instance_name.is_missing() {
        return Err(PipelineError::MissingInstanceName { row: asset.row });
    }

    let folder = asset.instance_name.to_string();
    if !is_plain_folder_name(&folder) {
        return Err(PipelineError::InvalidInstanceName {
            row: asset.row,
            name: folder,
        });
    }

    Ok(AssetOutput {
        folder,
        metadata: build_metadata(asset),
        pointset: build_pointset(&asset.points_type, payload_rows),
    })
}

fn is_plain_folder_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
