//! Domain models for the assetgen pipeline.
//!
//! Input rows:
//!
//! - [`AssetRow`] - One row of the "Assets" sheet
//! - [`PayloadTypeRow`] - One row of the "Asset Payload Types" sheet
//!
//! Output records:
//!
//! - [`AssetMetadata`] - Contents of `metadata.json`
//! - [`PointsetData`] - Contents of `pointset.json`

use serde::Serialize;
use serde_json::{Map, Value};

use crate::parser::Cell;
use crate::schema::{AssetColumns, PayloadTypeColumns};

// =============================================================================
// Input Rows
// =============================================================================

/// An asset as described by one row of the "Assets" sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRow {
    /// 1-based row number in the sheet, header included.
    pub row: usize,
    pub instance_name: Cell,
    /// Join key against [`PayloadTypeRow::points_type`].
    pub points_type: Cell,
    pub manufacturer: Cell,
    pub model: Cell,
    pub firmware_version: Cell,
    pub software_version: Cell,
    pub serial_number: Cell,
    pub eng_unit_type: Cell,
    pub eng_asset_tag: Cell,
    pub x_coord: Cell,
    pub y_coord: Cell,
    pub has_location: Cell,
    pub is_associated_with: Cell,
    pub is_part_of: Cell,
    /// Comma-separated references, see [`crate::transform::parse_fed_by`].
    pub is_fed_by: Cell,
}

impl AssetRow {
    pub fn from_cells(row: usize, cells: &[Cell], cols: &AssetColumns) -> Self {
        let get = |i: usize| cells.get(i).cloned().unwrap_or(Cell::Missing);
        Self {
            row,
            instance_name: get(cols.instance_name),
            points_type: get(cols.points_type),
            manufacturer: get(cols.manufacturer),
            model: get(cols.model),
            firmware_version: get(cols.firmware_version),
            software_version: get(cols.software_version),
            serial_number: get(cols.serial_number),
            eng_unit_type: get(cols.eng_unit_type),
            eng_asset_tag: get(cols.eng_asset_tag),
            x_coord: get(cols.x_coord),
            y_coord: get(cols.y_coord),
            has_location: get(cols.has_location),
            is_associated_with: get(cols.is_associated_with),
            is_part_of: get(cols.is_part_of),
            is_fed_by: get(cols.is_fed_by),
        }
    }

    /// An asset row with only a name and a type; every other cell missing.
    pub fn new(instance_name: impl Into<String>, points_type: impl Into<String>) -> Self {
        Self {
            row: 0,
            instance_name: Cell::Text(instance_name.into()),
            points_type: Cell::Text(points_type.into()),
            manufacturer: Cell::Missing,
            model: Cell::Missing,
            firmware_version: Cell::Missing,
            software_version: Cell::Missing,
            serial_number: Cell::Missing,
            eng_unit_type: Cell::Missing,
            eng_asset_tag: Cell::Missing,
            x_coord: Cell::Missing,
            y_coord: Cell::Missing,
            has_location: Cell::Missing,
            is_associated_with: Cell::Missing,
            is_part_of: Cell::Missing,
            is_fed_by: Cell::Missing,
        }
    }
}

/// A point definition from the "Asset Payload Types" sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadTypeRow {
    pub point_name: Cell,
    pub units: Cell,
    pub points_type: Cell,
}

impl PayloadTypeRow {
    pub fn from_cells(cells: &[Cell], cols: &PayloadTypeColumns) -> Self {
        let get = |i: usize| cells.get(i).cloned().unwrap_or(Cell::Missing);
        Self {
            point_name: get(cols.point_name),
            units: get(cols.units),
            points_type: get(cols.points_type),
        }
    }

    pub fn new(point_name: &str, units: &str, points_type: &str) -> Self {
        Self {
            point_name: Cell::from_text(point_name),
            units: Cell::from_text(units),
            points_type: Cell::from_text(points_type),
        }
    }
}

// =============================================================================
// Output Records
// =============================================================================

/// Contents of `metadata.json`. Field order is the JSON key order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssetMetadata {
    pub instname: Value,
    pub vendorname: Value,
    pub modelname: Value,
    pub firmware: Value,
    pub software_version: Value,
    pub serial_number: Value,
    pub eng_unit_type: Value,
    pub eng_asset_tag: Value,
    pub location: Location,
    pub relationships: Relationships,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Location {
    pub x_coord: Value,
    pub y_coord: Value,
}

/// References to other assets and spaces.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Relationships {
    pub has_location: Value,
    pub is_associated_with: Value,
    pub is_part_of: Value,
    /// Never empty.
    pub is_fed_by: Vec<Value>,
}

/// Contents of `pointset.json`: point name to `{"units": ...}`, in first-seen order.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PointsetData {
    pub points: Map<String, Value>,
}

impl PointsetData {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}
