//! Workbook layout: sheet names and column headers.
//!
//! Header strings must match the workbook exactly. Renaming a column in the
//! source template means changing it here and nowhere else.

use crate::error::{SchemaError, SchemaResult};
use crate::parser::Sheet;

/// Sheet names.
pub mod sheets {
    pub const ASSETS: &str = "Assets";
    pub const PAYLOAD_TYPES: &str = "Asset Payload Types";
}

/// Columns of the "Assets" sheet.
pub mod assets {
    pub const INSTANCE_NAME: &str = "mqtt.physical_tag.asset.instance_name";
    pub const POINTS_TYPE: &str = "mqtt.points";
    pub const MANUFACTURER: &str = "mqtt.physical_tag.asset.manufacturer";
    pub const MODEL: &str = "mqtt.physical_tag.asset.model";
    pub const FIRMWARE_VERSION: &str = "mqtt.physical_tag.asset.firmware_version";
    pub const SOFTWARE_VERSION: &str = "mqtt.physical_tag.asset.software_version";
    pub const SERIAL_NUMBER: &str = "mqtt.physical_tag.asset.serial_number";
    pub const ENG_UNIT_TYPE: &str = "mqtt.physical_tag.asset.eng_unit_type";
    pub const ENG_ASSET_TAG: &str = "mqtt.physical_tag.asset.eng_asset_tag";
    pub const X_COORD: &str = "mqtt.physical_tag.asset.location.x_coord";
    pub const Y_COORD: &str = "mqtt.physical_tag.asset.location.y_coord";
    pub const HAS_LOCATION: &str = "mqtt.physical_tag.asset.relationships.hasLocation";
    pub const IS_ASSOCIATED_WITH: &str =
        "mqtt.physical_tag.asset.relationships.isAssociatedWith";
    pub const IS_PART_OF: &str = "mqtt.physical_tag.asset.relationships.isPartOf";
    pub const IS_FED_BY: &str = "mqtt.physical_tag.asset.relationships.isFedBy";

    /// Every column the metadata builder reads.
    pub const ALL: [&str; 15] = [
        INSTANCE_NAME,
        POINTS_TYPE,
        MANUFACTURER,
        MODEL,
        FIRMWARE_VERSION,
        SOFTWARE_VERSION,
        SERIAL_NUMBER,
        ENG_UNIT_TYPE,
        ENG_ASSET_TAG,
        X_COORD,
        Y_COORD,
        HAS_LOCATION,
        IS_ASSOCIATED_WITH,
        IS_PART_OF,
        IS_FED_BY,
    ];
}

/// Columns of the "Asset Payload Types" sheet.
pub mod payload_types {
    pub const POINT_NAME: &str = "mqtt.pointset.points";
    pub const UNITS: &str = "mqtt.pointset.units";
    pub const POINTS_TYPE: &str = "points_type";

    pub const ALL: [&str; 3] = [POINT_NAME, UNITS, POINTS_TYPE];
}

/// Column positions of the "Assets" sheet, resolved once per run.
#[derive(Debug, Clone, Copy)]
pub struct AssetColumns {
    pub instance_name: usize,
    pub points_type: usize,
    pub manufacturer: usize,
    pub model: usize,
    pub firmware_version: usize,
    pub software_version: usize,
    pub serial_number: usize,
    pub eng_unit_type: usize,
    pub eng_asset_tag: usize,
    pub x_coord: usize,
    pub y_coord: usize,
    pub has_location: usize,
    pub is_associated_with: usize,
    pub is_part_of: usize,
    pub is_fed_by: usize,
}

impl AssetColumns {
    pub fn resolve(sheet: &Sheet) -> SchemaResult<Self> {
        let col = |name: &str| column_index(sheet, sheets::ASSETS, name);
        Ok(Self {
            instance_name: col(assets::INSTANCE_NAME)?,
            points_type: col(assets::POINTS_TYPE)?,
            manufacturer: col(assets::MANUFACTURER)?,
            model: col(assets::MODEL)?,
            firmware_version: col(assets::FIRMWARE_VERSION)?,
            software_version: col(assets::SOFTWARE_VERSION)?,
            serial_number: col(assets::SERIAL_NUMBER)?,
            eng_unit_type: col(assets::ENG_UNIT_TYPE)?,
            eng_asset_tag: col(assets::ENG_ASSET_TAG)?,
            x_coord: col(assets::X_COORD)?,
            y_coord: col(assets::Y_COORD)?,
            has_location: col(assets::HAS_LOCATION)?,
            is_associated_with: col(assets::IS_ASSOCIATED_WITH)?,
            is_part_of: col(assets::IS_PART_OF)?,
            is_fed_by: col(assets::IS_FED_BY)?,
        })
    }
}

/// Column positions of the "Asset Payload Types" sheet.
#[derive(Debug, Clone, Copy)]
pub struct PayloadTypeColumns {
    pub point_name: usize,
    pub units: usize,
    pub points_type: usize,
}

impl PayloadTypeColumns {
    pub fn resolve(sheet: &Sheet) -> SchemaResult<Self> {
        let col = |name: &str| column_index(sheet, sheets::PAYLOAD_TYPES, name);
        Ok(Self {
            point_name: col(payload_types::POINT_NAME)?,
            units: col(payload_types::UNITS)?,
            points_type: col(payload_types::POINTS_TYPE)?,
        })
    }
}

fn column_index(sheet: &Sheet, sheet_name: &str, column: &str) -> SchemaResult<usize> {
    sheet
        .column(column)
        .ok_or_else(|| SchemaError::MissingColumn {
            sheet: sheet_name.to_string(),
            column: column.to_string(),
        })
}
