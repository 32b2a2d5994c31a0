//! Build output records from sheet rows.
//!
//! # Join
//!
//! ```text
//! Assets (mqtt.points)          Asset Payload Types (points_type, points, units)
//! AHU-1  hvac  ──────────┬────▶ hvac  temp  F
//!                        └────▶ hvac  temp  C
//! VAV-7  vav   ───────────────▶ vav   flow  cfm
//! ```
//!
//! An asset is processed only if its type appears in the payload sheet
//! ([`ValidTypeSet`]). Its pointset is every payload row of that type.

use serde_json::json;
use std::collections::HashSet;

use crate::models::{AssetMetadata, AssetRow, Location, PayloadTypeRow, PointsetData, Relationships};
use crate::parser::{Cell, JoinKey};

use super::normalize::{normalize_scalar, parse_fed_by};

/// Distinct points-type codes of the payload sheet.
#[derive(Debug, Clone, Default)]
pub struct ValidTypeSet {
    types: HashSet<JoinKey>,
}

impl ValidTypeSet {
    /// Collect every non-missing `points_type`, regardless of which assets use it.
    pub fn from_payload_rows(rows: &[PayloadTypeRow]) -> Self {
        Self {
            types: rows.iter().filter_map(|r| r.points_type.join_key()).collect(),
        }
    }

    /// Whether an asset with this type code should be processed.
    pub fn accepts(&self, points_type: &Cell) -> bool {
        points_type
            .join_key()
            .is_some_and(|key| self.types.contains(&key))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Build the `metadata.json` record for one asset.
///
/// The instance name is kept as is; every other scalar goes through
/// [`normalize_scalar`], isFedBy through [`parse_fed_by`].
pub fn build_metadata(asset: &AssetRow) -> AssetMetadata {
    AssetMetadata {
        instname: asset.instance_name.to_json(),
        vendorname: normalize_scalar(&asset.manufacturer),
        modelname: normalize_scalar(&asset.model),
        firmware: normalize_scalar(&asset.firmware_version),
        software_version: normalize_scalar(&asset.software_version),
        serial_number: normalize_scalar(&asset.serial_number),
        eng_unit_type: normalize_scalar(&asset.eng_unit_type),
        eng_asset_tag: normalize_scalar(&asset.eng_asset_tag),
        location: Location {
            x_coord: normalize_scalar(&asset.x_coord),
            y_coord: normalize_scalar(&asset.y_coord),
        },
        relationships: Relationships {
            has_location: normalize_scalar(&asset.has_location),
            is_associated_with: normalize_scalar(&asset.is_associated_with),
            is_part_of: normalize_scalar(&asset.is_part_of),
            is_fed_by: parse_fed_by(&asset.is_fed_by),
        },
    }
}

/// Build the pointset for an asset type.
///
/// Payload rows are scanned in sheet order. When a point name repeats, the
/// last row's units win and the point keeps the position of its first
/// occurrence. An empty result means no `pointset.json` for the asset.
pub fn build_pointset(points_type: &Cell, payload_rows: &[PayloadTypeRow]) -> PointsetData {
    let mut pointset = PointsetData::default();
    let Some(key) = points_type.join_key() else {
        return pointset;
    };

    for row in payload_rows {
        if row.points_type.join_key().as_ref() == Some(&key) {
            pointset.points.insert(
                row.point_name.key_text(),
                json!({ "units": normalize_scalar(&row.units) }),
            );
        }
    }

    pointset
}
