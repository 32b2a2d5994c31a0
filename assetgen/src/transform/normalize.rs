//! Cell to JSON scalar conversion.

use serde_json::{json, Value};

use crate::parser::Cell;

/// Convert a cell to the JSON scalar written to output files.
///
/// Missing cells become `""`, integers stay integers, everything else passes
/// through unchanged.
pub fn normalize_scalar(cell: &Cell) -> Value {
    match cell {
        Cell::Missing => json!(""),
        Cell::Int(i) => json!(i),
        Cell::Float(f) => json!(f),
        Cell::Bool(b) => json!(b),
        Cell::Text(s) => json!(s),
    }
}

/// Split an isFedBy cell into its references.
///
/// The cell's string form is split on `,` and each piece trimmed. A missing
/// cell still yields one piece, so the result is never empty: `[""]`.
pub fn parse_fed_by(cell: &Cell) -> Vec<Value> {
    if cell.is_missing() {
        return vec![normalize_scalar(cell)];
    }

    cell.to_string()
        .split(',')
        .map(|piece| normalize_scalar(&Cell::Text(piece.trim().to_string())))
        .collect()
}
