//! Transformation module.
//!
//! - Normalize: cell to JSON scalar, isFedBy splitting
//! - Builder: type filter, metadata and pointset records
//! - Pipeline: load, filter, build, emit

pub mod builder;
pub mod normalize;
pub mod pipeline;

pub use builder::{build_metadata, build_pointset, ValidTypeSet};
pub use normalize::{normalize_scalar, parse_fed_by};
pub use pipeline::*;
