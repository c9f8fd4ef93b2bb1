//! Spatial predicates over layer geometries
//!
//! This module answers "does this geometry touch the selection box" for the
//! range query, and computes the extents the renderer fits the map to.

mod extent;
mod predicate;

pub use extent::{extent_of, is_fit_region};
pub use predicate::intersects;
