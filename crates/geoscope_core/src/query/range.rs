//! Bounding-box range query

use super::{timed_filter, QueryKind, QueryResult};
use crate::spatial::intersects;
use crate::types::{BoundingBox, Feature};

/// Returns every feature whose geometry intersects `bbox`.
pub fn range_query(features: &[Feature], bbox: &BoundingBox) -> QueryResult {
    timed_filter(QueryKind::Range, features, |f| intersects(&f.geometry, bbox))
}
