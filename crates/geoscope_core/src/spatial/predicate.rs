//! Geometry/box intersection test used by range queries.
//!
//! Lines and polygons are tested by vertex containment only: a line that
//! crosses the box without a vertex inside it is a miss. Polygon holes are
//! ignored.

use crate::types::{BoundingBox, Geometry, LonLat};

/// Returns true when `geometry` has at least one vertex inside `bbox`.
///
/// `Unsupported` geometries never intersect.
pub fn intersects(geometry: &Geometry, bbox: &BoundingBox) -> bool {
    match geometry {
        Geometry::Point { coordinates } => bbox.contains(*coordinates),
        Geometry::LineString { coordinates } => line_intersects(coordinates, bbox),
        Geometry::Polygon { coordinates } => polygon_intersects(coordinates, bbox),
        Geometry::MultiPoint { coordinates } => coordinates.iter().any(|p| bbox.contains(*p)),
        Geometry::MultiLineString { coordinates } => {
            coordinates.iter().any(|line| line_intersects(line, bbox))
        }
        Geometry::MultiPolygon { coordinates } => coordinates
            .iter()
            .any(|polygon| polygon_intersects(polygon, bbox)),
        Geometry::Unsupported => false,
    }
}

#[inline]
fn line_intersects(vertices: &[LonLat], bbox: &BoundingBox) -> bool {
    vertices.iter().any(|p| bbox.contains(*p))
}

/// Outer ring only.
#[inline]
fn polygon_intersects(rings: &[Vec<LonLat>], bbox: &BoundingBox) -> bool {
    rings
        .first()
        .is_some_and(|outer| line_intersects(outer, bbox))
}
