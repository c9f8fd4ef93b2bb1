//! Extent computation for viewport fitting

use crate::types::{BoundingBox, Geometry};

/// Computes the box covering every vertex of every geometry.
///
/// Returns `None` when there is no vertex at all (empty input or only
/// `Unsupported` geometries).
pub fn extent_of<'a, I>(geometries: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a Geometry>,
{
    let mut extent: Option<BoundingBox> = None;
    for geometry in geometries {
        geometry.for_each_vertex(|p| match extent.as_mut() {
            Some(b) => b.extend(p),
            None => extent = Some(BoundingBox::from_point(p)),
        });
    }
    extent
}

/// Whether the map can be fitted to `extent`: finite, and not collapsed to a
/// single location.
pub fn is_fit_region(extent: &BoundingBox) -> bool {
    extent.is_finite() && (extent.width() > 0.0 || extent.height() > 0.0)
}
