//! Derived shapes for the jurisdiction boundary: the dimming mask, the
//! outline, and the bounding box used to fit the initial view.

use geo::{BoundingRect, LineString, MultiLineString, MultiPolygon, Polygon, Rect};

/// Whole-world polygon with one hole per boundary polygon, covering
/// everything outside the jurisdiction.
#[must_use]
pub fn world_mask(boundary: &MultiPolygon<f64>) -> Polygon<f64> {
    let world = LineString::from(vec![
        (-180.0, -90.0),
        (180.0, -90.0),
        (180.0, 90.0),
        (-180.0, 90.0),
        (-180.0, -90.0),
    ]);
    let holes = boundary.0.iter().map(|p| p.exterior().clone()).collect();
    Polygon::new(world, holes)
}

/// Every ring of the boundary as a line string.
#[must_use]
pub fn outline(boundary: &MultiPolygon<f64>) -> MultiLineString<f64> {
    MultiLineString::new(
        boundary
            .0
            .iter()
            .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
            .cloned()
            .collect(),
    )
}

#[must_use]
pub fn bounds(boundary: &MultiPolygon<f64>) -> Option<Rect<f64>> {
    boundary.bounding_rect()
}
