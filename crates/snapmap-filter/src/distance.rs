//! Great-circle distance on a spherical Earth.

use geo::{Distance, Haversine, Point};
use snapmap_core::DistanceUnit;

/// Haversine distance between two lon/lat points in the requested unit,
/// on the mean Earth radius (6371.0088 km).
#[must_use]
pub fn haversine_distance(from: Point<f64>, to: Point<f64>, unit: DistanceUnit) -> f64 {
    let meters = Haversine::distance(from, to);
    unit.from_kilometers(meters / 1000.0)
}
