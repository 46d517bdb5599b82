//! Conversion between GeoJSON geometry values and `geo` types, plus the
//! point-in-polygon test every spatial filter goes through.

use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{Coord, LineString, MultiLineString, MultiPolygon, Point, Polygon};
use geojson::Value;

use crate::error::FilterError;

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn coord_from_position(position: &[f64]) -> Result<Coord<f64>, FilterError> {
    match position {
        [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Coord { x: *x, y: *y }),
        [x, y, ..] => Err(FilterError::InvalidCoordinate { lon: *x, lat: *y }),
        _ => Err(FilterError::MalformedGeometry(format!(
            "position has {} element(s); expected at least 2",
            position.len()
        ))),
    }
}

fn ring_from_positions(positions: &[Vec<f64>]) -> Result<LineString<f64>, FilterError> {
    if positions.len() < 4 {
        return Err(FilterError::MalformedGeometry(format!(
            "linear ring has {} position(s); expected four or more",
            positions.len()
        )));
    }
    let coords = positions
        .iter()
        .map(|p| coord_from_position(p))
        .collect::<Result<Vec<_>, _>>()?;
    if coords.first() != coords.last() {
        return Err(FilterError::MalformedGeometry(
            "first and last positions of a linear ring differ".to_string(),
        ));
    }
    Ok(LineString::new(coords))
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Result<Polygon<f64>, FilterError> {
    let (exterior, interiors) = rings
        .split_first()
        .ok_or_else(|| FilterError::MalformedGeometry("polygon has no rings".to_string()))?;
    let exterior = ring_from_positions(exterior)?;
    let interiors = interiors
        .iter()
        .map(|r| ring_from_positions(r))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Convert a GeoJSON `Polygon` or `MultiPolygon` into a [`MultiPolygon`].
///
/// # Errors
///
/// Returns [`FilterError::UnsupportedGeometry`] for other geometry types and
/// [`FilterError::MalformedGeometry`] / [`FilterError::InvalidCoordinate`]
/// when rings are too short, unclosed, or contain bad positions.
pub fn to_multi_polygon(geometry: &geojson::Geometry) -> Result<MultiPolygon<f64>, FilterError> {
    match &geometry.value {
        Value::Polygon(rings) => Ok(MultiPolygon::new(vec![polygon_from_rings(rings)?])),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .map(|rings| polygon_from_rings(rings))
            .collect::<Result<Vec<_>, _>>()
            .map(MultiPolygon::new),
        other => Err(FilterError::UnsupportedGeometry {
            found: value_kind(other),
            expected: "Polygon or MultiPolygon",
        }),
    }
}

/// Convert a GeoJSON `Point` into a [`Point`] (x = longitude, y = latitude).
///
/// # Errors
///
/// Returns an error for non-point geometries and malformed positions.
pub fn to_point(geometry: &geojson::Geometry) -> Result<Point<f64>, FilterError> {
    match &geometry.value {
        Value::Point(position) => coord_from_position(position).map(Point::from),
        other => Err(FilterError::UnsupportedGeometry {
            found: value_kind(other),
            expected: "Point",
        }),
    }
}

/// Whether `point` lies inside `area` or on its boundary. Points inside a hole
/// are outside.
///
/// # Errors
///
/// Returns [`FilterError::InvalidCoordinate`] when the point is not finite.
pub fn contains_point(area: &MultiPolygon<f64>, point: Point<f64>) -> Result<bool, FilterError> {
    if !(point.x().is_finite() && point.y().is_finite()) {
        return Err(FilterError::InvalidCoordinate {
            lon: point.x(),
            lat: point.y(),
        });
    }
    Ok(matches!(
        area.coordinate_position(&point.0),
        CoordPos::Inside | CoordPos::OnBoundary
    ))
}

fn ring_to_positions(ring: &LineString<f64>) -> Vec<Vec<f64>> {
    ring.coords().map(|c| vec![c.x, c.y]).collect()
}

#[must_use]
pub fn polygon_to_value(polygon: &Polygon<f64>) -> Value {
    Value::Polygon(
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(ring_to_positions)
            .collect(),
    )
}

#[must_use]
pub fn multi_line_string_to_value(lines: &MultiLineString<f64>) -> Value {
    Value::MultiLineString(lines.0.iter().map(ring_to_positions).collect())
}
