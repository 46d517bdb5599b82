//! Walking-directions links for retailers.

use geo::Point;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const MAPS_BASE: &str = "https://www.google.com/maps";

/// Characters left unescaped in a URI component.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn lat_lon(point: Point<f64>) -> String {
    let raw = format!("{},{}", point.y(), point.x());
    utf8_percent_encode(&raw, URI_COMPONENT).to_string()
}

/// Walking directions from `origin` to `destination`, or a plain location
/// search for `destination` when no origin is known.
#[must_use]
pub fn directions_url(origin: Option<Point<f64>>, destination: Point<f64>) -> String {
    match origin {
        Some(origin) => format!(
            "{MAPS_BASE}/dir/?api=1&origin={}&destination={}&travelmode=walking",
            lat_lon(origin),
            lat_lon(destination)
        ),
        None => format!("{MAPS_BASE}/search/?api=1&query={}", lat_lon(destination)),
    }
}
