//! Region geometry index: ward or county id → polygon boundary.

use std::collections::HashMap;

use geo::{MultiPolygon, Point};
use geojson::{Feature, FeatureCollection};

use crate::error::FilterError;
use crate::geometry::{contains_point, to_multi_polygon};
use crate::types::property_text;

/// Kind of administrative area, which decides the attribute names read from
/// each feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Ward,
    County,
}

impl RegionKind {
    /// Identifier attributes, tried in order; the first non-empty one wins.
    #[must_use]
    pub fn id_keys(self) -> &'static [&'static str] {
        match self {
            RegionKind::Ward => &["WARD_ID", "WARD"],
            RegionKind::County => &["GEOID", "COUNTYFP", "COUNTY_ID", "NAME"],
        }
    }

    #[must_use]
    pub fn label_keys(self) -> &'static [&'static str] {
        match self {
            RegionKind::Ward => &["NAME", "LABEL"],
            RegionKind::County => &["NAMELSAD", "NAME", "LABEL"],
        }
    }

    fn default_label(self, id: &str) -> String {
        match self {
            RegionKind::Ward => format!("Ward {id}"),
            RegionKind::County => format!("County {id}"),
        }
    }
}

impl std::fmt::Display for RegionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionKind::Ward => write!(f, "ward"),
            RegionKind::County => write!(f, "county"),
        }
    }
}

/// Boundary of a region. Features whose geometry cannot be converted are kept
/// as `Invalid` so containment tests can apply the configured failure policy
/// instead of the region silently disappearing from the selection list.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionShape {
    Valid(MultiPolygon<f64>),
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: String,
    pub label: String,
    pub shape: RegionShape,
}

impl Region {
    /// Point-in-region test.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::MalformedGeometry`] when the region's boundary
    /// could not be parsed, or a coordinate error for a non-finite point.
    pub fn contains(&self, point: Point<f64>) -> Result<bool, FilterError> {
        match &self.shape {
            RegionShape::Valid(area) => contains_point(area, point),
            RegionShape::Invalid(reason) => Err(FilterError::MalformedGeometry(format!(
                "region '{}': {reason}",
                self.id
            ))),
        }
    }

    #[must_use]
    pub fn boundary(&self) -> Option<&MultiPolygon<f64>> {
        match &self.shape {
            RegionShape::Valid(area) => Some(area),
            RegionShape::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegionIndex {
    kind: RegionKind,
    regions: HashMap<String, Region>,
}

impl RegionIndex {
    #[must_use]
    pub fn empty(kind: RegionKind) -> Self {
        Self {
            kind,
            regions: HashMap::new(),
        }
    }

    /// Index every feature that carries an identifier. Features without one
    /// are dropped; a repeated id replaces the earlier feature.
    #[must_use]
    pub fn from_features(kind: RegionKind, collection: &FeatureCollection) -> Self {
        let mut regions = HashMap::new();
        let mut dropped = 0_usize;

        for feature in &collection.features {
            let Some(id) = first_text(feature, kind.id_keys()) else {
                dropped += 1;
                continue;
            };
            let label =
                first_text(feature, kind.label_keys()).unwrap_or_else(|| kind.default_label(&id));
            let shape = match feature.geometry.as_ref().map(to_multi_polygon) {
                Some(Ok(area)) => RegionShape::Valid(area),
                Some(Err(e)) => RegionShape::Invalid(e.to_string()),
                None => RegionShape::Invalid(FilterError::MissingGeometry.to_string()),
            };
            regions.insert(id.clone(), Region { id, label, shape });
        }

        if dropped > 0 {
            tracing::debug!(%kind, dropped, "dropped region features without an identifier");
        }
        tracing::debug!(%kind, count = regions.len(), "built region index");

        Self { kind, regions }
    }

    #[must_use]
    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions for display: numeric ids in numeric order, then the rest
    /// lexicographically.
    #[must_use]
    pub fn sorted(&self) -> Vec<&Region> {
        let mut items: Vec<&Region> = self.regions.values().collect();
        items.sort_by(|a, b| {
            match (a.id.parse::<f64>().ok(), b.id.parse::<f64>().ok()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then_with(|| a.id.cmp(&b.id))
        });
        items
    }
}

fn first_text(feature: &Feature, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| feature.property(*key).and_then(property_text))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn collection(value: serde_json::Value) -> FeatureCollection {
        serde_json::from_value(value).unwrap()
    }

    fn square(min: f64, max: f64) -> serde_json::Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[min, min], [max, min], [max, max], [min, max], [min, min]]]
        })
    }

    #[test]
    fn indexes_by_first_non_empty_identifier() {
        let wards = collection(json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": square(0.0, 1.0),
                  "properties": { "WARD_ID": 2, "NAME": "Ward 2" } },
                { "type": "Feature", "geometry": square(1.0, 2.0),
                  "properties": { "WARD_ID": "", "WARD": "10" } },
                { "type": "Feature", "geometry": square(2.0, 3.0),
                  "properties": { "NAME": "No id" } }
            ]
        }));
        let index = RegionIndex::from_features(RegionKind::Ward, &wards);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("2").unwrap().label, "Ward 2");
        assert_eq!(index.get("10").unwrap().label, "Ward 10");
        assert!(index.get("No id").is_none());
    }

    #[test]
    fn county_ids_and_labels() {
        let counties = collection(json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": square(0.0, 1.0),
                  "properties": { "GEOID": "24031", "NAMELSAD": "Montgomery County", "NAME": "Montgomery" } }
            ]
        }));
        let index = RegionIndex::from_features(RegionKind::County, &counties);
        assert_eq!(index.get("24031").unwrap().label, "Montgomery County");
    }

    #[test]
    fn malformed_geometry_is_kept_as_invalid() {
        let wards = collection(json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature",
                  "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0]]] },
                  "properties": { "WARD_ID": 1 } },
                { "type": "Feature", "geometry": null, "properties": { "WARD_ID": 3 } }
            ]
        }));
        let index = RegionIndex::from_features(RegionKind::Ward, &wards);
        let region = index.get("1").unwrap();
        assert!(matches!(region.shape, RegionShape::Invalid(_)));
        assert!(region.contains(Point::new(0.5, 0.5)).is_err());
        assert!(index.get("3").unwrap().boundary().is_none());
    }

    #[test]
    fn sorted_orders_numeric_ids_numerically() {
        let wards = collection(json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": square(0.0, 1.0), "properties": { "WARD_ID": 10 } },
                { "type": "Feature", "geometry": square(0.0, 1.0), "properties": { "WARD_ID": 2 } },
                { "type": "Feature", "geometry": square(0.0, 1.0), "properties": { "WARD_ID": "A" } },
                { "type": "Feature", "geometry": square(0.0, 1.0), "properties": { "WARD_ID": 1 } }
            ]
        }));
        let index = RegionIndex::from_features(RegionKind::Ward, &wards);
        let ids: Vec<&str> = index.sorted().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "10", "A"]);
    }

    #[test]
    fn contains_uses_region_boundary() {
        let wards = collection(json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": square(0.0, 1.0), "properties": { "WARD_ID": 1 } }
            ]
        }));
        let index = RegionIndex::from_features(RegionKind::Ward, &wards);
        let region = index.get("1").unwrap();
        assert!(region.contains(Point::new(0.5, 0.5)).unwrap());
        assert!(!region.contains(Point::new(1.5, 0.5)).unwrap());
    }
}
