//! Domain types for retailer records.

use geo::Point;
use geojson::Feature;
use serde_json::Value as JsonValue;

use crate::error::FilterError;
use crate::geometry::to_point;

/// Retailer dataset attribute names.
pub mod fields {
    pub const STORE_NAME: &str = "Store_Name";
    pub const STORE_TYPE: &str = "Store_Type";
    pub const STREET_ADDRESS: &str = "Store_Street_Address";
    /// Spelled as published in the SNAP retailer dataset.
    pub const ADDITIONAL_ADDRESS: &str = "Additonal_Address";
    pub const ADDITIONAL_ADDRESS_ALT: &str = "Additional_Address";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State";
    pub const ZIP_CODE: &str = "Zip_Code";
}

/// Which dataset a retailer was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetailerSource {
    Primary,
    /// Outside the jurisdiction; only shown when bordering areas are included.
    Bordering,
}

/// One SNAP-authorized retailer. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Retailer {
    /// x = longitude, y = latitude.
    pub location: Point<f64>,
    pub name: Option<String>,
    /// Raw store-type label, compared verbatim by the category filter.
    pub store_type: Option<String>,
    pub street_address: Option<String>,
    pub additional_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub source: RetailerSource,
}

impl Retailer {
    /// Build a retailer from a GeoJSON point feature.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::MissingGeometry`] when the feature has no
    /// geometry, or a geometry error when it is not a valid `Point`.
    pub fn from_feature(feature: &Feature, source: RetailerSource) -> Result<Self, FilterError> {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or(FilterError::MissingGeometry)?;
        let location = to_point(geometry)?;
        let text = |key: &str| feature.property(key).and_then(property_text);

        Ok(Self {
            location,
            name: text(fields::STORE_NAME),
            store_type: text(fields::STORE_TYPE),
            street_address: text(fields::STREET_ADDRESS),
            additional_address: text(fields::ADDITIONAL_ADDRESS)
                .or_else(|| text(fields::ADDITIONAL_ADDRESS_ALT)),
            city: text(fields::CITY),
            state: text(fields::STATE),
            zip: text(fields::ZIP_CODE),
            source,
        })
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Store")
    }

    /// Single-line postal address, or `None` when no part is known.
    ///
    /// Parts are street, additional address, "City, State", and zip.
    #[must_use]
    pub fn address_line(&self) -> Option<String> {
        let city_state = [self.city.as_deref(), self.state.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

        let parts: Vec<&str> = [
            self.street_address.as_deref(),
            self.additional_address.as_deref(),
            Some(city_state.as_str()).filter(|s| !s.is_empty()),
            self.zip.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Stringify a scalar property. Whole numbers print without a fraction so
/// numeric ids and zip codes read naturally; blank strings count as absent.
pub(crate) fn property_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().map(|f| f.to_string())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn feature(value: serde_json::Value) -> Feature {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn from_feature_reads_properties() {
        let f = feature(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-77.01, 38.9] },
            "properties": {
                "Store_Name": "Corner Market",
                "Store_Type": "Convenience Store",
                "Store_Street_Address": "100 K St NW",
                "Additonal_Address": "Suite 2",
                "City": "Washington",
                "State": "DC",
                "Zip_Code": 20001
            }
        }));
        let r = Retailer::from_feature(&f, RetailerSource::Primary).unwrap();
        assert_eq!(r.display_name(), "Corner Market");
        assert_eq!(r.store_type.as_deref(), Some("Convenience Store"));
        assert_eq!(r.zip.as_deref(), Some("20001"));
        assert_eq!(
            r.address_line().as_deref(),
            Some("100 K St NW, Suite 2, Washington, DC, 20001")
        );
        assert!((r.location.x() - -77.01).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_properties_are_none() {
        let f = feature(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-77.0, 38.9] },
            "properties": null
        }));
        let r = Retailer::from_feature(&f, RetailerSource::Bordering).unwrap();
        assert_eq!(r.display_name(), "Unnamed Store");
        assert!(r.store_type.is_none());
        assert!(r.address_line().is_none());
        assert_eq!(r.source, RetailerSource::Bordering);
    }

    #[test]
    fn address_line_skips_missing_parts() {
        let f = feature(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-77.0, 38.9] },
            "properties": { "State": "DC", "Store_Street_Address": "" }
        }));
        let r = Retailer::from_feature(&f, RetailerSource::Primary).unwrap();
        assert_eq!(r.address_line().as_deref(), Some("DC"));
    }

    #[test]
    fn rejects_feature_without_geometry() {
        let f = feature(json!({ "type": "Feature", "geometry": null, "properties": {} }));
        assert!(matches!(
            Retailer::from_feature(&f, RetailerSource::Primary),
            Err(FilterError::MissingGeometry)
        ));
    }

    #[test]
    fn property_text_formats_numbers() {
        assert_eq!(property_text(&json!(3)), Some("3".to_string()));
        assert_eq!(property_text(&json!(2.5)), Some("2.5".to_string()));
        assert_eq!(property_text(&json!("  ")), None);
        assert_eq!(property_text(&json!(true)), None);
    }
}
