//! Removing features of one store type from a `FeatureCollection`.

use geojson::FeatureCollection;

use crate::types::fields;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcludeStats {
    pub removed: usize,
    pub kept: usize,
}

/// Drop every feature whose `Store_Type` equals `store_type` exactly.
/// Features without that attribute are kept.
pub fn exclude_store_type(collection: &mut FeatureCollection, store_type: &str) -> ExcludeStats {
    let before = collection.features.len();
    collection.features.retain(|feature| {
        feature
            .property(fields::STORE_TYPE)
            .and_then(serde_json::Value::as_str)
            != Some(store_type)
    });
    let kept = collection.features.len();
    ExcludeStats {
        removed: before - kept,
        kept,
    }
}
