//! Nearest retailer of each store type from an origin point.

use std::collections::HashMap;

use geo::Point;
use snapmap_core::{Category, CategoryTable, DistanceUnit};

use crate::distance::haversine_distance;
use crate::types::Retailer;

/// Closest retailer found for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestRetailer<'r> {
    pub category: Category,
    /// Display label of `category`.
    pub label: String,
    pub retailer: &'r Retailer,
    /// Distance from the origin in the unit the search ran with.
    pub distance: f64,
}

/// Find the closest retailer of each category not excluded by the table's
/// `near_excluded` list.
///
/// Returns at most one entry per category, ordered by ascending distance.
/// Equal distances keep the order in which their categories were first seen.
/// An unset origin or an empty record set yields an empty list.
#[must_use]
pub fn nearest_per_category<'r, I>(
    origin: Option<Point<f64>>,
    records: I,
    unit: DistanceUnit,
    categories: &CategoryTable,
) -> Vec<NearestRetailer<'r>>
where
    I: IntoIterator<Item = &'r Retailer>,
{
    let Some(origin) = origin else {
        return Vec::new();
    };

    let mut best: Vec<NearestRetailer<'r>> = Vec::new();
    let mut slot_by_label: HashMap<String, usize> = HashMap::new();

    for retailer in records {
        let category = categories.resolve(retailer.store_type.as_deref());
        if categories.is_near_excluded(&category) {
            continue;
        }
        let distance = haversine_distance(origin, retailer.location, unit);
        if !distance.is_finite() {
            tracing::debug!(
                name = retailer.display_name(),
                "skipping retailer with non-finite distance"
            );
            continue;
        }

        let label = categories.label(&category).to_string();
        match slot_by_label.get(&label) {
            Some(&slot) => {
                if distance < best[slot].distance {
                    best[slot].retailer = retailer;
                    best[slot].distance = distance;
                }
            }
            None => {
                slot_by_label.insert(label.clone(), best.len());
                best.push(NearestRetailer {
                    category,
                    label,
                    retailer,
                    distance,
                });
            }
        }
    }

    // `sort_by` is stable, which keeps first-seen order for ties.
    best.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    best
}
