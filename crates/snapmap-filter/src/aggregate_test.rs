use geo::Point;
use geojson::FeatureCollection;
use serde_json::json;

use super::*;
use crate::regions::RegionKind;
use crate::selection::{reduce, SelectionEvent};
use crate::types::RetailerSource;

fn square(min_x: f64, size: f64) -> serde_json::Value {
    let max_x = min_x + size;
    json!({
        "type": "Polygon",
        "coordinates": [[[min_x, 0.0], [max_x, 0.0], [max_x, size], [min_x, size], [min_x, 0.0]]]
    })
}

fn index(kind: RegionKind, key: &str, features: &[(&str, f64)]) -> RegionIndex {
    let features: Vec<serde_json::Value> = features
        .iter()
        .map(|(id, min_x)| {
            let mut properties = serde_json::Map::new();
            properties.insert(key.to_string(), json!(id));
            json!({ "type": "Feature", "geometry": square(*min_x, 1.0), "properties": properties })
        })
        .collect();
    let fc: FeatureCollection =
        serde_json::from_value(json!({ "type": "FeatureCollection", "features": features }))
            .unwrap();
    RegionIndex::from_features(kind, &fc)
}

fn retailer(name: &str, store_type: Option<&str>, lon: f64) -> Retailer {
    Retailer {
        location: Point::new(lon, 0.5),
        name: Some(name.to_string()),
        store_type: store_type.map(str::to_string),
        street_address: None,
        additional_address: None,
        city: None,
        state: None,
        zip: None,
        source: RetailerSource::Primary,
    }
}

struct Fixture {
    wards: RegionIndex,
    counties: RegionIndex,
    categories: CategoryTable,
    records: Vec<Retailer>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            wards: index(RegionKind::Ward, "WARD_ID", &[("1", 0.0), ("2", 1.0)]),
            counties: index(RegionKind::County, "GEOID", &[("A", 5.0)]),
            categories: CategoryTable::default(),
            records: vec![
                retailer("a", Some("Pharmacy"), 0.5),
                retailer("b", Some("Supermarket"), 1.5),
                retailer("c", Some("Pharmacy"), 1.2),
                retailer("d", None, 0.2),
                retailer("e", Some("Bakery"), 5.5),
                retailer("f", Some("Other"), 9.0),
            ],
        }
    }

    fn ctx(&self) -> FilterContext<'_> {
        FilterContext {
            wards: &self.wards,
            counties: &self.counties,
            categories: &self.categories,
            region_policy: FailurePolicy::Closed,
        }
    }
}

fn names<'a>(summary: &'a FilterSummary<'_>) -> Vec<&'a str> {
    summary.filtered.iter().map(|r| r.display_name()).collect()
}

#[test]
fn empty_selection_returns_everything_in_order() {
    let fx = Fixture::new();
    let summary = filter_and_summarize(&fx.records, &SelectionState::default(), &fx.ctx());
    assert_eq!(names(&summary), vec!["a", "b", "c", "d", "e", "f"]);
    assert_eq!(summary.total(), fx.records.len());
}

#[test]
fn unknown_and_missing_labels_count_as_fallback() {
    let fx = Fixture::new();
    let summary = filter_and_summarize(&fx.records, &SelectionState::default(), &fx.ctx());
    assert_eq!(summary.counts_by_category.get("Other"), Some(&3));
    assert_eq!(summary.counts_by_category.get("Pharmacy"), Some(&2));
    assert_eq!(summary.counts_by_category.get("Supermarket"), Some(&1));
    assert!(summary.counts_by_category.get("Bakery").is_none());
}

#[test]
fn counts_sum_to_filtered_length() {
    let fx = Fixture::new();
    let selections = [
        SelectionState::default(),
        reduce(
            SelectionState::default(),
            SelectionEvent::ToggleCategory("Pharmacy".into()),
        ),
        reduce(SelectionState::default(), SelectionEvent::ToggleWard("2".into())),
    ];
    for selection in &selections {
        let summary = filter_and_summarize(&fx.records, selection, &fx.ctx());
        assert_eq!(
            summary.counts_by_category.values().sum::<usize>(),
            summary.filtered.len()
        );
    }
}

#[test]
fn category_and_region_predicates_are_anded() {
    let fx = Fixture::new();
    let selection = [
        SelectionEvent::ToggleCategory("Pharmacy".into()),
        SelectionEvent::ToggleWard("2".into()),
    ]
    .into_iter()
    .fold(SelectionState::default(), reduce);
    let summary = filter_and_summarize(&fx.records, &selection, &fx.ctx());
    assert_eq!(names(&summary), vec!["c"]);
}

#[test]
fn ward_or_county_selection() {
    let fx = Fixture::new();
    let selection = [
        SelectionEvent::SetIncludeBordering(true),
        SelectionEvent::ToggleWard("1".into()),
        SelectionEvent::ToggleCounty("A".into()),
    ]
    .into_iter()
    .fold(SelectionState::default(), reduce);
    let summary = filter_and_summarize(&fx.records, &selection, &fx.ctx());
    assert_eq!(names(&summary), vec!["a", "d", "e"]);
}

#[test]
fn repeated_runs_are_identical() {
    let fx = Fixture::new();
    let selection = reduce(SelectionState::default(), SelectionEvent::ToggleWard("1".into()));
    let first = filter_and_summarize(&fx.records, &selection, &fx.ctx());
    let second = filter_and_summarize(&fx.records, &selection, &fx.ctx());
    assert_eq!(first, second);
}

#[test]
fn legend_sorted_by_count_then_label() {
    let fx = Fixture::new();
    let summary = filter_and_summarize(&fx.records, &SelectionState::default(), &fx.ctx());
    let legend = summary.legend(&fx.categories);
    let rows: Vec<(&str, usize)> = legend.iter().map(|e| (e.label.as_str(), e.count)).collect();
    assert_eq!(rows, vec![("Other", 3), ("Pharmacy", 2), ("Supermarket", 1)]);
    assert_eq!(legend[1].icon, "💊");
    assert_eq!(legend[0].color, "#9467bd");
}

#[test]
fn store_type_options_are_sorted_and_distinct() {
    let fx = Fixture::new();
    assert_eq!(
        store_type_options(&fx.records),
        vec!["Bakery", "Other", "Pharmacy", "Supermarket"]
    );
}
