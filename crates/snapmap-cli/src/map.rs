//! Read-only map commands: `summary`, `nearest`, `regions` and `mask`.
//!
//! Each loads what it needs from the configured dataset paths. Formatting is
//! kept in separate functions so it can be checked without touching disk.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Context};
use geo::{MultiPolygon, Point};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use snapmap_core::{AppConfig, CategoryTable, DistanceUnit};
use snapmap_filter::boundary::{bounds, outline, world_mask};
use snapmap_filter::dataset::boundary_from_collection;
use snapmap_filter::geometry::{multi_line_string_to_value, polygon_to_value};
use snapmap_filter::{
    directions_url, read_feature_collection, MapData, MapSession, MapView, RegionIndex,
    RegionKind, SelectionEvent,
};

fn load_session(config: &AppConfig) -> anyhow::Result<MapSession> {
    let data = MapData::load(config)?;
    Ok(MapSession::new(
        data,
        config.region_failure_policy,
        config.distance_unit,
    ))
}

/// Legend rows followed by the total.
pub(crate) fn summary_lines(view: &MapView<'_>, categories: &CategoryTable) -> Vec<String> {
    let mut lines: Vec<String> = view
        .summary
        .legend(categories)
        .into_iter()
        .map(|row| format!("{} {}: {}", row.icon, row.label, row.count))
        .collect();
    lines.push(format!("Total: {}", view.summary.total()));
    lines
}

/// Print per-type counts for the given selection.
///
/// # Errors
///
/// Returns an error if the datasets cannot be loaded.
pub(crate) fn run_summary(
    config: &AppConfig,
    types: Vec<String>,
    wards: Vec<String>,
    counties: Vec<String>,
    include_bordering: bool,
) -> anyhow::Result<()> {
    let mut session = load_session(config)?;

    let mut events = vec![
        SelectionEvent::SetIncludeBordering(include_bordering),
        SelectionEvent::SetCategories(types.into_iter().collect()),
    ];
    let wards: BTreeSet<String> = wards.into_iter().collect();
    let counties: BTreeSet<String> = counties.into_iter().collect();
    for id in &wards {
        if session.data().wards.get(id).is_none() {
            tracing::warn!(id = %id, "ward is not in the ward dataset");
        }
    }
    for id in &counties {
        if session.data().counties.get(id).is_none() {
            tracing::warn!(id = %id, "county is not in the county dataset");
        }
    }
    events.extend(wards.into_iter().map(SelectionEvent::ToggleWard));
    events.extend(counties.into_iter().map(SelectionEvent::ToggleCounty));
    for event in events {
        session.apply(event);
    }

    let view = session.view();
    for line in summary_lines(&view, &session.data().categories) {
        println!("{line}");
    }
    Ok(())
}

/// One row per category: label, name, distance, address and directions link.
pub(crate) fn nearest_lines(view: &MapView<'_>) -> Vec<String> {
    let unit = view.distance_unit.abbreviation();
    view.nearest
        .iter()
        .map(|n| {
            let retailer = n.retailer;
            let address = retailer.address_line().unwrap_or_default();
            format!(
                "{}: {} ({:.2} {unit}) {address} {}",
                n.label,
                retailer.display_name(),
                n.distance,
                directions_url(view.origin, retailer.location)
            )
        })
        .collect()
}

fn check_coordinate(lon: f64, lat: f64) -> anyhow::Result<Point<f64>> {
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        bail!("coordinate out of range: lon {lon}, lat {lat}");
    }
    Ok(Point::new(lon, lat))
}

/// Print the nearest retailer of each store type to (`lon`, `lat`).
///
/// # Errors
///
/// Returns an error for out-of-range coordinates or unloadable datasets.
pub(crate) fn run_nearest(
    config: &AppConfig,
    lon: f64,
    lat: f64,
    unit: Option<DistanceUnit>,
    include_bordering: bool,
) -> anyhow::Result<()> {
    let origin = check_coordinate(lon, lat)?;
    let mut session = load_session(config)?;
    session.apply(SelectionEvent::SetIncludeBordering(include_bordering));
    session.apply(SelectionEvent::SetDistanceUnit(
        unit.unwrap_or(config.distance_unit),
    ));
    let view = session.apply(SelectionEvent::SetNearOrigin(origin));

    if view.nearest.is_empty() {
        println!("no retailers found");
    }
    for line in nearest_lines(&view) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn region_lines(index: &RegionIndex) -> Vec<String> {
    index
        .sorted()
        .into_iter()
        .map(|region| {
            let marker = if region.boundary().is_some() {
                ""
            } else {
                " (invalid geometry)"
            };
            format!("{}\t{}{marker}", region.id, region.label)
        })
        .collect()
}

/// List ward (or county) ids and labels.
///
/// # Errors
///
/// Returns an error if the dataset is not configured or cannot be read.
pub(crate) fn run_regions(config: &AppConfig, counties: bool) -> anyhow::Result<()> {
    let (kind, path) = if counties {
        let Some(path) = config.counties_path.as_deref() else {
            bail!("SNAPMAP_COUNTIES_PATH is not set");
        };
        (RegionKind::County, path)
    } else {
        (RegionKind::Ward, config.wards_path.as_path())
    };
    let index = RegionIndex::from_features(kind, &read_feature_collection(path)?);
    for line in region_lines(&index) {
        println!("{line}");
    }
    Ok(())
}

fn feature_with_role(geometry: geojson::Value, role: &str) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("role".to_string(), role.into());
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geometry)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// The world mask and the boundary outline, with the boundary's bounding box
/// on the collection.
pub(crate) fn mask_collection(boundary: &MultiPolygon<f64>) -> FeatureCollection {
    FeatureCollection {
        bbox: bounds(boundary).map(|r| vec![r.min().x, r.min().y, r.max().x, r.max().y]),
        features: vec![
            feature_with_role(polygon_to_value(&world_mask(boundary)), "mask"),
            feature_with_role(multi_line_string_to_value(&outline(boundary)), "outline"),
        ],
        foreign_members: None,
    }
}

/// Write the mask collection for the configured boundary to `out`.
///
/// # Errors
///
/// Returns an error if the boundary has no usable polygon or the file cannot
/// be written.
pub(crate) fn run_mask(config: &AppConfig, out: &Path) -> anyhow::Result<()> {
    let collection = read_feature_collection(&config.boundary_path)?;
    let Some(boundary) = boundary_from_collection(&collection)? else {
        bail!(
            "{} has no Polygon or MultiPolygon feature",
            config.boundary_path.display()
        );
    };
    let body = serde_json::to_string(&mask_collection(&boundary))
        .context("failed to serialize mask")?;
    std::fs::write(out, body).with_context(|| format!("failed to write {}", out.display()))?;
    println!("Wrote {}", out.display());
    Ok(())
}
