//! Loading the retailer, region and boundary datasets.
//!
//! Retailers come from a GeoJSON `FeatureCollection` or from newline-delimited
//! JSON where each line is a `Feature` or a `FeatureCollection`. Records that
//! cannot be turned into a retailer are skipped and counted in the logs.

use std::io::BufRead;
use std::path::Path;

use geo::MultiPolygon;
use geojson::{Feature, FeatureCollection};
use serde_json::Value as JsonValue;
use snapmap_core::{load_categories_or_default, AppConfig, CategoryTable};

use crate::error::FilterError;
use crate::geometry::{contains_point, to_multi_polygon};
use crate::regions::{RegionIndex, RegionKind};
use crate::types::{Retailer, RetailerSource};

/// Primary retailers plus the optional bordering-area set.
#[derive(Debug, Clone, Default)]
pub struct RetailerSet {
    pub primary: Vec<Retailer>,
    pub bordering: Vec<Retailer>,
}

impl RetailerSet {
    /// Primary retailers, followed by bordering ones when `include_bordering` is set.
    pub fn working_set(&self, include_bordering: bool) -> impl Iterator<Item = &Retailer> + '_ {
        let bordering: &[Retailer] = if include_bordering {
            &self.bordering
        } else {
            &[]
        };
        self.primary.iter().chain(bordering)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.primary.len() + self.bordering.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.bordering.is_empty()
    }
}

fn json_type(value: &JsonValue) -> Option<&str> {
    value.get("type").and_then(JsonValue::as_str)
}

/// Parse a GeoJSON `FeatureCollection` document.
///
/// # Errors
///
/// Returns [`FilterError::Json`] for invalid JSON and
/// [`FilterError::NotFeatureCollection`] when the top-level object is not a
/// `FeatureCollection` with a `features` array.
pub fn parse_feature_collection(
    content: &str,
    context: &str,
) -> Result<FeatureCollection, FilterError> {
    let json_err = |source| FilterError::Json {
        context: context.to_string(),
        source,
    };
    let value: JsonValue = serde_json::from_str(content).map_err(json_err)?;
    let has_features = value.get("features").is_some_and(JsonValue::is_array);
    if json_type(&value) != Some("FeatureCollection") || !has_features {
        return Err(FilterError::NotFeatureCollection {
            context: context.to_string(),
        });
    }
    serde_json::from_value(value).map_err(json_err)
}

/// Read and parse a `FeatureCollection` file.
///
/// # Errors
///
/// Returns [`FilterError::Io`] if the file cannot be read, otherwise the
/// errors of [`parse_feature_collection`].
pub fn read_feature_collection(path: &Path) -> Result<FeatureCollection, FilterError> {
    let content = std::fs::read_to_string(path).map_err(|source| FilterError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_feature_collection(&content, &path.display().to_string())
}

/// Retailers from every point feature of a collection.
#[must_use]
pub fn retailers_from_collection(
    collection: &FeatureCollection,
    source: RetailerSource,
) -> Vec<Retailer> {
    retailers_from_features(collection.features.iter(), source)
}

fn retailers_from_features<'a, I>(features: I, source: RetailerSource) -> Vec<Retailer>
where
    I: IntoIterator<Item = &'a Feature>,
{
    let mut skipped = 0_usize;
    let retailers: Vec<Retailer> = features
        .into_iter()
        .filter_map(|feature| match Retailer::from_feature(feature, source) {
            Ok(retailer) => Some(retailer),
            Err(e) => {
                skipped += 1;
                tracing::debug!(error = %e, "skipping retailer feature");
                None
            }
        })
        .collect();
    if skipped > 0 {
        tracing::warn!(skipped, kept = retailers.len(), ?source, "skipped unusable retailer features");
    }
    retailers
}

/// Features carried by one newline-delimited record. Malformed lines and
/// other GeoJSON types yield nothing.
fn features_from_line(line: &str, line_no: usize) -> Vec<Feature> {
    let value: JsonValue = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(line_no, error = %e, "skipping malformed NDJSON line");
            return Vec::new();
        }
    };
    match json_type(&value) {
        Some("Feature") => match serde_json::from_value::<Feature>(value) {
            Ok(feature) => vec![feature],
            Err(e) => {
                tracing::debug!(line_no, error = %e, "skipping invalid Feature line");
                Vec::new()
            }
        },
        Some("FeatureCollection") => match serde_json::from_value::<FeatureCollection>(value) {
            Ok(collection) => collection.features,
            Err(e) => {
                tracing::debug!(line_no, error = %e, "skipping invalid FeatureCollection line");
                Vec::new()
            }
        },
        other => {
            tracing::debug!(line_no, kind = ?other, "skipping NDJSON line that is not a Feature");
            Vec::new()
        }
    }
}

/// Parse newline-delimited retailer records.
///
/// # Errors
///
/// Returns [`FilterError::Io`] only when reading from `reader` fails; bad
/// lines are skipped.
pub fn parse_retailers_ndjson<R: BufRead>(
    reader: R,
    source: RetailerSource,
    context: &str,
) -> Result<Vec<Retailer>, FilterError> {
    let mut features = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| FilterError::Io {
            path: context.to_string(),
            source,
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        features.extend(features_from_line(line, idx + 1));
    }
    Ok(retailers_from_features(&features, source))
}

fn is_ndjson(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ndjson") || e.eq_ignore_ascii_case("jsonl"))
}

/// Load retailers from a GeoJSON or NDJSON file, chosen by extension
/// (`.ndjson` / `.jsonl` select the line reader).
///
/// # Errors
///
/// Returns [`FilterError::Io`] when the file cannot be read; GeoJSON input
/// must also parse as a `FeatureCollection`.
pub fn load_retailers(path: &Path, source: RetailerSource) -> Result<Vec<Retailer>, FilterError> {
    let display = path.display().to_string();
    if is_ndjson(path) {
        let file = std::fs::File::open(path).map_err(|source| FilterError::Io {
            path: display.clone(),
            source,
        })?;
        parse_retailers_ndjson(std::io::BufReader::new(file), source, &display)
    } else {
        let collection = read_feature_collection(path)?;
        Ok(retailers_from_collection(&collection, source))
    }
}

/// Geometry of the first `Polygon` or `MultiPolygon` feature, if any.
///
/// # Errors
///
/// Returns a geometry error when that feature's rings are malformed.
pub fn boundary_from_collection(
    collection: &FeatureCollection,
) -> Result<Option<MultiPolygon<f64>>, FilterError> {
    collection
        .features
        .iter()
        .filter_map(|f| f.geometry.as_ref())
        .find(|g| {
            matches!(
                g.value,
                geojson::Value::Polygon(_) | geojson::Value::MultiPolygon(_)
            )
        })
        .map(to_multi_polygon)
        .transpose()
}

/// Keep only retailers inside `boundary`. A retailer whose position cannot
/// be evaluated is dropped.
#[must_use]
pub fn clip_to_boundary(retailers: Vec<Retailer>, boundary: &MultiPolygon<f64>) -> Vec<Retailer> {
    let before = retailers.len();
    let kept: Vec<Retailer> = retailers
        .into_iter()
        .filter(|r| contains_point(boundary, r.location).unwrap_or(false))
        .collect();
    tracing::debug!(before, kept = kept.len(), "clipped retailers to boundary");
    kept
}

/// Everything the filter pipeline reads, loaded once.
#[derive(Debug, Clone)]
pub struct MapData {
    pub retailers: RetailerSet,
    pub wards: RegionIndex,
    pub counties: RegionIndex,
    /// Jurisdiction boundary; `None` when missing or unparseable.
    pub boundary: Option<MultiPolygon<f64>>,
    pub categories: CategoryTable,
}

impl MapData {
    /// Assemble map data from already-parsed collections. Primary retailers
    /// are clipped to the boundary when one is available.
    #[must_use]
    pub fn from_parts(
        primary: Vec<Retailer>,
        bordering: Vec<Retailer>,
        wards: RegionIndex,
        counties: RegionIndex,
        boundary: Option<MultiPolygon<f64>>,
        categories: CategoryTable,
    ) -> Self {
        let primary = match &boundary {
            Some(area) => clip_to_boundary(primary, area),
            None => primary,
        };
        Self {
            retailers: RetailerSet { primary, bordering },
            wards,
            counties,
            boundary,
            categories,
        }
    }

    /// Load every dataset named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required dataset (retailers, wards, boundary)
    /// or a configured optional one cannot be read or parsed, or if the
    /// category file is invalid. A boundary with malformed geometry is logged
    /// and treated as absent, so no primary retailer is clipped away.
    pub fn load(config: &AppConfig) -> Result<Self, FilterError> {
        let categories = load_categories_or_default(&config.categories_path)?;

        let boundary_fc = read_feature_collection(&config.boundary_path)?;
        let boundary = match boundary_from_collection(&boundary_fc) {
            Ok(Some(area)) => Some(area),
            Ok(None) => {
                tracing::warn!(path = %config.boundary_path.display(), "boundary dataset has no polygon feature");
                None
            }
            Err(e) => {
                tracing::error!(path = %config.boundary_path.display(), error = %e, "failed to parse boundary geometry");
                None
            }
        };

        let wards = RegionIndex::from_features(
            RegionKind::Ward,
            &read_feature_collection(&config.wards_path)?,
        );
        let counties = match &config.counties_path {
            Some(path) => {
                RegionIndex::from_features(RegionKind::County, &read_feature_collection(path)?)
            }
            None => RegionIndex::empty(RegionKind::County),
        };

        let primary = load_retailers(&config.retailers_path, RetailerSource::Primary)?;
        let bordering = match &config.bordering_retailers_path {
            Some(path) => load_retailers(path, RetailerSource::Bordering)?,
            None => Vec::new(),
        };

        let data = Self::from_parts(primary, bordering, wards, counties, boundary, categories);
        tracing::info!(
            primary = data.retailers.primary.len(),
            bordering = data.retailers.bordering.len(),
            wards = data.wards.len(),
            counties = data.counties.len(),
            "loaded map data"
        );
        Ok(data)
    }
}
