//! `filter-type`: drop one store type from a GeoJSON file.

use std::path::Path;

use anyhow::Context;
use snapmap_filter::{exclude_store_type, read_feature_collection};

/// Remove every feature whose `Store_Type` equals `exclude_type` and write the
/// rest to `out` (or back to `input`). Returns the line to report.
///
/// The whole output is serialized before anything is written, so a failure
/// leaves the destination untouched.
///
/// # Errors
///
/// Returns an error if the input cannot be read, is not a
/// `FeatureCollection`, or the output cannot be written.
pub(crate) fn run_filter_type(
    input: &Path,
    exclude_type: &str,
    out: Option<&Path>,
) -> anyhow::Result<String> {
    let mut collection = read_feature_collection(input)?;
    let stats = exclude_store_type(&mut collection, exclude_type);

    let body = serde_json::to_string(&collection)
        .context("failed to serialize filtered feature collection")?;
    let out = out.unwrap_or(input);
    std::fs::write(out, body).with_context(|| format!("failed to write {}", out.display()))?;

    tracing::info!(
        removed = stats.removed,
        kept = stats.kept,
        out = %out.display(),
        "filtered feature collection"
    );
    Ok(format!(
        "Filtered features: {} removed, {} kept. Wrote {}",
        stats.removed,
        stats.kept,
        out.display()
    ))
}
