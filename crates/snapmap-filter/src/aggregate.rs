//! Single-pass filtering of the retailer working set plus per-category counts.

use std::collections::{BTreeMap, BTreeSet};

use snapmap_core::{CategoryTable, FailurePolicy};

use crate::filter::{matches_category, RegionFilter};
use crate::regions::RegionIndex;
use crate::selection::SelectionState;
use crate::types::Retailer;

/// Static inputs the filter needs besides the records and the selection.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub wards: &'a RegionIndex,
    pub counties: &'a RegionIndex,
    pub categories: &'a CategoryTable,
    pub region_policy: FailurePolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterSummary<'r> {
    /// Matching records, in input order.
    pub filtered: Vec<&'r Retailer>,
    /// Counts keyed by display label; unknown and missing store types count
    /// under the fallback label.
    pub counts_by_category: BTreeMap<String, usize>,
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: String,
    pub icon: String,
    pub color: String,
    pub count: usize,
}

impl FilterSummary<'_> {
    #[must_use]
    pub fn total(&self) -> usize {
        self.filtered.len()
    }

    /// Legend rows, largest count first; equal counts are ordered by label.
    #[must_use]
    pub fn legend(&self, categories: &CategoryTable) -> Vec<LegendEntry> {
        let mut rows: Vec<LegendEntry> = self
            .counts_by_category
            .iter()
            .map(|(label, &count)| {
                let style = categories.style_for_label(label);
                LegendEntry {
                    label: label.clone(),
                    icon: style.icon.clone(),
                    color: style.color.clone(),
                    count,
                }
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        rows
    }
}

/// Keep the records that match both the category selection and the combined
/// ward/county selection, and count them by category.
///
/// Pure in its inputs: the same records and selection always give the same
/// summary.
#[must_use]
pub fn filter_and_summarize<'r, I>(
    records: I,
    selection: &SelectionState,
    ctx: &FilterContext<'_>,
) -> FilterSummary<'r>
where
    I: IntoIterator<Item = &'r Retailer>,
{
    let regions = RegionFilter {
        wards: ctx.wards,
        selected_wards: &selection.wards,
        counties: ctx.counties,
        selected_counties: &selection.counties,
        policy: ctx.region_policy,
    };

    let mut filtered = Vec::new();
    let mut counts_by_category = BTreeMap::new();

    for retailer in records {
        if !matches_category(retailer, &selection.categories) || !regions.matches(retailer.location)
        {
            continue;
        }
        let category = ctx.categories.resolve(retailer.store_type.as_deref());
        *counts_by_category
            .entry(ctx.categories.label(&category).to_string())
            .or_insert(0) += 1;
        filtered.push(retailer);
    }

    FilterSummary {
        filtered,
        counts_by_category,
    }
}

/// Distinct raw store-type labels present in `records`, sorted.
#[must_use]
pub fn store_type_options<'r, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'r Retailer>,
{
    records
        .into_iter()
        .filter_map(|r| r.store_type.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
