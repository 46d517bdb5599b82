//! Per-record predicates: store-type membership and region containment.

use std::collections::BTreeSet;

use geo::Point;
use snapmap_core::FailurePolicy;

use crate::regions::RegionIndex;
use crate::types::Retailer;

/// True when no labels are selected, or the retailer's raw store type is one
/// of them. Labels are compared verbatim; a record with no store type never
/// matches a non-empty selection.
#[must_use]
pub fn matches_category(retailer: &Retailer, selected: &BTreeSet<String>) -> bool {
    selected.is_empty()
        || retailer
            .store_type
            .as_ref()
            .is_some_and(|label| selected.contains(label))
}

/// True when no regions are selected, or `point` falls inside any selected
/// region. Stops at the first match.
///
/// A region that cannot be evaluated (unknown id, unparseable boundary,
/// non-finite point) yields `policy.on_failure()` for that region.
#[must_use]
pub fn matches_any_region(
    point: Point<f64>,
    index: &RegionIndex,
    selected: &BTreeSet<String>,
    policy: FailurePolicy,
) -> bool {
    selected.is_empty()
        || selected
            .iter()
            .any(|id| region_contains(point, index, id, policy))
}

fn region_contains(
    point: Point<f64>,
    index: &RegionIndex,
    id: &str,
    policy: FailurePolicy,
) -> bool {
    let Some(region) = index.get(id) else {
        tracing::warn!(kind = %index.kind(), id, %policy, "selected region is not in the index");
        return policy.on_failure();
    };
    match region.contains(point) {
        Ok(inside) => inside,
        Err(e) => {
            tracing::warn!(kind = %index.kind(), id, %policy, error = %e, "containment test failed");
            policy.on_failure()
        }
    }
}

/// Ward and county selections combined.
///
/// Each non-empty selection is one predicate and the result is their logical
/// OR: a retailer inside a selected county passes even when it lies outside
/// every selected ward. With neither selection active everything passes.
#[derive(Debug, Clone, Copy)]
pub struct RegionFilter<'a> {
    pub wards: &'a RegionIndex,
    pub selected_wards: &'a BTreeSet<String>,
    pub counties: &'a RegionIndex,
    pub selected_counties: &'a BTreeSet<String>,
    pub policy: FailurePolicy,
}

impl RegionFilter<'_> {
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.selected_wards.is_empty() || !self.selected_counties.is_empty()
    }

    #[must_use]
    pub fn matches(&self, point: Point<f64>) -> bool {
        if !self.is_active() {
            return true;
        }
        let in_ward = !self.selected_wards.is_empty()
            && matches_any_region(point, self.wards, self.selected_wards, self.policy);
        in_ward
            || (!self.selected_counties.is_empty()
                && matches_any_region(point, self.counties, self.selected_counties, self.policy))
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
