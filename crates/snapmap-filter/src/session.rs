//! A map session: the loaded datasets plus the current selection.
//!
//! The session is the single owner of [`SelectionState`]. Each event is fed
//! through [`reduce`] and the view is recomputed in full from the new state.

use geo::Point;
use snapmap_core::{DistanceUnit, FailurePolicy};

use crate::aggregate::{filter_and_summarize, store_type_options, FilterContext, FilterSummary};
use crate::dataset::MapData;
use crate::nearest::{nearest_per_category, NearestRetailer};
use crate::regions::Region;
use crate::selection::{reduce, SelectionEvent, SelectionState};

/// Everything the map and the nearby list render from.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView<'a> {
    pub summary: FilterSummary<'a>,
    /// Nearest retailer per category among the filtered ones; empty without
    /// an origin.
    pub nearest: Vec<NearestRetailer<'a>>,
    pub distance_unit: DistanceUnit,
    pub origin: Option<Point<f64>>,
}

#[derive(Debug, Clone)]
pub struct MapSession {
    data: MapData,
    state: SelectionState,
    region_policy: FailurePolicy,
}

impl MapSession {
    #[must_use]
    pub fn new(data: MapData, region_policy: FailurePolicy, distance_unit: DistanceUnit) -> Self {
        Self {
            data,
            state: SelectionState::with_distance_unit(distance_unit),
            region_policy,
        }
    }

    #[must_use]
    pub fn data(&self) -> &MapData {
        &self.data
    }

    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Apply one user event and return the recomputed view.
    pub fn apply(&mut self, event: SelectionEvent) -> MapView<'_> {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
        self.view()
    }

    /// Compute the view for the current selection.
    #[must_use]
    pub fn view(&self) -> MapView<'_> {
        let ctx = FilterContext {
            wards: &self.data.wards,
            counties: &self.data.counties,
            categories: &self.data.categories,
            region_policy: self.region_policy,
        };
        let records = self
            .data
            .retailers
            .working_set(self.state.include_bordering);
        let summary = filter_and_summarize(records, &self.state, &ctx);
        let nearest = nearest_per_category(
            self.state.near,
            summary.filtered.iter().copied(),
            self.state.distance_unit,
            &self.data.categories,
        );
        MapView {
            summary,
            nearest,
            distance_unit: self.state.distance_unit,
            origin: self.state.near,
        }
    }

    /// Store-type labels offered for selection, from the current working set.
    #[must_use]
    pub fn store_type_options(&self) -> Vec<String> {
        store_type_options(
            self.data
                .retailers
                .working_set(self.state.include_bordering),
        )
    }

    /// Selected wards and counties that are present in their index, for
    /// outlining on the map.
    #[must_use]
    pub fn selected_regions(&self) -> Vec<&Region> {
        let wards = self
            .state
            .wards
            .iter()
            .filter_map(|id| self.data.wards.get(id));
        let counties = self
            .state
            .counties
            .iter()
            .filter_map(|id| self.data.counties.get(id));
        wards.chain(counties).collect()
    }
}
