//! User selection state and the transition function that updates it.
//!
//! Every interaction produces a new [`SelectionState`] through [`reduce`];
//! the filtered view is then recomputed from scratch from the new state.

use std::collections::BTreeSet;

use geo::Point;
use snapmap_core::DistanceUnit;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionState {
    /// Selected raw store-type labels. Empty means all.
    pub categories: BTreeSet<String>,
    pub wards: BTreeSet<String>,
    /// Only ever non-empty while `include_bordering` is set.
    pub counties: BTreeSet<String>,
    pub include_bordering: bool,
    pub distance_unit: DistanceUnit,
    /// Origin for nearest-retailer search.
    pub near: Option<Point<f64>>,
}

impl SelectionState {
    #[must_use]
    pub fn with_distance_unit(distance_unit: DistanceUnit) -> Self {
        Self {
            distance_unit,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    ToggleCategory(String),
    SetCategories(BTreeSet<String>),
    ClearCategories,
    ToggleWard(String),
    ClearWards,
    /// Ignored while bordering areas are excluded.
    ToggleCounty(String),
    ClearCounties,
    /// Turning bordering areas off also clears the county selection.
    SetIncludeBordering(bool),
    SetDistanceUnit(DistanceUnit),
    SetNearOrigin(Point<f64>),
    ClearNearOrigin,
    /// Back to defaults, keeping the distance unit.
    Reset,
}

fn toggle(mut set: BTreeSet<String>, value: String) -> BTreeSet<String> {
    if !set.remove(&value) {
        set.insert(value);
    }
    set
}

/// Apply one event to the selection.
#[must_use]
pub fn reduce(state: SelectionState, event: SelectionEvent) -> SelectionState {
    match event {
        SelectionEvent::ToggleCategory(label) => SelectionState {
            categories: toggle(state.categories, label),
            ..state
        },
        SelectionEvent::SetCategories(categories) => SelectionState { categories, ..state },
        SelectionEvent::ClearCategories => SelectionState {
            categories: BTreeSet::new(),
            ..state
        },
        SelectionEvent::ToggleWard(id) => SelectionState {
            wards: toggle(state.wards, id),
            ..state
        },
        SelectionEvent::ClearWards => SelectionState {
            wards: BTreeSet::new(),
            ..state
        },
        SelectionEvent::ToggleCounty(id) if state.include_bordering => SelectionState {
            counties: toggle(state.counties, id),
            ..state
        },
        SelectionEvent::ToggleCounty(id) => {
            tracing::debug!(id = %id, "ignoring county toggle while bordering areas are excluded");
            state
        }
        SelectionEvent::ClearCounties => SelectionState {
            counties: BTreeSet::new(),
            ..state
        },
        SelectionEvent::SetIncludeBordering(include_bordering) => SelectionState {
            include_bordering,
            counties: if include_bordering {
                state.counties
            } else {
                BTreeSet::new()
            },
            ..state
        },
        SelectionEvent::SetDistanceUnit(distance_unit) => SelectionState {
            distance_unit,
            ..state
        },
        SelectionEvent::SetNearOrigin(origin) => SelectionState {
            near: Some(origin),
            ..state
        },
        SelectionEvent::ClearNearOrigin => SelectionState { near: None, ..state },
        SelectionEvent::Reset => SelectionState::with_distance_unit(state.distance_unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(events: Vec<SelectionEvent>) -> SelectionState {
        events
            .into_iter()
            .fold(SelectionState::default(), reduce)
    }

    #[test]
    fn toggling_twice_removes() {
        let state = apply(vec![
            SelectionEvent::ToggleCategory("Pharmacy".into()),
            SelectionEvent::ToggleCategory("Supermarket".into()),
            SelectionEvent::ToggleCategory("Pharmacy".into()),
        ]);
        assert_eq!(
            state.categories.into_iter().collect::<Vec<_>>(),
            vec!["Supermarket".to_string()]
        );
    }

    #[test]
    fn county_toggle_needs_bordering_areas() {
        let state = apply(vec![SelectionEvent::ToggleCounty("24031".into())]);
        assert!(state.counties.is_empty());

        let state = apply(vec![
            SelectionEvent::SetIncludeBordering(true),
            SelectionEvent::ToggleCounty("24031".into()),
        ]);
        assert!(state.counties.contains("24031"));
    }

    #[test]
    fn excluding_bordering_areas_clears_counties() {
        let state = apply(vec![
            SelectionEvent::SetIncludeBordering(true),
            SelectionEvent::ToggleCounty("24031".into()),
            SelectionEvent::ToggleWard("1".into()),
            SelectionEvent::SetIncludeBordering(false),
        ]);
        assert!(!state.include_bordering);
        assert!(state.counties.is_empty());
        assert!(state.wards.contains("1"));
    }

    #[test]
    fn unit_change_keeps_origin() {
        let origin = Point::new(-77.0, 38.9);
        let state = apply(vec![
            SelectionEvent::SetNearOrigin(origin),
            SelectionEvent::SetDistanceUnit(DistanceUnit::Kilometers),
        ]);
        assert_eq!(state.near, Some(origin));
        assert_eq!(state.distance_unit, DistanceUnit::Kilometers);
    }

    #[test]
    fn reset_keeps_unit_only() {
        let state = apply(vec![
            SelectionEvent::SetDistanceUnit(DistanceUnit::Kilometers),
            SelectionEvent::ToggleWard("3".into()),
            SelectionEvent::SetNearOrigin(Point::new(-77.0, 38.9)),
            SelectionEvent::Reset,
        ]);
        assert_eq!(
            state,
            SelectionState::with_distance_unit(DistanceUnit::Kilometers)
        );
    }

    #[test]
    fn set_and_clear_categories() {
        let labels: BTreeSet<String> = ["Pharmacy".to_string()].into_iter().collect();
        let state = apply(vec![SelectionEvent::SetCategories(labels.clone())]);
        assert_eq!(state.categories, labels);
        let state = reduce(state, SelectionEvent::ClearCategories);
        assert!(state.categories.is_empty());
    }
}
