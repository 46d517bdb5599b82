//! Retailer filtering for the SNAP retailer map.
//!
//! Loads retailer points and region polygons, then answers the questions the
//! map asks on every interaction: which retailers match the current store-type
//! and ward/county selection, how many of each type there are, and which
//! retailer of each type is nearest to a chosen point.

pub mod aggregate;
pub mod boundary;
pub mod dataset;
pub mod directions;
pub mod distance;
pub mod error;
pub mod exclude;
pub mod filter;
pub mod geometry;
pub mod nearest;
pub mod regions;
pub mod selection;
pub mod session;
pub mod types;

pub use aggregate::{
    filter_and_summarize, store_type_options, FilterContext, FilterSummary, LegendEntry,
};
pub use dataset::{
    load_retailers, parse_feature_collection, parse_retailers_ndjson, read_feature_collection,
    MapData, RetailerSet,
};
pub use directions::directions_url;
pub use distance::haversine_distance;
pub use error::FilterError;
pub use exclude::{exclude_store_type, ExcludeStats};
pub use filter::{matches_any_region, matches_category, RegionFilter};
pub use nearest::{nearest_per_category, NearestRetailer};
pub use regions::{Region, RegionIndex, RegionKind, RegionShape};
pub use selection::{reduce, SelectionEvent, SelectionState};
pub use session::{MapSession, MapView};
pub use types::{Retailer, RetailerSource};
