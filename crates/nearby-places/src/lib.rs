//! Nearby venue search for Nearby
//!
//! Queries the Places API around a coordinate, normalizes the loosely-typed
//! provider records, and ranks them by rating. Postal codes are resolved through
//! the Geocoding API.

pub mod details;
pub mod display;
pub mod finder;
pub mod geo;
pub mod geocode;
pub mod normalize;
pub mod rank;
mod response;
pub mod search;
pub mod types;

pub use details::PlaceDetailsClient;
pub use finder::PlaceFinder;
pub use geo::distance_meters;
pub use geocode::GeocodeClient;
pub use normalize::normalize;
pub use rank::{rank, RESULT_CAP};
pub use search::NearbySearchClient;
pub use types::*;

pub use nearby_core::{ApiKey, PlacesConfig, PlacesError};
