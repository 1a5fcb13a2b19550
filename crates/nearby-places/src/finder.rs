//! Application-facing entry points.

use nearby_core::{PlacesConfig, PlacesError};
use tracing::instrument;

use crate::details::PlaceDetailsClient;
use crate::geocode::GeocodeClient;
use crate::normalize::normalize;
use crate::rank::rank;
use crate::search::NearbySearchClient;
use crate::types::{Coordinate, Place, PlaceDetails};

/// Nearby search, postal-code lookup and place details behind one handle.
///
/// Holds no mutable state; clone it freely across concurrent requests.
#[derive(Debug, Clone)]
pub struct PlaceFinder {
    search: NearbySearchClient,
    geocoder: GeocodeClient,
    details: PlaceDetailsClient,
}

impl PlaceFinder {
    pub fn new(
        search: NearbySearchClient,
        geocoder: GeocodeClient,
        details: PlaceDetailsClient,
    ) -> Self {
        Self {
            search,
            geocoder,
            details,
        }
    }

    /// Build every client from configuration.
    ///
    /// Fails with `PlacesError::Configuration` when no API key is configured, so no
    /// unauthenticated request can ever be made.
    pub fn from_config(config: &PlacesConfig) -> Result<Self, PlacesError> {
        Ok(Self::new(
            NearbySearchClient::from_config(config)?,
            GeocodeClient::from_config(config)?,
            PlaceDetailsClient::from_config(config)?,
        ))
    }

    /// Ranked venues around `origin`, at most `RESULT_CAP` of them.
    #[instrument(skip(self), level = "info")]
    pub async fn find_nearby(&self, origin: Coordinate) -> Result<Vec<Place>, PlacesError> {
        origin.validate()?;

        let raw = self.search.search_nearby(origin).await.map_err(|e| {
            tracing::warn!("Nearby search failed: {}", e);
            e
        })?;
        let fetched = raw.len();

        let places = rank(raw.into_iter().map(|r| normalize(r, origin)).collect());

        tracing::info!("Nearby search returned {} places, kept {}", fetched, places.len());
        Ok(places)
    }

    /// Coordinate for a postal code or free-form address.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve_zipcode(&self, text: &str) -> Result<Coordinate, PlacesError> {
        let coordinate = self.geocoder.geocode(text).await.map_err(|e| {
            tracing::warn!("Geocoding failed: {}", e);
            e
        })?;
        tracing::info!("Resolved '{}' to {}", text.trim(), coordinate);
        Ok(coordinate)
    }

    /// Detail record for one venue.
    #[instrument(skip(self), level = "info")]
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        self.details.get_details(place_id).await.map_err(|e| {
            tracing::warn!("Place details failed: {}", e);
            e
        })
    }

    /// Places API root the details client talks to, for building photo URLs.
    pub fn places_base_url(&self) -> &str {
        self.details.base_url()
    }
}
