//! Places API nearby-search client.

use nearby_core::{ApiKey, PlacesConfig, PlacesError};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::response::{handle_response, API_KEY_HEADER, FIELD_MASK_HEADER};
use crate::types::{lenient, Coordinate, RawPlace};

const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/v1";

/// Search circle radius around the origin, in meters.
pub const SEARCH_RADIUS_METERS: f64 = 1500.0;

/// Venue categories included in every search.
pub const INCLUDED_TYPES: [&str; 3] = ["restaurant", "night_club", "hotel"];

/// Result count requested from the provider.
pub const MAX_RESULT_COUNT: u32 = 20;

/// Provider ranking hint.
pub const RANK_PREFERENCE: &str = "popularity";

/// Fields requested from the provider; everything the normalizer reads.
pub const FIELD_MASK: &str =
    "places.displayName,places.formattedAddress,places.rating,places.location,places.id";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchNearbyRequest<'a> {
    location_restriction: LocationRestriction,
    included_types: &'a [&'a str],
    max_result_count: u32,
    rank_preference: &'a str,
}

#[derive(Debug, Serialize)]
struct LocationRestriction {
    circle: Circle,
}

#[derive(Debug, Serialize)]
struct Circle {
    center: Coordinate,
    radius: f64,
}

#[derive(Debug, Deserialize)]
struct SearchNearbyResponse {
    #[serde(default, deserialize_with = "lenient")]
    places: Option<Vec<serde_json::Value>>,
}

/// Client for `places:searchNearby`.
#[derive(Debug, Clone)]
pub struct NearbySearchClient {
    client: reqwest::Client,
    api_key: ApiKey,
    base_url: String,
}

impl NearbySearchClient {
    pub fn new(api_key: ApiKey) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at a different Places API root (proxies, mock servers).
    pub fn with_base_url(api_key: ApiKey, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build from configuration; fails with `Configuration` when no key is set.
    pub fn from_config(config: &PlacesConfig) -> Result<Self, PlacesError> {
        Ok(Self::with_base_url(config.api_key()?, &config.places_base_url))
    }

    /// Fetch raw venue records around `origin`.
    ///
    /// A response without a `places` field yields an empty list. Entries that are
    /// not JSON objects are skipped.
    #[instrument(skip(self), level = "debug")]
    pub async fn search_nearby(&self, origin: Coordinate) -> Result<Vec<RawPlace>, PlacesError> {
        let url = format!("{}/places:searchNearby", self.base_url);

        let body = SearchNearbyRequest {
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: origin,
                    radius: SEARCH_RADIUS_METERS,
                },
            },
            included_types: &INCLUDED_TYPES,
            max_result_count: MAX_RESULT_COUNT,
            rank_preference: RANK_PREFERENCE,
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .header(FIELD_MASK_HEADER, FIELD_MASK)
            .json(&body)
            .send()
            .await?;

        let resp: SearchNearbyResponse = handle_response(response).await?;

        Ok(resp
            .places
            .unwrap_or_default()
            .into_iter()
            .filter_map(|place| serde_json::from_value(place).ok())
            .collect())
    }
}
