//! Places API place-details client.

use nearby_core::{ApiKey, PlacesConfig, PlacesError};
use serde::Deserialize;
use tracing::instrument;

use crate::response::{decode_body, API_KEY_HEADER, FIELD_MASK_HEADER};
use crate::types::{lenient, LatLng, LocalizedText, PlaceDetails};

const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/v1";

/// Fields requested for the detail view.
pub const DETAILS_FIELD_MASK: &str = "id,displayName,formattedAddress,photos,rating,\
userRatingCount,internationalPhoneNumber,editorialSummary,location,types,googleMapsUri,priceLevel";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlaceDetails {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    display_name: Option<LocalizedText>,
    #[serde(default, deserialize_with = "lenient")]
    formatted_address: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    user_rating_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    international_phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    editorial_summary: Option<LocalizedText>,
    #[serde(default, deserialize_with = "lenient")]
    location: Option<LatLng>,
    #[serde(default, deserialize_with = "lenient")]
    types: Option<Vec<serde_json::Value>>,
    #[serde(default, deserialize_with = "lenient")]
    google_maps_uri: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    price_level: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    photos: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
}

impl RawPlaceDetails {
    fn into_details(self, requested_id: &str) -> PlaceDetails {
        PlaceDetails {
            place_id: self.id.unwrap_or_else(|| requested_id.to_string()),
            name: self
                .display_name
                .and_then(|n| n.text)
                .unwrap_or_default(),
            address: self.formatted_address.unwrap_or_default(),
            rating: self.rating,
            user_rating_count: self.user_rating_count,
            phone: self.international_phone_number,
            summary: self.editorial_summary.and_then(|s| s.text),
            location: self.location.and_then(|l| l.coordinate()),
            types: self
                .types
                .unwrap_or_default()
                .into_iter()
                .filter_map(|t| serde_json::from_value(t).ok())
                .collect(),
            maps_uri: self.google_maps_uri,
            price_level: self.price_level,
            photo_names: self
                .photos
                .unwrap_or_default()
                .into_iter()
                .filter_map(|p| serde_json::from_value::<RawPhoto>(p).ok())
                .filter_map(|p| p.name)
                .collect(),
        }
    }
}

impl PlaceDetails {
    /// Media URL for the photo at `index`, or `None` if there is no such photo.
    ///
    /// The credential is not embedded; fetch it with the `X-Goog-Api-Key` header.
    pub fn photo_url(&self, base_url: &str, index: usize, max_width_px: u32) -> Option<String> {
        self.photo_names.get(index).map(|name| {
            format!(
                "{}/{}/media?maxWidthPx={}",
                base_url.trim_end_matches('/'),
                name,
                max_width_px
            )
        })
    }
}

/// Client for `places/{id}`.
#[derive(Debug, Clone)]
pub struct PlaceDetailsClient {
    client: reqwest::Client,
    api_key: ApiKey,
    base_url: String,
}

impl PlaceDetailsClient {
    pub fn new(api_key: ApiKey) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

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

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the detail record for `place_id`.
    #[instrument(skip(self), level = "debug")]
    pub async fn get_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let place_id = place_id.trim();
        if place_id.is_empty() {
            return Err(PlacesError::InvalidInput("a place id is required".to_string()));
        }

        let url = format!(
            "{}/places/{}",
            self.base_url,
            urlencoding::encode(place_id)
        );

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .header(FIELD_MASK_HEADER, DETAILS_FIELD_MASK)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;

        if status == 404 {
            return Err(PlacesError::NotFound(format!("place '{}'", place_id)));
        }

        let raw: RawPlaceDetails = decode_body(status, &text)?;
        Ok(raw.into_details(place_id))
    }
}
