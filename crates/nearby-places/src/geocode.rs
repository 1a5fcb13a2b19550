//! Forward geocoding: postal code or address → coordinate.
//! Uses the Google Geocoding API with a region bias.

use nearby_core::{ApiKey, PlacesConfig, PlacesError};
use serde::Deserialize;
use tracing::instrument;

use crate::response::decode_body;
use crate::types::{lenient, Coordinate};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
const DEFAULT_REGION: &str = "us";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default, deserialize_with = "lenient")]
    results: Option<Vec<serde_json::Value>>,
    #[serde(default, deserialize_with = "lenient")]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default, deserialize_with = "lenient")]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(default, deserialize_with = "lenient")]
    location: Option<GeocodeLocation>,
}

#[derive(Debug, Deserialize)]
struct GeocodeLocation {
    lat: f64,
    lng: f64,
}

/// Client for the Geocoding API `geocode/json` endpoint.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: reqwest::Client,
    api_key: ApiKey,
    base_url: String,
    region: String,
}

impl GeocodeClient {
    pub fn new(api_key: ApiKey) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, DEFAULT_REGION)
    }

    pub fn with_base_url(api_key: ApiKey, base_url: &str, region: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            region: region.to_string(),
        }
    }

    /// Build from configuration; fails with `Configuration` when no key is set.
    pub fn from_config(config: &PlacesConfig) -> Result<Self, PlacesError> {
        Ok(Self::with_base_url(
            config.api_key()?,
            &config.geocode_base_url,
            &config.region,
        ))
    }

    /// Resolve `query` to the coordinate of the provider's first match.
    ///
    /// Blank queries are rejected before any request is made. Alternative matches
    /// beyond the first are discarded.
    #[instrument(skip(self), level = "debug")]
    pub async fn geocode(&self, query: &str) -> Result<Coordinate, PlacesError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PlacesError::InvalidInput(
                "a postal code or address is required".to_string(),
            ));
        }

        let url = format!("{}/geocode/json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("address", query),
                ("region", self.region.as_str()),
                ("key", self.api_key.expose()),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body: GeocodeResponse = decode_body(status, &text)?;

        // ZERO_RESULTS comes back as 200 with an empty list; anything else that is
        // not OK (REQUEST_DENIED, OVER_QUERY_LIMIT, ...) is a provider failure.
        if let Some(provider_status) = body.status.as_deref() {
            if provider_status != "OK" && provider_status != "ZERO_RESULTS" {
                return Err(PlacesError::upstream(status, &text));
            }
        }

        let first = body
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| PlacesError::NotFound(format!("no match for '{}'", query)))?;

        // Only the first match is decoded; later entries may be any shape.
        serde_json::from_value::<GeocodeResult>(first)
            .ok()
            .and_then(|r| r.geometry)
            .and_then(|g| g.location)
            .map(|loc| Coordinate::new(loc.lat, loc.lng))
            .ok_or_else(|| PlacesError::NotFound(format!("no location for '{}'", query)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GeocodeClient {
        let key = ApiKey::new("test_key").unwrap();
        GeocodeClient::with_base_url(key, &server.uri(), "us")
    }

    #[tokio::test]
    async fn test_geocode_first_result() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .and(query_param("address", "10001"))
            .and(query_param("region", "us"))
            .and(query_param("key", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "results": [
                    {"geometry": {"location": {"lat": 40.7506, "lng": -73.9972}}},
                    {"geometry": {"location": {"lat": 1.0, "lng": 2.0}}}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let coord = client(&mock_server).geocode(" 10001 ").await.unwrap();
        assert_eq!(coord, Coordinate::new(40.7506, -73.9972));
    }

    #[tokio::test]
    async fn test_malformed_trailing_result_is_ignored() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "results": [
                    {"geometry": {"location": {"lat": 40.75, "lng": -73.99}}},
                    "junk"
                ]
            })))
            .mount(&mock_server)
            .await;

        let coord = client(&mock_server).geocode("10001").await.unwrap();
        assert_eq!(coord, Coordinate::new(40.75, -73.99));
    }

    #[tokio::test]
    async fn test_malformed_first_result_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "results": [42, {"geometry": {"location": {"lat": 1.0, "lng": 2.0}}}]
            })))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).geocode("10001").await;
        assert!(matches!(result, Err(PlacesError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_query_makes_no_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let geocoder = client(&mock_server);
        assert!(matches!(
            geocoder.geocode("").await,
            Err(PlacesError::InvalidInput(_))
        ));
        assert!(matches!(
            geocoder.geocode("   ").await,
            Err(PlacesError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_results_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .and(query_param("address", "99999"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ZERO_RESULTS",
                "results": []
            })))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).geocode("99999").await;
        assert!(matches!(result, Err(PlacesError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_results_field_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).geocode("00000").await;
        assert!(matches!(result, Err(PlacesError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_first_result_without_location_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "results": [{"geometry": {}}]
            })))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).geocode("10001").await;
        assert!(matches!(result, Err(PlacesError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_request_denied_is_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "REQUEST_DENIED",
                "error_message": "The provided API key is invalid.",
                "results": []
            })))
            .mount(&mock_server)
            .await;

        match client(&mock_server).geocode("10001").await {
            Err(PlacesError::Upstream { status, details }) => {
                assert_eq!(status, 200);
                assert_eq!(details["status"], "REQUEST_DENIED");
            }
            other => unreachable!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).geocode("10001").await;
        assert!(matches!(result, Err(PlacesError::Upstream { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_transport_failure_is_unavailable() {
        // Nothing listens on port 1.
        let key = ApiKey::new("test_key").unwrap();
        let result = GeocodeClient::with_base_url(key, "http://127.0.0.1:1", "us")
            .geocode("10001")
            .await;

        assert!(matches!(result, Err(PlacesError::UpstreamUnavailable(_))));
    }

    #[test]
    fn test_from_config_requires_key() {
        let result = GeocodeClient::from_config(&PlacesConfig::default());
        assert!(matches!(result, Err(PlacesError::Configuration(_))));
    }
}
