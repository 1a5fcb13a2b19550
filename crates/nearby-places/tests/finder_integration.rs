//! Integration tests for PlaceFinder using wiremock.
//!
//! These tests drive the whole search → normalize → rank pipeline against a mock
//! provider.

use nearby_places::{
    distance_meters, Coordinate, PlaceFinder, PlacesConfig, PlacesError, RESULT_CAP,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> PlacesConfig {
    PlacesConfig {
        api_key: Some("test_key".to_string()),
        places_base_url: server.uri(),
        geocode_base_url: server.uri(),
        region: "us".to_string(),
    }
}

fn finder(server: &MockServer) -> PlaceFinder {
    PlaceFinder::from_config(&config(server)).unwrap()
}

fn origin() -> Coordinate {
    Coordinate::new(40.7128, -74.0060)
}

#[tokio::test]
async fn test_find_nearby_ranks_and_normalizes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/places:searchNearby"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "places": [
                {"id": "three", "displayName": {"text": "Three"}, "rating": 3.0,
                 "location": {"latitude": 40.7130, "longitude": -74.0050}},
                {"id": "five-a", "displayName": {"text": "Five A"}, "rating": 5.0,
                 "distanceInMeters": 500},
                {"id": "unrated", "displayName": {"text": "Unrated"}},
                {"id": "five-b", "displayName": {"text": "Five B"}, "rating": 5.0,
                 "formattedAddress": "2 Side St"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let places = finder(&mock_server).find_nearby(origin()).await.unwrap();

    let ids: Vec<&str> = places.iter().map(|p| p.place_id.as_str()).collect();
    assert_eq!(ids, vec!["five-a", "five-b", "three", "unrated"]);

    assert_eq!(places[0].distance_meters, Some(500.0));
    assert_eq!(places[1].vicinity, "2 Side St");
    assert!(places[1].distance_meters.is_none());
    assert_eq!(
        places[2].distance_meters,
        Some(distance_meters(origin(), Coordinate::new(40.7130, -74.0050)))
    );
    assert!(places[3].rating.is_none());
}

#[tokio::test]
async fn test_find_nearby_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/places:searchNearby"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let places = finder(&mock_server).find_nearby(origin()).await.unwrap();
    assert!(places.is_empty());
}

#[tokio::test]
async fn test_find_nearby_caps_results() {
    let mock_server = MockServer::start().await;

    let raw: Vec<serde_json::Value> = (0..25)
        .map(|i| serde_json::json!({"id": format!("p{i}"), "rating": f64::from(i) / 5.0}))
        .collect();

    Mock::given(method("POST"))
        .and(path("/places:searchNearby"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "places": raw })),
        )
        .mount(&mock_server)
        .await;

    let places = finder(&mock_server).find_nearby(origin()).await.unwrap();

    assert_eq!(places.len(), RESULT_CAP);
    assert_eq!(places[0].place_id, "p24");
    assert_eq!(places[RESULT_CAP - 1].place_id, "p5");
}

#[tokio::test]
async fn test_find_nearby_rejects_bad_coordinate_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = finder(&mock_server)
        .find_nearby(Coordinate::new(120.0, 0.0))
        .await;
    assert!(matches!(result, Err(PlacesError::InvalidInput(_))));
}

#[tokio::test]
async fn test_find_nearby_propagates_upstream_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/places:searchNearby"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": {"code": 429, "status": "RESOURCE_EXHAUSTED"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = finder(&mock_server).find_nearby(origin()).await;
    assert!(matches!(result, Err(PlacesError::Upstream { status: 429, .. })));
}

#[tokio::test]
async fn test_resolve_zipcode() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("address", "94103"))
        .and(query_param("region", "us"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [{"geometry": {"location": {"lat": 37.7726, "lng": -122.4099}}}]
        })))
        .mount(&mock_server)
        .await;

    let coord = finder(&mock_server).resolve_zipcode("94103").await.unwrap();
    assert_eq!(coord, Coordinate::new(37.7726, -122.4099));
}

#[tokio::test]
async fn test_resolve_zipcode_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&mock_server)
        .await;

    let result = finder(&mock_server).resolve_zipcode("99999").await;
    assert!(matches!(result, Err(PlacesError::NotFound(_))));
}

#[tokio::test]
async fn test_resolve_empty_zipcode_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = finder(&mock_server).resolve_zipcode("").await;
    assert!(matches!(result, Err(PlacesError::InvalidInput(_))));
}

#[tokio::test]
async fn test_place_details() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "abc",
            "displayName": {"text": "Corner Bistro"},
            "rating": 4.3
        })))
        .mount(&mock_server)
        .await;

    let details = finder(&mock_server).place_details("abc").await.unwrap();
    assert_eq!(details.name, "Corner Bistro");
    assert_eq!(details.rating, Some(4.3));
}

#[test]
fn test_missing_key_is_configuration_error() {
    let config = PlacesConfig::default();
    let result = PlaceFinder::from_config(&config);
    assert!(matches!(result, Err(PlacesError::Configuration(_))));
}

#[tokio::test]
async fn test_concurrent_searches_share_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/places:searchNearby"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "places": [{"id": "only", "rating": 4.0}]
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let finder = finder(&mock_server);
    let other = finder.clone();
    let (a, b) = tokio::join!(
        finder.find_nearby(origin()),
        other.find_nearby(Coordinate::new(51.5, -0.12))
    );

    assert_eq!(a.unwrap().len(), 1);
    assert_eq!(b.unwrap().len(), 1);
}
