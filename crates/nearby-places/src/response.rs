//! Shared upstream response handling.

use nearby_core::PlacesError;

pub(crate) const API_KEY_HEADER: &str = "X-Goog-Api-Key";
pub(crate) const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";

/// Decode a success body, or turn a non-2xx response into `PlacesError::Upstream`
/// carrying the provider's payload.
pub(crate) async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, PlacesError> {
    let status = response.status().as_u16();
    let text = response.text().await?;
    decode_body(status, &text)
}

pub(crate) fn decode_body<T: serde::de::DeserializeOwned>(
    status: u16,
    text: &str,
) -> Result<T, PlacesError> {
    if !(200..300).contains(&status) {
        return Err(PlacesError::upstream(status, text));
    }

    serde_json::from_str(text).map_err(|e| PlacesError::Upstream {
        status,
        details: serde_json::Value::String(format!("Invalid response body: {}", e)),
    })
}
