//! HTTP client for the place-lookup REST endpoints.
//!
//! Wraps the nearby-search, details, and photo endpoints using [`reqwest`].
//! One category per nearby-search call; the aggregator fans out over
//! categories and treats each call's failure independently.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::{DetailsEnvelope, PlaceDetails, PlaceResult, SearchEnvelope};

/// Default base URL for the hosted place-lookup API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Bounded per-call timeout so a slow lookup never stalls a whole search.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Max width requested for resolved photo URLs.
const PHOTO_MAX_WIDTH: u32 = 800;

/// Errors from the place-lookup API layer.
#[derive(Debug, thiserror::Error)]
pub enum PlacesError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-OK application status.
    #[error("Place lookup error ({status}): {message}")]
    Api { status: String, message: String },
}

/// Seam between the aggregator and the external lookup service.
///
/// Production uses [`GooglePlacesClient`]; tests substitute a mock to verify
/// call counts and per-category failure behaviour.
#[async_trait]
pub trait PlaceLookup: Send + Sync {
    /// Nearby search for a single category around a center point.
    async fn search_by_category(
        &self,
        lat: f64,
        lng: f64,
        radius_meters: u32,
        category: &str,
    ) -> Result<Vec<PlaceResult>, PlacesError>;

    /// Full details for one place, by external place id.
    async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, PlacesError>;

    /// Resolve a photo reference to a display URL. Pure given the reference.
    fn photo_url(&self, photo_reference: &str) -> String;
}

/// Production [`PlaceLookup`] implementation.
pub struct GooglePlacesClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GooglePlacesClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (TLS backend init).
    /// Construction happens once at startup, where misconfiguration should
    /// fail fast rather than run without the bounded timeout.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build places HTTP client");
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl PlaceLookup for GooglePlacesClient {
    async fn search_by_category(
        &self,
        lat: f64,
        lng: f64,
        radius_meters: u32,
        category: &str,
    ) -> Result<Vec<PlaceResult>, PlacesError> {
        let url = format!("{}/nearbysearch/json", self.base_url);
        let location = format!("{lat},{lng}");
        let radius = radius_meters.to_string();

        let envelope: SearchEnvelope = self
            .client
            .get(url)
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", category),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // ZERO_RESULTS is a successful empty answer, not an error.
        match envelope.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(envelope.results),
            status => Err(PlacesError::Api {
                status: status.to_string(),
                message: envelope.error_message.unwrap_or_default(),
            }),
        }
    }

    async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, PlacesError> {
        let url = format!("{}/details/json", self.base_url);
        let fields = "place_id,name,formatted_address,formatted_phone_number,website,\
                      rating,user_ratings_total,price_level,geometry,photos,types";

        let envelope: DetailsEnvelope = self
            .client
            .get(url)
            .query(&[
                ("place_id", place_id),
                ("fields", fields),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match envelope.status.as_str() {
            "OK" => Ok(envelope.result),
            "NOT_FOUND" | "ZERO_RESULTS" => Ok(None),
            status => Err(PlacesError::Api {
                status: status.to_string(),
                message: envelope.error_message.unwrap_or_default(),
            }),
        }
    }

    fn photo_url(&self, photo_reference: &str) -> String {
        format!(
            "{}/photo?photo_reference={photo_reference}&maxwidth={PHOTO_MAX_WIDTH}&key={}",
            self.base_url, self.api_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_url_embeds_reference_and_width() {
        let client = GooglePlacesClient::with_base_url("k".into(), "http://localhost".into());
        let url = client.photo_url("abc123");
        assert!(url.starts_with("http://localhost/photo?"));
        assert!(url.contains("photo_reference=abc123"));
        assert!(url.contains("maxwidth=800"));
    }

    #[test]
    fn nearby_search_envelope_parses() {
        let body = serde_json::json!({
            "status": "OK",
            "results": [{
                "place_id": "p1",
                "name": "Prospect Park",
                "vicinity": "Brooklyn",
                "geometry": { "location": { "lat": 40.66, "lng": -73.97 } },
                "rating": 4.8,
                "user_ratings_total": 1200,
                "types": ["park", "point_of_interest"],
                "photos": [{ "photo_reference": "ref1", "height": 100, "width": 100 }]
            }]
        });
        let envelope: SearchEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.status, "OK");
        let place = &envelope.results[0];
        assert_eq!(place.address(), Some("Brooklyn"));
        assert_eq!(place.first_photo_ref(), Some("ref1"));
        assert_eq!(place.price_level, None);
    }

    #[test]
    fn zero_results_is_empty_not_error() {
        let body = serde_json::json!({ "status": "ZERO_RESULTS" });
        let envelope: SearchEnvelope = serde_json::from_value(body).unwrap();
        assert!(envelope.results.is_empty());
    }
}
