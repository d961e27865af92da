//! Wire types for the place-lookup API.

use serde::Deserialize;

/// One result from a nearby-search call.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceResult {
    pub place_id: String,
    pub name: String,
    /// Nearby search returns `vicinity`; details return `formatted_address`.
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
    pub geometry: Geometry,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<i32>,
    #[serde(default)]
    pub price_level: Option<i16>,
    /// Category tags, in the service's priority order.
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
}

impl PlaceResult {
    /// Best available address string for this result.
    pub fn address(&self) -> Option<&str> {
        self.formatted_address
            .as_deref()
            .or(self.vicinity.as_deref())
    }

    /// Reference of the first photo, if the result has any.
    pub fn first_photo_ref(&self) -> Option<&str> {
        self.photos.first().map(|p| p.photo_reference.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoRef {
    pub photo_reference: String,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub width: Option<i32>,
}

/// Full place details, fetched when a user opens an external-only venue.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetails {
    #[serde(flatten)]
    pub place: PlaceResult,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Envelope shared by nearby-search and details responses.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchEnvelope {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailsEnvelope {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    pub result: Option<PlaceDetails>,
}
