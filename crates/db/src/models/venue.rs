//! Venue models and DTOs for discovery, favorites, reviews, and visits.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use playcircle_core::types::{DbId, Timestamp};
use playcircle_core::venue::{AgeRange, IndoorOutdoor, VenueType};

/// Default search radius in meters.
pub const DEFAULT_SEARCH_RADIUS_M: f64 = 5000.0;

/// Default search page size.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

// ---------------------------------------------------------------------------
// Persisted venue row
// ---------------------------------------------------------------------------

/// A `venues` row annotated with the requester's favorite/visit flags.
///
/// The flags come from EXISTS subqueries bound to the requester identity;
/// anonymous requests bind NULL and both come back false.
#[derive(Debug, Clone, FromRow)]
pub struct VenueRow {
    pub id: DbId,
    pub name: String,
    pub venue_type: VenueType,
    pub google_place_id: Option<String>,
    pub formatted_address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub rating: f64,
    pub total_reviews: i32,
    pub price_level: Option<i16>,
    pub amenities: Vec<String>,
    pub age_min: i16,
    pub age_max: i16,
    pub hours: Option<serde_json::Value>,
    pub photo_urls: Vec<String>,
    pub accessibility_features: Vec<String>,
    pub parking_available: bool,
    pub indoor_outdoor: IndoorOutdoor,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub is_favorite: bool,
    pub user_has_visited: bool,
}

// ---------------------------------------------------------------------------
// Request-scoped venue view
// ---------------------------------------------------------------------------

/// A venue as returned by search and details endpoints.
///
/// `id` is a string: persisted venues use their database UUID, while
/// external-only results reuse the external place id as a transient
/// identifier until they are ingested on details view.
#[derive(Debug, Clone, Serialize)]
pub struct VenueWithDetails {
    pub id: String,
    pub name: String,
    pub venue_type: VenueType,
    pub google_place_id: Option<String>,
    pub formatted_address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub rating: f64,
    pub total_reviews: i32,
    pub price_level: Option<i16>,
    pub amenities: Vec<String>,
    pub age_suitability: AgeRange,
    pub hours: Option<serde_json::Value>,
    pub photo_urls: Vec<String>,
    pub accessibility_features: Vec<String>,
    pub parking_available: bool,
    pub indoor_outdoor: IndoorOutdoor,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Great-circle distance from the search center, statute miles.
    /// Absent on the details endpoint (no center to measure from).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    pub is_favorite: bool,
    pub user_has_visited: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recent_reviews: Vec<VenueReview>,
}

impl VenueWithDetails {
    /// Build from a persisted row, attaching a computed distance.
    pub fn from_row(row: VenueRow, distance: Option<f64>) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name,
            venue_type: row.venue_type,
            google_place_id: row.google_place_id,
            formatted_address: row.formatted_address,
            lat: row.lat,
            lng: row.lng,
            phone_number: row.phone_number,
            website: row.website,
            description: row.description,
            rating: row.rating,
            total_reviews: row.total_reviews,
            price_level: row.price_level,
            amenities: row.amenities,
            age_suitability: AgeRange::new(row.age_min, row.age_max),
            hours: row.hours,
            photo_urls: row.photo_urls,
            accessibility_features: row.accessibility_features,
            parking_available: row.parking_available,
            indoor_outdoor: row.indoor_outdoor,
            created_at: row.created_at,
            updated_at: row.updated_at,
            distance,
            is_favorite: row.is_favorite,
            user_has_visited: row.user_has_visited,
            recent_reviews: Vec::new(),
        }
    }
}

/// Search response shape. `has_more` is always false: pagination past the
/// first page is a known limitation, preserved deliberately.
#[derive(Debug, Serialize)]
pub struct VenueSearchResult {
    pub venues: Vec<VenueWithDetails>,
    pub total: i64,
    pub has_more: bool,
}

// ---------------------------------------------------------------------------
// Search filter
// ---------------------------------------------------------------------------

/// Query parameters for `GET /venues/search`.
///
/// List-valued parameters arrive comma-separated; `age_range` arrives as a
/// JSON object string, matching the original client contract.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VenueSearchParams {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// Search radius in meters.
    #[serde(default = "default_radius")]
    #[validate(range(min = 100.0, max = 50000.0))]
    pub radius: f64,

    #[serde(default, deserialize_with = "de_csv_venue_types")]
    pub venue_types: Option<Vec<VenueType>>,

    #[validate(range(min = 0.0, max = 5.0))]
    pub min_rating: Option<f64>,

    #[serde(default, deserialize_with = "de_json_age_range")]
    #[validate(nested)]
    pub age_range: Option<AgeRange>,

    #[serde(default, deserialize_with = "de_csv_strings")]
    pub amenities: Option<Vec<String>>,

    pub indoor_outdoor: Option<IndoorOutdoor>,

    #[serde(default)]
    pub parking_required: bool,

    #[serde(default)]
    pub accessibility_required: bool,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub offset: i64,
}

fn default_radius() -> f64 {
    DEFAULT_SEARCH_RADIUS_M
}

fn default_limit() -> i64 {
    DEFAULT_SEARCH_LIMIT
}

fn de_csv_venue_types<'de, D>(deserializer: D) -> Result<Option<Vec<VenueType>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else { return Ok(None) };

    let types = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<VenueType>().map_err(serde::de::Error::custom))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(if types.is_empty() { None } else { Some(types) })
}

fn de_csv_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else { return Ok(None) };

    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Ok(if items.is_empty() { None } else { Some(items) })
}

fn de_json_age_range<'de, D>(deserializer: D) -> Result<Option<AgeRange>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

// ---------------------------------------------------------------------------
// Ingestion DTO
// ---------------------------------------------------------------------------

/// Fields for upserting a venue from an external place-details result.
/// Built by the API layer; `google_place_id` is the conflict key.
#[derive(Debug, Clone)]
pub struct IngestVenue {
    pub name: String,
    pub venue_type: VenueType,
    pub google_place_id: String,
    pub formatted_address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub rating: f64,
    pub total_reviews: i32,
    pub price_level: Option<i16>,
    pub age_suitability: AgeRange,
    pub photo_urls: Vec<String>,
    pub indoor_outdoor: IndoorOutdoor,
}

// ---------------------------------------------------------------------------
// Reviews and visits
// ---------------------------------------------------------------------------

/// A row from the `venue_reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VenueReview {
    pub id: DbId,
    pub venue_id: DbId,
    pub user_id: DbId,
    pub rating: i16,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub visit_date: Option<chrono::NaiveDate>,
    pub age_of_children: Vec<i16>,
    pub helpful_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a review. One review per user per venue.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVenueReview {
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
    pub visit_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    #[validate(custom(function = "validate_child_ages"))]
    pub age_of_children: Vec<i16>,
}

fn validate_child_ages(ages: &[i16]) -> Result<(), ValidationError> {
    if ages.iter().all(|age| (0..=18).contains(age)) {
        Ok(())
    } else {
        Err(ValidationError::new("age_out_of_range"))
    }
}

/// DTO for logging a venue visit.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVenueVisit {
    pub visit_date: chrono::NaiveDate,
    pub playdate_id: Option<DbId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_params() -> serde_json::Value {
        json!({ "latitude": 40.7128, "longitude": -74.0060 })
    }

    #[test]
    fn defaults_applied_when_optional_params_missing() {
        let params: VenueSearchParams = serde_json::from_value(base_params()).unwrap();
        assert_eq!(params.radius, 5000.0);
        assert_eq!(params.limit, 20);
        assert_eq!(params.offset, 0);
        assert!(!params.parking_required);
        assert!(params.venue_types.is_none());
        params.validate().unwrap();
    }

    #[test]
    fn csv_venue_types_parse() {
        let mut value = base_params();
        value["venue_types"] = json!("park,library, museum");
        let params: VenueSearchParams = serde_json::from_value(value).unwrap();
        assert_eq!(
            params.venue_types,
            Some(vec![VenueType::Park, VenueType::Library, VenueType::Museum])
        );
    }

    #[test]
    fn unknown_venue_type_is_rejected() {
        let mut value = base_params();
        value["venue_types"] = json!("park,castle");
        assert!(serde_json::from_value::<VenueSearchParams>(value).is_err());
    }

    #[test]
    fn age_range_parses_from_json_string() {
        let mut value = base_params();
        value["age_range"] = json!("{\"min\":3,\"max\":12}");
        let params: VenueSearchParams = serde_json::from_value(value).unwrap();
        assert_eq!(params.age_range, Some(AgeRange::new(3, 12)));
    }

    #[test]
    fn out_of_range_fields_fail_with_field_detail() {
        let mut value = base_params();
        value["latitude"] = json!(123.0);
        value["radius"] = json!(50.0);
        value["limit"] = json!(500);
        let params: VenueSearchParams = serde_json::from_value(value).unwrap();

        let errors = params.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("latitude"));
        assert!(fields.contains_key("radius"));
        assert!(fields.contains_key("limit"));
        assert!(!fields.contains_key("longitude"));
    }

    #[test]
    fn age_range_bounds_validated() {
        let mut value = base_params();
        value["age_range"] = json!("{\"min\":0,\"max\":42}");
        let params: VenueSearchParams = serde_json::from_value(value).unwrap();
        assert!(params.validate().is_err());
    }

    #[test]
    fn review_rating_bounds() {
        let review: CreateVenueReview = serde_json::from_value(json!({ "rating": 6 })).unwrap();
        assert!(review.validate().is_err());

        let review: CreateVenueReview =
            serde_json::from_value(json!({ "rating": 4, "age_of_children": [3, 5] })).unwrap();
        review.validate().unwrap();

        let review: CreateVenueReview =
            serde_json::from_value(json!({ "rating": 4, "age_of_children": [3, 25] })).unwrap();
        assert!(review.validate().is_err());
    }
}
