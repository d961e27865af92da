//! Handlers for venue discovery, details, favorites, reviews, and visits.
//!
//! Search and details work anonymously (via [`OptionalAuthUser`]) and
//! personalize the favorite/visited flags when a token is present. Writes
//! require authentication.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use playcircle_core::error::CoreError;
use playcircle_core::types::DbId;
use playcircle_core::venue::{
    default_age_range, default_indoor_outdoor, venue_type_from_categories,
};
use playcircle_db::models::venue::{
    CreateVenueReview, CreateVenueVisit, IngestVenue, VenueSearchParams, VenueWithDetails,
};
use playcircle_db::repositories::VenueRepo;
use playcircle_places::PlaceDetails;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::venue_search;

/// How many photos to keep when ingesting an external place.
const INGEST_PHOTO_LIMIT: usize = 5;

/// How many recent reviews the details endpoint embeds.
const RECENT_REVIEW_LIMIT: i64 = 5;

/// GET /api/v1/venues/search
///
/// Merged store + external venue search. See [`crate::venue_search`].
pub async fn search_venues(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    Query(params): Query<VenueSearchParams>,
) -> AppResult<impl IntoResponse> {
    let result =
        venue_search::search(&state.pool, state.places.as_ref(), &params, auth.user_id()).await?;

    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/venues/{id}
///
/// Venue details. `id` is either a database UUID or, for venues that only
/// exist at the external provider so far, the external place id. Opening an
/// external-only venue ingests it: from then on it has a stable UUID.
pub async fn get_venue(
    auth: OptionalAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let requester = auth.user_id();

    let row = match id.parse::<Uuid>() {
        Ok(venue_id) => VenueRepo::find_by_id(&state.pool, venue_id, requester)
            .await?
            .ok_or_else(|| venue_not_found(&id))?,
        // Not a UUID: resolve as an external place id, ingesting on miss.
        Err(_) => match VenueRepo::find_by_place_id(&state.pool, &id, requester).await? {
            Some(row) => row,
            None => ingest_external(&state, &id).await?,
        },
    };

    let reviews = VenueRepo::list_reviews(&state.pool, row.id, RECENT_REVIEW_LIMIT, 0).await?;

    let mut venue = VenueWithDetails::from_row(row, None);
    venue.recent_reviews = reviews;

    Ok(Json(DataResponse { data: venue }))
}

/// Fetch details from the external provider and upsert them as a venue.
async fn ingest_external(
    state: &AppState,
    place_id: &str,
) -> AppResult<playcircle_db::models::venue::VenueRow> {
    let details = state
        .places
        .place_details(place_id)
        .await
        .map_err(|err| AppError::InternalError(format!("Place details lookup failed: {err}")))?
        .ok_or_else(|| venue_not_found(place_id))?;

    let ingest = build_ingest(state, &details);
    let row = VenueRepo::upsert_from_place(&state.pool, &ingest).await?;

    tracing::info!(venue_id = %row.id, place_id, "Ingested external venue");
    Ok(row)
}

/// Map external place details onto the ingestion DTO, deriving the venue
/// type, age range, and indoor/outdoor defaults from the category tags.
fn build_ingest(state: &AppState, details: &PlaceDetails) -> IngestVenue {
    let place = &details.place;
    let venue_type = venue_type_from_categories(&place.types);

    let photo_urls = place
        .photos
        .iter()
        .take(INGEST_PHOTO_LIMIT)
        .map(|p| state.places.photo_url(&p.photo_reference))
        .collect();

    IngestVenue {
        name: place.name.clone(),
        venue_type,
        google_place_id: place.place_id.clone(),
        formatted_address: place.address().map(str::to_string),
        lat: place.geometry.location.lat,
        lng: place.geometry.location.lng,
        phone_number: details.formatted_phone_number.clone(),
        website: details.website.clone(),
        rating: place.rating.unwrap_or(0.0),
        total_reviews: place.user_ratings_total.unwrap_or(0),
        price_level: place.price_level,
        age_suitability: default_age_range(venue_type),
        photo_urls,
        indoor_outdoor: default_indoor_outdoor(venue_type),
    }
}

/// POST /api/v1/venues/{id}/favorite
pub async fn favorite_venue(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(venue_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_venue_exists(&state, venue_id).await?;

    VenueRepo::add_favorite(&state.pool, auth.user_id, venue_id).await?;

    tracing::info!(%venue_id, user_id = %auth.user_id, "Venue favorited");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/venues/{id}/favorite
///
/// Idempotent: removing an absent favorite is still 204.
pub async fn unfavorite_venue(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(venue_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    VenueRepo::remove_favorite(&state.pool, auth.user_id, venue_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Pagination for the review listing.
#[derive(Debug, Deserialize)]
pub struct ReviewListParams {
    #[serde(default = "default_review_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_review_limit() -> i64 {
    20
}

/// GET /api/v1/venues/{id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(venue_id): Path<DbId>,
    Query(params): Query<ReviewListParams>,
) -> AppResult<impl IntoResponse> {
    ensure_venue_exists(&state, venue_id).await?;

    let limit = params.limit.clamp(1, 100);
    let offset = params.offset.max(0);
    let reviews = VenueRepo::list_reviews(&state.pool, venue_id, limit, offset).await?;

    Ok(Json(DataResponse { data: reviews }))
}

/// POST /api/v1/venues/{id}/reviews
///
/// One review per user per venue; a second submission conflicts (409 via
/// the unique constraint).
pub async fn create_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(venue_id): Path<DbId>,
    Json(input): Json<CreateVenueReview>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_venue_exists(&state, venue_id).await?;

    let review = VenueRepo::create_review(&state.pool, venue_id, auth.user_id, &input).await?;

    tracing::info!(%venue_id, user_id = %auth.user_id, rating = input.rating, "Review created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// POST /api/v1/venues/{id}/visits
pub async fn record_visit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(venue_id): Path<DbId>,
    Json(input): Json<CreateVenueVisit>,
) -> AppResult<impl IntoResponse> {
    ensure_venue_exists(&state, venue_id).await?;

    VenueRepo::record_visit(
        &state.pool,
        venue_id,
        auth.user_id,
        input.visit_date,
        input.playdate_id,
    )
    .await?;

    Ok(StatusCode::CREATED)
}

async fn ensure_venue_exists(state: &AppState, venue_id: DbId) -> AppResult<()> {
    VenueRepo::find_by_id(&state.pool, venue_id, None)
        .await?
        .ok_or_else(|| venue_not_found(&venue_id.to_string()))?;
    Ok(())
}

fn venue_not_found(id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Venue",
        id: id.to_string(),
    })
}
