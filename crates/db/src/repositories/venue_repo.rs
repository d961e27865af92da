//! Repository for the `venues` table and its satellite tables
//! (favorites, visits, reviews).
//!
//! The search query is a bounding-box prefilter with pushed-down column
//! predicates; exact distance ranking happens in the aggregator afterwards.

use sqlx::PgPool;

use playcircle_core::geo::BoundingBox;
use playcircle_core::types::DbId;

use crate::models::venue::{
    CreateVenueReview, IngestVenue, VenueReview, VenueRow, VenueSearchParams,
};

/// Column list for `venues` queries (unqualified; queries use no join that
/// would make these ambiguous).
const VENUE_COLUMNS: &str = "\
    id, name, venue_type, google_place_id, formatted_address, lat, lng, \
    phone_number, website, description, rating, total_reviews, price_level, \
    amenities, age_min, age_max, hours, photo_urls, accessibility_features, \
    parking_available, indoor_outdoor, created_at, updated_at";

/// Column list for `venue_reviews` queries.
const REVIEW_COLUMNS: &str = "\
    id, venue_id, user_id, rating, title, comment, visit_date, \
    age_of_children, helpful_count, created_at, updated_at";

/// Requester-specific annotation columns. With an anonymous requester the
/// bound id is NULL and both EXISTS subqueries come back false.
const ANNOTATION_COLUMNS: &str = "\
    EXISTS(SELECT 1 FROM user_favorite_venues f \
           WHERE f.venue_id = venues.id AND f.user_id = $1) AS is_favorite, \
    EXISTS(SELECT 1 FROM venue_visits vv \
           WHERE vv.venue_id = venues.id AND vv.user_id = $1) AS user_has_visited";

/// WHERE clause for the bbox search row query ($1 is the requester id used
/// by the annotation columns).
const SEARCH_PREDICATES: &str = "\
    lat BETWEEN $2 AND $3 \
    AND lng BETWEEN $4 AND $5 \
    AND ($6::venue_type[] IS NULL OR venue_type = ANY($6)) \
    AND ($7::double precision IS NULL OR rating >= $7) \
    AND ($8::indoor_outdoor IS NULL OR indoor_outdoor = $8) \
    AND (NOT $9 OR parking_available)";

/// Exact-count twin of the row query: same predicates, no annotation
/// columns, so the binds start at $1.
const COUNT_SQL: &str = "\
    SELECT COUNT(*) FROM venues \
    WHERE lat BETWEEN $1 AND $2 \
      AND lng BETWEEN $3 AND $4 \
      AND ($5::venue_type[] IS NULL OR venue_type = ANY($5)) \
      AND ($6::double precision IS NULL OR rating >= $6) \
      AND ($7::indoor_outdoor IS NULL OR indoor_outdoor = $7) \
      AND (NOT $8 OR parking_available)";

/// Provides venue persistence operations. Search is read-only; writes happen
/// only through ingestion, favorites, visits, and reviews.
pub struct VenueRepo;

impl VenueRepo {
    // -----------------------------------------------------------------------
    // Search (step 1 of the aggregator)
    // -----------------------------------------------------------------------

    /// Bounding-box search with pushed-down column predicates and pagination.
    ///
    /// Returns the page of rows (rating-descending, the stored order) plus
    /// the exact count of all rows matching the predicates. The count drives
    /// the external-lookup fallback decision.
    pub async fn search_bbox(
        pool: &PgPool,
        params: &VenueSearchParams,
        bbox: &BoundingBox,
        requester: Option<DbId>,
    ) -> Result<(Vec<VenueRow>, i64), sqlx::Error> {
        let rows_sql = format!(
            "SELECT {VENUE_COLUMNS}, {ANNOTATION_COLUMNS} \
             FROM venues \
             WHERE {SEARCH_PREDICATES} \
             ORDER BY rating DESC \
             LIMIT $10 OFFSET $11"
        );

        let rows = sqlx::query_as::<_, VenueRow>(&rows_sql)
            .bind(requester)
            .bind(bbox.min_lat)
            .bind(bbox.max_lat)
            .bind(bbox.min_lng)
            .bind(bbox.max_lng)
            .bind(params.venue_types.as_deref())
            .bind(params.min_rating)
            .bind(params.indoor_outdoor)
            .bind(params.parking_required)
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(pool)
            .await?;

        let (count,): (i64,) = sqlx::query_as(COUNT_SQL)
            .bind(bbox.min_lat)
            .bind(bbox.max_lat)
            .bind(bbox.min_lng)
            .bind(bbox.max_lng)
            .bind(params.venue_types.as_deref())
            .bind(params.min_rating)
            .bind(params.indoor_outdoor)
            .bind(params.parking_required)
            .fetch_one(pool)
            .await?;

        Ok((rows, count))
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Find a venue by database id, annotated for the requester.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        requester: Option<DbId>,
    ) -> Result<Option<VenueRow>, sqlx::Error> {
        let sql = format!(
            "SELECT {VENUE_COLUMNS}, {ANNOTATION_COLUMNS} FROM venues WHERE id = $2"
        );
        sqlx::query_as::<_, VenueRow>(&sql)
            .bind(requester)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a venue by its external place id, annotated for the requester.
    pub async fn find_by_place_id(
        pool: &PgPool,
        place_id: &str,
        requester: Option<DbId>,
    ) -> Result<Option<VenueRow>, sqlx::Error> {
        let sql = format!(
            "SELECT {VENUE_COLUMNS}, {ANNOTATION_COLUMNS} FROM venues WHERE google_place_id = $2"
        );
        sqlx::query_as::<_, VenueRow>(&sql)
            .bind(requester)
            .bind(place_id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Ingestion (details-view of an external-only result)
    // -----------------------------------------------------------------------

    /// Insert a venue from an external place-details result, or refresh the
    /// volatile fields if the place id was ingested concurrently.
    pub async fn upsert_from_place(
        pool: &PgPool,
        venue: &IngestVenue,
    ) -> Result<VenueRow, sqlx::Error> {
        let sql = format!(
            "INSERT INTO venues \
                 (name, venue_type, google_place_id, formatted_address, lat, lng, \
                  phone_number, website, rating, total_reviews, price_level, \
                  age_min, age_max, photo_urls, indoor_outdoor) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             ON CONFLICT (google_place_id) DO UPDATE SET \
                 rating = EXCLUDED.rating, \
                 total_reviews = EXCLUDED.total_reviews, \
                 photo_urls = EXCLUDED.photo_urls, \
                 updated_at = now() \
             RETURNING {VENUE_COLUMNS}, FALSE AS is_favorite, FALSE AS user_has_visited"
        );

        sqlx::query_as::<_, VenueRow>(&sql)
            .bind(&venue.name)
            .bind(venue.venue_type)
            .bind(&venue.google_place_id)
            .bind(&venue.formatted_address)
            .bind(venue.lat)
            .bind(venue.lng)
            .bind(&venue.phone_number)
            .bind(&venue.website)
            .bind(venue.rating)
            .bind(venue.total_reviews)
            .bind(venue.price_level)
            .bind(venue.age_suitability.min)
            .bind(venue.age_suitability.max)
            .bind(&venue.photo_urls)
            .bind(venue.indoor_outdoor)
            .fetch_one(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Favorites
    // -----------------------------------------------------------------------

    /// Add a venue to the user's favorites. Idempotent.
    pub async fn add_favorite(
        pool: &PgPool,
        user_id: DbId,
        venue_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_favorite_venues (user_id, venue_id) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_user_favorite_venues_user_venue DO NOTHING",
        )
        .bind(user_id)
        .bind(venue_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a venue from the user's favorites. Returns whether a row was
    /// actually deleted.
    pub async fn remove_favorite(
        pool: &PgPool,
        user_id: DbId,
        venue_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM user_favorite_venues WHERE user_id = $1 AND venue_id = $2",
        )
        .bind(user_id)
        .bind(venue_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Visits
    // -----------------------------------------------------------------------

    /// Log a venue visit, optionally linked to a playdate.
    pub async fn record_visit(
        pool: &PgPool,
        venue_id: DbId,
        user_id: DbId,
        visit_date: chrono::NaiveDate,
        playdate_id: Option<DbId>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO venue_visits (venue_id, user_id, visit_date, playdate_id) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(venue_id)
        .bind(user_id)
        .bind(visit_date)
        .bind(playdate_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reviews
    // -----------------------------------------------------------------------

    /// List a venue's reviews, newest first.
    pub async fn list_reviews(
        pool: &PgPool,
        venue_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VenueReview>, sqlx::Error> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM venue_reviews \
             WHERE venue_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, VenueReview>(&sql)
            .bind(venue_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Create a review and refresh the venue's aggregate rating and review
    /// count in the same transaction.
    ///
    /// The unique (venue_id, user_id) constraint enforces one review per
    /// user per venue; violations surface as a conflict.
    pub async fn create_review(
        pool: &PgPool,
        venue_id: DbId,
        user_id: DbId,
        input: &CreateVenueReview,
    ) -> Result<VenueReview, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let sql = format!(
            "INSERT INTO venue_reviews \
                 (venue_id, user_id, rating, title, comment, visit_date, age_of_children) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {REVIEW_COLUMNS}"
        );
        let review = sqlx::query_as::<_, VenueReview>(&sql)
            .bind(venue_id)
            .bind(user_id)
            .bind(input.rating)
            .bind(&input.title)
            .bind(&input.comment)
            .bind(input.visit_date)
            .bind(&input.age_of_children)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE venues SET \
                 rating = COALESCE((SELECT AVG(rating) FROM venue_reviews WHERE venue_id = $1), 0), \
                 total_reviews = (SELECT COUNT(*) FROM venue_reviews WHERE venue_id = $1), \
                 updated_at = now() \
             WHERE id = $1",
        )
        .bind(venue_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(review)
    }
}
