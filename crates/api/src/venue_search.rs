//! Venue search aggregator.
//!
//! Merges persisted venues with results from the external place-lookup
//! service:
//!
//! 1. Bounding-box prefilter against the `venues` table, with SQL-level
//!    filters (type, rating, indoor/outdoor, parking) and requester
//!    favorite/visit annotation.
//! 2. Distance annotation (great-circle miles from the search center).
//! 3. If the store holds fewer matches than the requested limit, fan out one
//!    nearby-search call per family category. A failed category is logged
//!    and skipped; the search still answers from whatever succeeded.
//! 4. External results are deduplicated (across categories and against
//!    already-persisted venues) and converted to transient venues with
//!    type-derived defaults. Only enough to fill the remaining limit are
//!    kept, best-rated first.
//! 5. Client-side filters that SQL cannot apply uniformly to transient
//!    results run over the merged list: amenities, accessibility, and age
//!    suitability (the venue's range must contain the requested range).
//! 6. The merged list is stably sorted by distance ascending.
//!
//! `total` counts the merged post-filter list and `has_more` is always
//! false; pagination past the first page is a known limitation, preserved
//! deliberately.

use std::cmp::Ordering;
use std::collections::HashSet;

use sqlx::PgPool;
use validator::Validate;

use playcircle_core::geo::{haversine_miles, BoundingBox};
use playcircle_core::types::DbId;
use playcircle_core::venue::{
    default_age_range, default_indoor_outdoor, venue_type_from_categories, FAMILY_CATEGORIES,
};
use playcircle_db::models::venue::{VenueSearchParams, VenueSearchResult, VenueWithDetails};
use playcircle_db::repositories::VenueRepo;
use playcircle_places::{PlaceLookup, PlaceResult};

use crate::error::AppResult;

/// Run a venue search for the given (possibly anonymous) requester.
///
/// Reads only; external-only results are not persisted here. Ingestion
/// happens when a user opens a venue's details.
pub async fn search(
    pool: &PgPool,
    lookup: &dyn PlaceLookup,
    params: &VenueSearchParams,
    requester: Option<DbId>,
) -> AppResult<VenueSearchResult> {
    params.validate()?;

    let bbox = BoundingBox::around(params.latitude, params.longitude, params.radius);
    let (rows, stored_total) = VenueRepo::search_bbox(pool, params, &bbox, requester).await?;

    let stored = rows
        .into_iter()
        .map(|row| {
            let distance = haversine_miles(params.latitude, params.longitude, row.lat, row.lng);
            VenueWithDetails::from_row(row, Some(distance))
        })
        .collect();

    Ok(assemble(params, stored, stored_total, lookup).await)
}

/// Merge stored venues with external backfill and apply post filters.
///
/// `stored_total` is the store's match count before LIMIT/OFFSET; the
/// external fallback fires only when it falls short of the requested limit.
/// Separated from [`search`] so it can be exercised without a database.
pub(crate) async fn assemble(
    params: &VenueSearchParams,
    stored: Vec<VenueWithDetails>,
    stored_total: i64,
    lookup: &dyn PlaceLookup,
) -> VenueSearchResult {
    let mut venues = stored;

    if stored_total < params.limit {
        let needed = (params.limit - stored_total) as usize;
        let known: HashSet<String> = venues
            .iter()
            .filter_map(|v| v.google_place_id.clone())
            .collect();

        let external = fetch_external(params, lookup).await;
        venues.extend(
            external
                .into_iter()
                .filter(|place| !known.contains(&place.place_id))
                .take(needed)
                .map(|place| from_external(place, params, lookup)),
        );
    }

    apply_post_filters(&mut venues, params);

    // Stable sort: stored venues stay ahead of external ones on equal
    // distance.
    venues.sort_by(|a, b| cmp_distance(a.distance, b.distance));

    let total = venues.len() as i64;
    VenueSearchResult {
        venues,
        total,
        has_more: false,
    }
}

/// Fan out one nearby-search call per family category, concurrently.
///
/// A failing category is logged and contributes nothing; the remaining
/// categories still answer. Results are deduplicated by place id (first
/// occurrence wins) and ordered best-rated first.
async fn fetch_external(params: &VenueSearchParams, lookup: &dyn PlaceLookup) -> Vec<PlaceResult> {
    let radius_meters = params.radius.round() as u32;

    let calls = FAMILY_CATEGORIES.iter().map(|category| async move {
        match lookup
            .search_by_category(params.latitude, params.longitude, radius_meters, category)
            .await
        {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!(category, error = %err, "External venue lookup failed, skipping category");
                Vec::new()
            }
        }
    });

    let mut seen = HashSet::new();
    let mut unique: Vec<PlaceResult> = futures::future::join_all(calls)
        .await
        .into_iter()
        .flatten()
        .filter(|place| seen.insert(place.place_id.clone()))
        .collect();

    unique.sort_by(|a, b| {
        cmp_f64_desc(a.rating.unwrap_or(0.0), b.rating.unwrap_or(0.0))
    });
    unique
}

/// Convert an external result into a transient venue.
///
/// The external place id doubles as the venue id until ingestion; category
/// tags drive the venue type, which in turn drives the age-suitability and
/// indoor/outdoor defaults.
fn from_external(
    place: PlaceResult,
    params: &VenueSearchParams,
    lookup: &dyn PlaceLookup,
) -> VenueWithDetails {
    let venue_type = venue_type_from_categories(&place.types);
    let distance = haversine_miles(
        params.latitude,
        params.longitude,
        place.geometry.location.lat,
        place.geometry.location.lng,
    );
    let formatted_address = place.address().map(str::to_string);
    let photo_urls = place
        .first_photo_ref()
        .map(|r| vec![lookup.photo_url(r)])
        .unwrap_or_default();
    let now = chrono::Utc::now();

    VenueWithDetails {
        id: place.place_id.clone(),
        name: place.name,
        venue_type,
        google_place_id: Some(place.place_id),
        formatted_address,
        lat: place.geometry.location.lat,
        lng: place.geometry.location.lng,
        phone_number: None,
        website: None,
        description: None,
        rating: place.rating.unwrap_or(0.0),
        total_reviews: place.user_ratings_total.unwrap_or(0),
        price_level: place.price_level,
        amenities: Vec::new(),
        age_suitability: default_age_range(venue_type),
        hours: None,
        photo_urls,
        accessibility_features: Vec::new(),
        parking_available: false,
        indoor_outdoor: default_indoor_outdoor(venue_type),
        created_at: now,
        updated_at: now,
        distance: Some(distance),
        is_favorite: false,
        user_has_visited: false,
        recent_reviews: Vec::new(),
    }
}

/// Filters applied uniformly to the merged list.
///
/// Transient venues carry no amenity or accessibility data, so requesting
/// either excludes them. That matches the store-first contract: only
/// curated venues can satisfy amenity-level filters.
fn apply_post_filters(venues: &mut Vec<VenueWithDetails>, params: &VenueSearchParams) {
    if let Some(required) = &params.amenities {
        venues.retain(|v| required.iter().all(|a| v.amenities.contains(a)));
    }

    if params.accessibility_required {
        venues.retain(|v| !v.accessibility_features.is_empty());
    }

    if let Some(requested) = &params.age_range {
        venues.retain(|v| v.age_suitability.contains(requested));
    }
}

fn cmp_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    a.unwrap_or(f64::MAX)
        .partial_cmp(&b.unwrap_or(f64::MAX))
        .unwrap_or(Ordering::Equal)
}

fn cmp_f64_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use playcircle_core::venue::{AgeRange, IndoorOutdoor, VenueType};
    use playcircle_places::types::{Geometry, LatLng, PhotoRef};
    use playcircle_places::{PlaceDetails, PlacesError};

    use super::*;

    /// Scripted [`PlaceLookup`] that records the categories queried.
    struct MockLookup {
        responses: HashMap<&'static str, Vec<PlaceResult>>,
        failing: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl MockLookup {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
                failing: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_response(mut self, category: &'static str, results: Vec<PlaceResult>) -> Self {
            self.responses.insert(category, results);
            self
        }

        fn with_failure(mut self, category: &'static str) -> Self {
            self.failing.push(category);
            self
        }

        fn categories_called(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PlaceLookup for MockLookup {
        async fn search_by_category(
            &self,
            _lat: f64,
            _lng: f64,
            _radius_meters: u32,
            category: &str,
        ) -> Result<Vec<PlaceResult>, PlacesError> {
            self.calls.lock().unwrap().push(category.to_string());
            if self.failing.contains(&category) {
                return Err(PlacesError::Api {
                    status: "OVER_QUERY_LIMIT".into(),
                    message: "quota exceeded".into(),
                });
            }
            Ok(self.responses.get(category).cloned().unwrap_or_default())
        }

        async fn place_details(
            &self,
            _place_id: &str,
        ) -> Result<Option<PlaceDetails>, PlacesError> {
            Ok(None)
        }

        fn photo_url(&self, photo_reference: &str) -> String {
            format!("http://photos.test/{photo_reference}")
        }
    }

    fn params(limit: i64) -> VenueSearchParams {
        let mut p: VenueSearchParams =
            serde_json::from_value(json!({ "latitude": 40.7128, "longitude": -74.0060 }))
                .unwrap();
        p.limit = limit;
        p
    }

    fn place(id: &str, lat: f64, lng: f64, types: &[&str], rating: f64) -> PlaceResult {
        PlaceResult {
            place_id: id.to_string(),
            name: format!("Place {id}"),
            formatted_address: None,
            vicinity: Some("Somewhere".to_string()),
            geometry: Geometry {
                location: LatLng { lat, lng },
            },
            rating: Some(rating),
            user_ratings_total: Some(10),
            price_level: None,
            types: types.iter().map(|t| t.to_string()).collect(),
            photos: vec![PhotoRef {
                photo_reference: format!("photo-{id}"),
                height: Some(400),
                width: Some(400),
            }],
        }
    }

    fn stored(id: &str, place_id: Option<&str>, distance: f64, age: AgeRange) -> VenueWithDetails {
        let now = chrono::Utc::now();
        VenueWithDetails {
            id: id.to_string(),
            name: format!("Venue {id}"),
            venue_type: VenueType::Playground,
            google_place_id: place_id.map(str::to_string),
            formatted_address: None,
            lat: 40.7,
            lng: -74.0,
            phone_number: None,
            website: None,
            description: None,
            rating: 4.0,
            total_reviews: 12,
            price_level: None,
            amenities: vec!["restrooms".to_string()],
            age_suitability: age,
            hours: None,
            photo_urls: Vec::new(),
            accessibility_features: Vec::new(),
            parking_available: true,
            indoor_outdoor: IndoorOutdoor::Outdoor,
            created_at: now,
            updated_at: now,
            distance: Some(distance),
            is_favorite: false,
            user_has_visited: false,
            recent_reviews: Vec::new(),
        }
    }

    #[tokio::test]
    async fn full_store_skips_external_lookup() {
        let lookup = MockLookup::new();
        let p = params(2);
        let db = vec![
            stored("a", None, 1.0, AgeRange::new(0, 18)),
            stored("b", None, 2.0, AgeRange::new(0, 18)),
        ];

        let result = assemble(&p, db, 2, &lookup).await;

        assert_eq!(result.total, 2);
        assert!(!result.has_more);
        assert!(
            lookup.categories_called().is_empty(),
            "no external calls when the store satisfies the limit"
        );
    }

    #[tokio::test]
    async fn under_limit_queries_every_family_category() {
        let lookup = MockLookup::new();
        let p = params(20);

        let _ = assemble(&p, Vec::new(), 0, &lookup).await;

        let mut called = lookup.categories_called();
        called.sort();
        let mut expected: Vec<String> =
            FAMILY_CATEGORIES.iter().map(|c| c.to_string()).collect();
        expected.sort();
        assert_eq!(called, expected);
    }

    #[tokio::test]
    async fn failed_category_is_skipped_not_fatal() {
        let lookup = MockLookup::new()
            .with_failure("park")
            .with_response("playground", vec![place("pg1", 40.71, -74.0, &["playground"], 4.5)])
            .with_response("library", vec![place("lib1", 40.72, -74.0, &["library"], 4.2)]);
        let p = params(20);

        let result = assemble(&p, Vec::new(), 0, &lookup).await;

        assert_eq!(result.total, 2);
        assert_eq!(lookup.categories_called().len(), FAMILY_CATEGORIES.len());
    }

    #[tokio::test]
    async fn all_categories_failing_still_answers_from_store() {
        let mut lookup = MockLookup::new();
        for category in FAMILY_CATEGORIES {
            lookup = lookup.with_failure(category);
        }
        let p = params(20);
        let db = vec![stored("a", None, 0.5, AgeRange::new(0, 18))];

        let result = assemble(&p, db, 1, &lookup).await;

        assert_eq!(result.total, 1);
        assert_eq!(result.venues[0].id, "a");
    }

    #[tokio::test]
    async fn external_results_deduped_against_store() {
        let lookup = MockLookup::new().with_response(
            "park",
            vec![
                place("known-place", 40.71, -74.0, &["park"], 4.9),
                place("new-place", 40.72, -74.0, &["park"], 4.1),
            ],
        );
        let p = params(20);
        let db = vec![stored("a", Some("known-place"), 0.5, AgeRange::new(0, 18))];

        let result = assemble(&p, db, 1, &lookup).await;

        assert_eq!(result.total, 2);
        let ids: Vec<&str> = result.venues.iter().map(|v| v.id.as_str()).collect();
        assert!(ids.contains(&"a"));
        assert!(ids.contains(&"new-place"));
        assert!(!ids.contains(&"known-place"));
    }

    #[tokio::test]
    async fn duplicate_place_across_categories_counted_once() {
        let shared = place("shared", 40.71, -74.0, &["park", "playground"], 4.8);
        let lookup = MockLookup::new()
            .with_response("park", vec![shared.clone()])
            .with_response("playground", vec![shared]);
        let p = params(20);

        let result = assemble(&p, Vec::new(), 0, &lookup).await;

        assert_eq!(result.total, 1);
    }

    #[tokio::test]
    async fn backfill_capped_by_remaining_slots_best_rated_first() {
        let lookup = MockLookup::new().with_response(
            "park",
            vec![
                place("low", 40.71, -74.0, &["park"], 3.0),
                place("high", 40.72, -74.0, &["park"], 4.9),
                place("mid", 40.73, -74.0, &["park"], 4.0),
            ],
        );
        let mut p = params(3);
        p.limit = 3;
        let db = vec![
            stored("a", None, 0.1, AgeRange::new(0, 18)),
            stored("b", None, 0.2, AgeRange::new(0, 18)),
        ];

        let result = assemble(&p, db, 2, &lookup).await;

        // Only one slot left; the best-rated external result takes it.
        assert_eq!(result.total, 3);
        let ids: Vec<&str> = result.venues.iter().map(|v| v.id.as_str()).collect();
        assert!(ids.contains(&"high"));
        assert!(!ids.contains(&"mid"));
        assert!(!ids.contains(&"low"));
    }

    #[tokio::test]
    async fn age_filter_requires_containment_not_overlap() {
        let lookup = MockLookup::new();
        let mut p = params(20);
        p.age_range = Some(AgeRange::new(5, 10));
        let db = vec![
            // Contains 5..10 -> kept.
            stored("wide", None, 1.0, AgeRange::new(3, 12)),
            // Overlaps but does not contain -> dropped.
            stored("narrow", None, 2.0, AgeRange::new(6, 9)),
        ];

        let result = assemble(&p, db, 2, &lookup).await;

        assert_eq!(result.total, 1);
        assert_eq!(result.venues[0].id, "wide");
    }

    #[tokio::test]
    async fn amenity_and_accessibility_filters_exclude_transient_venues() {
        let lookup = MockLookup::new()
            .with_response("park", vec![place("ext", 40.71, -74.0, &["park"], 4.5)]);
        let mut p = params(20);
        p.amenities = Some(vec!["restrooms".to_string()]);
        let db = vec![stored("a", None, 0.5, AgeRange::new(0, 18))];

        let result = assemble(&p, db, 1, &lookup).await;

        // The stored venue has restrooms; the transient one has no amenity
        // data and is excluded.
        assert_eq!(result.total, 1);
        assert_eq!(result.venues[0].id, "a");

        let lookup = MockLookup::new()
            .with_response("park", vec![place("ext", 40.71, -74.0, &["park"], 4.5)]);
        let mut p = params(20);
        p.accessibility_required = true;
        let result = assemble(&p, Vec::new(), 0, &lookup).await;
        assert_eq!(result.total, 0);
    }

    #[tokio::test]
    async fn merged_results_sorted_by_distance() {
        // Search center is at params() lat/lng; the external place sits
        // farther north than both stored venues.
        let lookup = MockLookup::new()
            .with_response("park", vec![place("ext", 41.5, -74.0, &["park"], 4.5)]);
        let p = params(20);
        let db = vec![
            stored("far", None, 3.0, AgeRange::new(0, 18)),
            stored("near", None, 1.0, AgeRange::new(0, 18)),
        ];

        let result = assemble(&p, db, 2, &lookup).await;

        assert_eq!(result.total, 3);
        let distances: Vec<f64> = result
            .venues
            .iter()
            .map(|v| v.distance.unwrap())
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(result.venues[0].id, "near");
        assert!(!result.has_more);
    }

    #[tokio::test]
    async fn empty_store_with_one_result_per_category_yields_seven_sorted() {
        // Each category answers with one unique place, progressively farther
        // from the search center.
        let mut lookup = MockLookup::new();
        for (i, category) in FAMILY_CATEGORIES.into_iter().enumerate() {
            let lat = 40.72 + 0.05 * i as f64;
            lookup = lookup.with_response(
                category,
                vec![place(&format!("p{i}"), lat, -74.0, &[category], 4.0)],
            );
        }
        let p = params(20);

        let result = assemble(&p, Vec::new(), 0, &lookup).await;

        assert_eq!(result.total, 7);
        assert_eq!(result.venues.len(), 7);
        assert!(!result.has_more);

        let distances: Vec<f64> = result
            .venues
            .iter()
            .map(|v| v.distance.unwrap())
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));

        let mut ids: Vec<&str> = result.venues.iter().map(|v| v.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, ["p0", "p1", "p2", "p3", "p4", "p5", "p6"]);
    }

    #[tokio::test]
    async fn transient_venue_enriched_with_type_defaults() {
        let lookup = MockLookup::new()
            .with_response("zoo", vec![place("z1", 40.71, -74.0, &["zoo"], 4.6)]);
        let p = params(20);

        let result = assemble(&p, Vec::new(), 0, &lookup).await;

        let venue = result
            .venues
            .iter()
            .find(|v| v.id == "z1")
            .expect("external venue present");
        assert_eq!(venue.venue_type, VenueType::Museum);
        assert_eq!(venue.age_suitability, default_age_range(VenueType::Museum));
        assert_eq!(venue.indoor_outdoor, IndoorOutdoor::Indoor);
        assert_eq!(venue.google_place_id.as_deref(), Some("z1"));
        assert_eq!(venue.photo_urls, vec!["http://photos.test/photo-z1"]);
        assert!(!venue.is_favorite);
        assert!(!venue.user_has_visited);
        assert!(venue.distance.is_some());
    }
}
