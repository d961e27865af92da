//! Route definitions for venue discovery and engagement.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::venues;
use crate::state::AppState;

/// Venue routes mounted at `/venues`.
///
/// ```text
/// GET    /search             -> search_venues
/// GET    /{id}               -> get_venue
/// POST   /{id}/favorite      -> favorite_venue
/// DELETE /{id}/favorite      -> unfavorite_venue
/// GET    /{id}/reviews       -> list_reviews
/// POST   /{id}/reviews       -> create_review
/// POST   /{id}/visits        -> record_visit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(venues::search_venues))
        .route("/{id}", get(venues::get_venue))
        .route(
            "/{id}/favorite",
            post(venues::favorite_venue).delete(venues::unfavorite_venue),
        )
        .route(
            "/{id}/reviews",
            get(venues::list_reviews).post(venues::create_review),
        )
        .route("/{id}/visits", post(venues::record_visit))
}
