//! Route definitions for playdates and RSVPs.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::playdates;
use crate::state::AppState;

/// Playdate routes mounted at `/playdates`.
///
/// ```text
/// GET    /              -> list_playdates
/// POST   /              -> create_playdate
/// GET    /{id}          -> get_playdate
/// POST   /{id}/rsvp     -> rsvp
/// POST   /{id}/cancel   -> cancel_playdate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(playdates::list_playdates).post(playdates::create_playdate),
        )
        .route("/{id}", get(playdates::get_playdate))
        .route("/{id}/rsvp", post(playdates::rsvp))
        .route("/{id}/cancel", post(playdates::cancel_playdate))
}
