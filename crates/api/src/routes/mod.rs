pub mod admin;
pub mod children;
pub mod circles;
pub mod health;
pub mod playdates;
pub mod venues;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /venues/search                      merged venue search (public)
/// /venues/{id}                        details, ingests external venues
/// /venues/{id}/favorite               favorite, unfavorite
/// /venues/{id}/reviews                list, create
/// /venues/{id}/visits                 record a visit
///
/// /circles                            list mine, create
/// /circles/{id}                       details (members only)
/// /circles/{id}/join                  request membership
/// /circles/{id}/members               list (approved members)
/// /circles/{id}/members/{user_id}     approve/decline (circle admin)
/// /circles/{id}/messages              list, post (approved members)
///
/// /playdates                          list upcoming, create
/// /playdates/{id}                     details with RSVPs
/// /playdates/{id}/rsvp                per-child RSVP upsert
/// /playdates/{id}/cancel              cancel (creator or circle admin)
///
/// /children                           list mine, create
/// /children/{id}                      delete
///
/// /admin/stats                        platform totals (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/venues", venues::router())
        .nest("/circles", circles::router())
        .nest("/playdates", playdates::router())
        .nest("/children", children::router())
        .nest("/admin", admin::router())
}
