//! Route definitions for circles, membership, and messages.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::circles;
use crate::state::AppState;

/// Circle routes mounted at `/circles`.
///
/// ```text
/// GET  /                                   -> list_circles
/// POST /                                   -> create_circle
/// GET  /{id}                               -> get_circle
/// POST /{id}/join                          -> join_circle
/// GET  /{id}/members                       -> list_members
/// POST /{id}/members/{user_id}/approve     -> approve_member (admin)
/// POST /{id}/members/{user_id}/decline     -> decline_member (admin)
/// GET  /{id}/messages                      -> list_messages
/// POST /{id}/messages                      -> create_message
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(circles::list_circles).post(circles::create_circle))
        .route("/{id}", get(circles::get_circle))
        .route("/{id}/join", post(circles::join_circle))
        .route("/{id}/members", get(circles::list_members))
        .route(
            "/{id}/members/{user_id}/approve",
            post(circles::approve_member),
        )
        .route(
            "/{id}/members/{user_id}/decline",
            post(circles::decline_member),
        )
        .route(
            "/{id}/messages",
            get(circles::list_messages).post(circles::create_message),
        )
}
