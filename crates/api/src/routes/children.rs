//! Route definitions for the child roster.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::children;
use crate::state::AppState;

/// Child routes mounted at `/children`.
///
/// ```text
/// GET    /        -> list_children
/// POST   /        -> create_child
/// DELETE /{id}    -> delete_child
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(children::list_children).post(children::create_child),
        )
        .route("/{id}", delete(children::delete_child))
}
