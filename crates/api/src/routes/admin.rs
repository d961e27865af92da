//! Route definitions for the admin dashboard.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes mounted at `/admin`.
///
/// ```text
/// GET /stats    -> stats (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(admin::stats))
}
