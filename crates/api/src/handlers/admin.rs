//! Handlers for the super-admin oversight dashboard.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use playcircle_core::error::CoreError;
use playcircle_db::repositories::{AdminRepo, ProfileRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/stats
///
/// Platform-wide totals. Requires the profile-level admin flag, checked per
/// request rather than trusted from the token.
pub async fn stats(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    if !ProfileRepo::is_admin(&state.pool, auth.user_id).await? {
        return Err(AppError::Core(CoreError::Forbidden(
            "Requires admin privileges".into(),
        )));
    }

    let stats = AdminRepo::stats(&state.pool).await?;

    Ok(Json(DataResponse { data: stats }))
}
