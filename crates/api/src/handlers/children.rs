//! Handlers for the requester's child roster.
//!
//! Children are scoped to their parent; no endpoint exposes another user's
//! children directly (RSVP listings reference them by id only).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use playcircle_core::error::CoreError;
use playcircle_core::types::DbId;
use playcircle_db::models::child::CreateChild;
use playcircle_db::repositories::ChildRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/children
pub async fn list_children(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let children = ChildRepo::list_for_parent(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse { data: children }))
}

/// POST /api/v1/children
pub async fn create_child(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateChild>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let child = ChildRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(child_id = %child.id, user_id = %auth.user_id, "Child registered");

    Ok((StatusCode::CREATED, Json(DataResponse { data: child })))
}

/// DELETE /api/v1/children/{id}
///
/// Cascades to the child's RSVP rows.
pub async fn delete_child(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(child_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = ChildRepo::delete(&state.pool, child_id, auth.user_id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Child",
            id: child_id.to_string(),
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}
