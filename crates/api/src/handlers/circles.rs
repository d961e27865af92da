//! Handlers for circles, membership, and circle messages.
//!
//! A circle is a closed group: joining creates a pending membership that a
//! circle admin approves or declines. Member listings and messages are
//! visible to approved members only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use playcircle_core::error::CoreError;
use playcircle_core::types::DbId;
use playcircle_db::models::circle::{
    CreateCircle, ROLE_ADMIN, STATUS_APPROVED, STATUS_DECLINED,
};
use playcircle_db::models::message::CreateMessage;
use playcircle_db::repositories::{CircleRepo, MessageRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/circles
///
/// The requester's circles with their own role/status and member counts.
pub async fn list_circles(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let circles = CircleRepo::list_for_user(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse { data: circles }))
}

/// POST /api/v1/circles
pub async fn create_circle(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCircle>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let circle = CircleRepo::create(&state.pool, &input, auth.user_id).await?;

    tracing::info!(circle_id = %circle.id, user_id = %auth.user_id, "Circle created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: circle })))
}

/// GET /api/v1/circles/{id}
///
/// Visible to anyone with a membership row (pending members can see what
/// they asked to join).
pub async fn get_circle(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(circle_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let circle = CircleRepo::find_by_id(&state.pool, circle_id)
        .await?
        .ok_or_else(|| circle_not_found(circle_id))?;

    CircleRepo::membership(&state.pool, circle_id, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "Not a member of this circle".into(),
            ))
        })?;

    Ok(Json(DataResponse { data: circle }))
}

/// POST /api/v1/circles/{id}/join
///
/// Creates a pending membership. Re-joining returns the existing row
/// unchanged, whatever its status.
pub async fn join_circle(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(circle_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    CircleRepo::find_by_id(&state.pool, circle_id)
        .await?
        .ok_or_else(|| circle_not_found(circle_id))?;

    let member = CircleRepo::request_join(&state.pool, circle_id, auth.user_id).await?;

    tracing::info!(%circle_id, user_id = %auth.user_id, status = %member.status, "Join requested");

    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// GET /api/v1/circles/{id}/members
pub async fn list_members(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(circle_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_approved_member(&state, circle_id, auth.user_id).await?;

    let members = CircleRepo::list_members(&state.pool, circle_id).await?;

    Ok(Json(DataResponse { data: members }))
}

/// POST /api/v1/circles/{id}/members/{user_id}/approve
///
/// Approve a pending membership. Circle admins only.
pub async fn approve_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((circle_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    decide_membership(&state, auth, circle_id, user_id, STATUS_APPROVED).await
}

/// POST /api/v1/circles/{id}/members/{user_id}/decline
///
/// Decline a pending membership. Circle admins only.
pub async fn decline_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((circle_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    decide_membership(&state, auth, circle_id, user_id, STATUS_DECLINED).await
}

async fn decide_membership(
    state: &AppState,
    auth: AuthUser,
    circle_id: DbId,
    user_id: DbId,
    status: &str,
) -> AppResult<impl IntoResponse> {
    ensure_circle_admin(state, circle_id, auth.user_id).await?;

    let member = CircleRepo::set_member_status(&state.pool, circle_id, user_id, status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Circle member",
                id: user_id.to_string(),
            })
        })?;

    tracing::info!(%circle_id, %user_id, status, decided_by = %auth.user_id, "Membership decided");

    Ok(Json(DataResponse { data: member }))
}

/// Pagination for the message listing.
#[derive(Debug, Deserialize)]
pub struct MessageListParams {
    #[serde(default = "default_message_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_message_limit() -> i64 {
    50
}

/// GET /api/v1/circles/{id}/messages
pub async fn list_messages(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(circle_id): Path<DbId>,
    Query(params): Query<MessageListParams>,
) -> AppResult<impl IntoResponse> {
    ensure_approved_member(&state, circle_id, auth.user_id).await?;

    let limit = params.limit.clamp(1, 200);
    let offset = params.offset.max(0);
    let messages = MessageRepo::list_for_circle(&state.pool, circle_id, limit, offset).await?;

    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/v1/circles/{id}/messages
pub async fn create_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(circle_id): Path<DbId>,
    Json(input): Json<CreateMessage>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_approved_member(&state, circle_id, auth.user_id).await?;

    let message = MessageRepo::create(&state.pool, circle_id, auth.user_id, &input.body).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// Require an approved membership, 404ing on a missing circle first so the
/// two cases stay distinguishable.
pub(crate) async fn ensure_approved_member(
    state: &AppState,
    circle_id: DbId,
    user_id: DbId,
) -> AppResult<()> {
    CircleRepo::find_by_id(&state.pool, circle_id)
        .await?
        .ok_or_else(|| circle_not_found(circle_id))?;

    if !CircleRepo::is_approved_member(&state.pool, circle_id, user_id).await? {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not an approved member of this circle".into(),
        )));
    }
    Ok(())
}

/// Require an approved admin membership.
pub(crate) async fn ensure_circle_admin(
    state: &AppState,
    circle_id: DbId,
    user_id: DbId,
) -> AppResult<()> {
    CircleRepo::find_by_id(&state.pool, circle_id)
        .await?
        .ok_or_else(|| circle_not_found(circle_id))?;

    let membership = CircleRepo::membership(&state.pool, circle_id, user_id).await?;
    let is_admin = membership
        .is_some_and(|m| m.role == ROLE_ADMIN && m.status == STATUS_APPROVED);

    if !is_admin {
        return Err(AppError::Core(CoreError::Forbidden(
            "Requires circle admin".into(),
        )));
    }
    Ok(())
}

fn circle_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Circle",
        id: id.to_string(),
    })
}
