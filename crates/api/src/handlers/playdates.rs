//! Handlers for playdate scheduling, RSVPs, and cancellation.
//!
//! Playdates belong to a circle; only approved members see or touch them.
//! RSVPs are per child, and a parent can only answer for their own
//! children.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use validator::Validate;

use playcircle_core::error::CoreError;
use playcircle_core::types::DbId;
use playcircle_db::models::circle::ROLE_ADMIN;
use playcircle_db::models::playdate::{
    CreatePlaydate, CreateRsvp, Playdate, PlaydateListParams, PlaydateRsvp, RSVP_GOING,
    RSVP_STATUSES, STATUS_SCHEDULED,
};
use playcircle_db::repositories::{ChildRepo, CircleRepo, PlaydateRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::circles::ensure_approved_member;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/playdates
///
/// Upcoming playdates across the requester's approved circles, optionally
/// narrowed to one circle.
pub async fn list_playdates(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PlaydateListParams>,
) -> AppResult<impl IntoResponse> {
    let playdates =
        PlaydateRepo::list_upcoming(&state.pool, auth.user_id, params.circle_id, params.from)
            .await?;

    Ok(Json(DataResponse { data: playdates }))
}

/// POST /api/v1/playdates
pub async fn create_playdate(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePlaydate>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    if input.ends_at <= input.starts_at {
        return Err(AppError::BadRequest(
            "ends_at must be after starts_at".into(),
        ));
    }

    ensure_approved_member(&state, input.circle_id, auth.user_id).await?;

    let playdate = PlaydateRepo::create(&state.pool, &input, auth.user_id).await?;

    tracing::info!(
        playdate_id = %playdate.id,
        circle_id = %playdate.circle_id,
        user_id = %auth.user_id,
        "Playdate created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: playdate })))
}

/// Details payload: the playdate plus its full RSVP list.
#[derive(Debug, Serialize)]
pub struct PlaydateDetail {
    #[serde(flatten)]
    pub playdate: Playdate,
    pub rsvps: Vec<PlaydateRsvp>,
}

/// GET /api/v1/playdates/{id}
pub async fn get_playdate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(playdate_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let playdate = find_playdate(&state, playdate_id).await?;
    ensure_approved_member(&state, playdate.circle_id, auth.user_id).await?;

    let rsvps = PlaydateRepo::list_rsvps(&state.pool, playdate_id).await?;

    Ok(Json(DataResponse {
        data: PlaydateDetail { playdate, rsvps },
    }))
}

/// POST /api/v1/playdates/{id}/rsvp
///
/// Upserts one RSVP row per child: answering again overwrites the previous
/// status.
pub async fn rsvp(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(playdate_id): Path<DbId>,
    Json(input): Json<CreateRsvp>,
) -> AppResult<impl IntoResponse> {
    if input.entries.is_empty() {
        return Err(AppError::BadRequest("At least one RSVP entry required".into()));
    }

    for entry in &input.entries {
        if !RSVP_STATUSES.contains(&entry.status.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Invalid RSVP status '{}'",
                entry.status
            )));
        }
    }

    let playdate = find_playdate(&state, playdate_id).await?;
    if playdate.status != STATUS_SCHEDULED {
        return Err(AppError::Core(CoreError::Conflict(
            "Playdate is cancelled".into(),
        )));
    }

    ensure_approved_member(&state, playdate.circle_id, auth.user_id).await?;

    for entry in &input.entries {
        if !ChildRepo::belongs_to(&state.pool, entry.child_id, auth.user_id).await? {
            return Err(AppError::Core(CoreError::Forbidden(
                "Can only RSVP for your own children".into(),
            )));
        }
    }

    if let Some(capacity) = playdate.capacity {
        let going = PlaydateRepo::going_count(&state.pool, playdate_id).await?;
        if exceeds_capacity(capacity, going, &input.entries) {
            return Err(AppError::Core(CoreError::Conflict(
                "Playdate is at capacity".into(),
            )));
        }
    }

    let rsvps = PlaydateRepo::upsert_rsvps(&state.pool, playdate_id, auth.user_id, &input.entries)
        .await?;

    tracing::info!(%playdate_id, user_id = %auth.user_id, entries = rsvps.len(), "RSVP recorded");

    Ok(Json(DataResponse { data: rsvps }))
}

/// POST /api/v1/playdates/{id}/cancel
///
/// The creator or a circle admin may cancel. Cancelling twice conflicts.
pub async fn cancel_playdate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(playdate_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let playdate = find_playdate(&state, playdate_id).await?;

    if playdate.status != STATUS_SCHEDULED {
        return Err(AppError::Core(CoreError::Conflict(
            "Playdate is already cancelled".into(),
        )));
    }

    if playdate.created_by != auth.user_id {
        // Fall back to circle-admin privilege.
        let membership =
            CircleRepo::membership(&state.pool, playdate.circle_id, auth.user_id).await?;
        let is_admin = membership.is_some_and(|m| m.role == ROLE_ADMIN);
        if !is_admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only the creator or a circle admin can cancel".into(),
            )));
        }
    }

    let cancelled = PlaydateRepo::cancel(&state.pool, playdate_id)
        .await?
        .ok_or_else(|| playdate_not_found(playdate_id))?;

    tracing::info!(%playdate_id, user_id = %auth.user_id, "Playdate cancelled");

    Ok(Json(DataResponse { data: cancelled }))
}

/// Whether adding this batch's `going` entries would overfill the playdate.
///
/// Counts only new `going` answers; downgrades (going -> maybe/not_going)
/// free a slot on the next check rather than immediately.
fn exceeds_capacity(
    capacity: i32,
    current_going: i64,
    entries: &[playcircle_db::models::playdate::RsvpEntry],
) -> bool {
    let new_going = entries.iter().filter(|e| e.status == RSVP_GOING).count() as i64;
    current_going + new_going > i64::from(capacity)
}

async fn find_playdate(state: &AppState, id: DbId) -> AppResult<Playdate> {
    PlaydateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| playdate_not_found(id))
}

fn playdate_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Playdate",
        id: id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use playcircle_db::models::playdate::{RsvpEntry, RSVP_GOING, RSVP_MAYBE, RSVP_NOT_GOING};
    use uuid::Uuid;

    use super::exceeds_capacity;

    fn entry(status: &str) -> RsvpEntry {
        RsvpEntry {
            child_id: Uuid::new_v4(),
            status: status.to_string(),
        }
    }

    #[test]
    fn capacity_allows_filling_to_the_brim() {
        let entries = vec![entry(RSVP_GOING), entry(RSVP_GOING)];
        assert!(!exceeds_capacity(5, 3, &entries));
    }

    #[test]
    fn capacity_rejects_overflow() {
        let entries = vec![entry(RSVP_GOING), entry(RSVP_GOING)];
        assert!(exceeds_capacity(4, 3, &entries));
    }

    #[test]
    fn non_going_entries_do_not_consume_slots() {
        let entries = vec![entry(RSVP_MAYBE), entry(RSVP_NOT_GOING)];
        assert!(!exceeds_capacity(3, 3, &entries));
    }
}
