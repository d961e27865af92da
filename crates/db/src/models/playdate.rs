//! Playdate and RSVP models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use playcircle_core::types::{DbId, Timestamp};

/// Playdate statuses.
pub const STATUS_SCHEDULED: &str = "scheduled";
pub const STATUS_CANCELLED: &str = "cancelled";

/// RSVP statuses.
pub const RSVP_GOING: &str = "going";
pub const RSVP_NOT_GOING: &str = "not_going";
pub const RSVP_MAYBE: &str = "maybe";

/// All RSVP statuses a client may submit.
pub const RSVP_STATUSES: [&str; 3] = [RSVP_GOING, RSVP_NOT_GOING, RSVP_MAYBE];

/// A row from the `playdates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Playdate {
    pub id: DbId,
    pub circle_id: DbId,
    pub venue_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub capacity: Option<i32>,
    pub status: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A playdate joined with its RSVP tallies, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlaydateWithCounts {
    pub id: DbId,
    pub circle_id: DbId,
    pub venue_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub capacity: Option<i32>,
    pub status: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub going_count: i64,
    pub maybe_count: i64,
}

/// A row from the `playdate_rsvps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlaydateRsvp {
    pub id: DbId,
    pub playdate_id: DbId,
    pub user_id: DbId,
    pub child_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for scheduling a playdate.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlaydate {
    pub circle_id: DbId,
    pub venue_id: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
}

/// One per-child RSVP entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RsvpEntry {
    pub child_id: DbId,
    pub status: String,
}

/// RSVP request body: one entry per child attending (or not).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRsvp {
    pub entries: Vec<RsvpEntry>,
}

/// Query parameters for listing playdates.
#[derive(Debug, Deserialize)]
pub struct PlaydateListParams {
    pub circle_id: Option<DbId>,
    /// Lower bound on `starts_at`; defaults to "now" in the repository.
    pub from: Option<Timestamp>,
}
