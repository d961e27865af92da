//! Circle and membership models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use playcircle_core::types::{DbId, Timestamp};

/// Membership roles.
pub const ROLE_MEMBER: &str = "member";
pub const ROLE_ADMIN: &str = "admin";

/// Membership statuses.
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_DECLINED: &str = "declined";

/// A row from the `circles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Circle {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A circle joined with the requester's own membership and a member count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CircleWithMembership {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub member_count: i64,
    pub my_role: String,
    pub my_status: String,
}

/// A row from the `circle_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CircleMember {
    pub id: DbId,
    pub circle_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for creating a circle. The creator becomes an approved admin member.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCircle {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}
