use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use playcircle_core::types::{DbId, Timestamp};

/// A row from the `messages` table, joined with the sender's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub circle_id: DbId,
    pub user_id: DbId,
    pub display_name: String,
    pub body: String,
    pub created_at: Timestamp,
}

/// DTO for posting a message to a circle.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMessage {
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}
