use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use playcircle_core::types::{DbId, Timestamp};

/// A row from the `children` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Child {
    pub id: DbId,
    pub parent_id: DbId,
    pub name: String,
    pub birth_year: i16,
    pub created_at: Timestamp,
}

/// DTO for registering a child under the requesting parent.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChild {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 1990, max = 2100))]
    pub birth_year: i16,
}
