//! Repository for the `profiles` table.

use sqlx::PgPool;

use playcircle_core::types::DbId;

use crate::models::profile::Profile;

/// Column list for `profiles` queries.
const PROFILE_COLUMNS: &str =
    "id, display_name, avatar_url, is_admin, created_at, updated_at";

/// Provides profile lookups. Profile creation is driven by the auth
/// provider's webhook pipeline, outside this service.
pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether the user holds the super-admin flag.
    pub async fn is_admin(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (is_admin,): (bool,) = sqlx::query_as(
            "SELECT COALESCE((SELECT is_admin FROM profiles WHERE id = $1), FALSE)",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(is_admin)
    }
}
