//! Repository for the `children` table.

use sqlx::PgPool;

use playcircle_core::types::DbId;

use crate::models::child::{Child, CreateChild};

/// Column list for `children` queries.
const CHILD_COLUMNS: &str = "id, parent_id, name, birth_year, created_at";

/// Provides child CRUD, always scoped to the owning parent.
pub struct ChildRepo;

impl ChildRepo {
    pub async fn list_for_parent(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<Child>, sqlx::Error> {
        let sql = format!(
            "SELECT {CHILD_COLUMNS} FROM children WHERE parent_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, Child>(&sql)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        parent_id: DbId,
        input: &CreateChild,
    ) -> Result<Child, sqlx::Error> {
        let sql = format!(
            "INSERT INTO children (parent_id, name, birth_year) \
             VALUES ($1, $2, $3) RETURNING {CHILD_COLUMNS}"
        );
        sqlx::query_as::<_, Child>(&sql)
            .bind(parent_id)
            .bind(&input.name)
            .bind(input.birth_year)
            .fetch_one(pool)
            .await
    }

    /// Whether the child belongs to the given parent.
    pub async fn belongs_to(
        pool: &PgPool,
        child_id: DbId,
        parent_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM children WHERE id = $1 AND parent_id = $2)",
        )
        .bind(child_id)
        .bind(parent_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Delete a child owned by the parent. Returns whether a row was deleted.
    pub async fn delete(
        pool: &PgPool,
        child_id: DbId,
        parent_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM children WHERE id = $1 AND parent_id = $2")
            .bind(child_id)
            .bind(parent_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
