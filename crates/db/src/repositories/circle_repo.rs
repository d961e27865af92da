//! Repository for the `circles` and `circle_members` tables.

use sqlx::PgPool;

use playcircle_core::types::DbId;

use crate::models::circle::{
    Circle, CircleMember, CircleWithMembership, CreateCircle, ROLE_ADMIN, ROLE_MEMBER,
    STATUS_APPROVED, STATUS_PENDING,
};

/// Column list for `circles` queries.
const CIRCLE_COLUMNS: &str = "id, name, description, created_by, created_at, updated_at";

/// Column list for `circle_members` queries.
const MEMBER_COLUMNS: &str = "id, circle_id, user_id, role, status, created_at";

/// Provides circle and membership operations.
pub struct CircleRepo;

impl CircleRepo {
    /// List the circles the user belongs to (any membership status), with
    /// approved-member counts and the user's own role/status.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CircleWithMembership>, sqlx::Error> {
        let sql = "\
            SELECT c.id, c.name, c.description, c.created_by, c.created_at, c.updated_at, \
                   (SELECT COUNT(*) FROM circle_members a \
                    WHERE a.circle_id = c.id AND a.status = 'approved') AS member_count, \
                   m.role AS my_role, \
                   m.status AS my_status \
            FROM circles c \
            JOIN circle_members m ON m.circle_id = c.id AND m.user_id = $1 \
            ORDER BY c.created_at DESC";
        sqlx::query_as::<_, CircleWithMembership>(sql)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Create a circle; the creator becomes an approved admin member in the
    /// same transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCircle,
        created_by: DbId,
    ) -> Result<Circle, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let sql = format!(
            "INSERT INTO circles (name, description, created_by) \
             VALUES ($1, $2, $3) RETURNING {CIRCLE_COLUMNS}"
        );
        let circle = sqlx::query_as::<_, Circle>(&sql)
            .bind(&input.name)
            .bind(&input.description)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO circle_members (circle_id, user_id, role, status) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(circle.id)
        .bind(created_by)
        .bind(ROLE_ADMIN)
        .bind(STATUS_APPROVED)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(circle)
    }

    /// Find a circle by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Circle>, sqlx::Error> {
        let sql = format!("SELECT {CIRCLE_COLUMNS} FROM circles WHERE id = $1");
        sqlx::query_as::<_, Circle>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The requester's membership row in a circle, if any.
    pub async fn membership(
        pool: &PgPool,
        circle_id: DbId,
        user_id: DbId,
    ) -> Result<Option<CircleMember>, sqlx::Error> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM circle_members \
             WHERE circle_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, CircleMember>(&sql)
            .bind(circle_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether the user is an approved member of the circle.
    pub async fn is_approved_member(
        pool: &PgPool,
        circle_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let member = Self::membership(pool, circle_id, user_id).await?;
        Ok(member.is_some_and(|m| m.status == STATUS_APPROVED))
    }

    /// Request membership. Idempotent: a second request leaves the existing
    /// row untouched. Returns the (new or existing) membership row.
    pub async fn request_join(
        pool: &PgPool,
        circle_id: DbId,
        user_id: DbId,
    ) -> Result<CircleMember, sqlx::Error> {
        let sql = format!(
            "INSERT INTO circle_members (circle_id, user_id, role, status) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT ON CONSTRAINT uq_circle_members_circle_user DO NOTHING \
             RETURNING {MEMBER_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, CircleMember>(&sql)
            .bind(circle_id)
            .bind(user_id)
            .bind(ROLE_MEMBER)
            .bind(STATUS_PENDING)
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(member) => Ok(member),
            // Conflict path: return the existing row.
            None => Self::membership(pool, circle_id, user_id)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// Set a member's status (approve/decline). Returns the updated row, or
    /// `None` if no such membership exists.
    pub async fn set_member_status(
        pool: &PgPool,
        circle_id: DbId,
        user_id: DbId,
        status: &str,
    ) -> Result<Option<CircleMember>, sqlx::Error> {
        let sql = format!(
            "UPDATE circle_members SET status = $3 \
             WHERE circle_id = $1 AND user_id = $2 \
             RETURNING {MEMBER_COLUMNS}"
        );
        sqlx::query_as::<_, CircleMember>(&sql)
            .bind(circle_id)
            .bind(user_id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// List a circle's members, admins first, then by join date.
    pub async fn list_members(
        pool: &PgPool,
        circle_id: DbId,
    ) -> Result<Vec<CircleMember>, sqlx::Error> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM circle_members \
             WHERE circle_id = $1 \
             ORDER BY (role = 'admin') DESC, created_at"
        );
        sqlx::query_as::<_, CircleMember>(&sql)
            .bind(circle_id)
            .fetch_all(pool)
            .await
    }
}
