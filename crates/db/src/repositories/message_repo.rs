//! Repository for the `messages` table.

use sqlx::PgPool;

use playcircle_core::types::DbId;

use crate::models::message::Message;

/// Provides circle message operations.
pub struct MessageRepo;

impl MessageRepo {
    /// List a circle's messages, newest first.
    pub async fn list_for_circle(
        pool: &PgPool,
        circle_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let sql = "\
            SELECT m.id, m.circle_id, m.user_id, p.display_name, m.body, m.created_at \
            FROM messages m \
            JOIN profiles p ON p.id = m.user_id \
            WHERE m.circle_id = $1 \
            ORDER BY m.created_at DESC \
            LIMIT $2 OFFSET $3";
        sqlx::query_as::<_, Message>(sql)
            .bind(circle_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Post a message to a circle.
    pub async fn create(
        pool: &PgPool,
        circle_id: DbId,
        user_id: DbId,
        body: &str,
    ) -> Result<Message, sqlx::Error> {
        let sql = "\
            WITH inserted AS ( \
                INSERT INTO messages (circle_id, user_id, body) \
                VALUES ($1, $2, $3) \
                RETURNING id, circle_id, user_id, body, created_at \
            ) \
            SELECT i.id, i.circle_id, i.user_id, p.display_name, i.body, i.created_at \
            FROM inserted i \
            JOIN profiles p ON p.id = i.user_id";
        sqlx::query_as::<_, Message>(sql)
            .bind(circle_id)
            .bind(user_id)
            .bind(body)
            .fetch_one(pool)
            .await
    }
}
