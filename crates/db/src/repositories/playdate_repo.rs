//! Repository for the `playdates` and `playdate_rsvps` tables.

use sqlx::PgPool;

use playcircle_core::types::{DbId, Timestamp};

use crate::models::playdate::{
    CreatePlaydate, Playdate, PlaydateRsvp, PlaydateWithCounts, RsvpEntry, STATUS_CANCELLED,
};

/// Column list for `playdates` queries (aliased `p` for the joined listing).
const PLAYDATE_COLUMNS: &str = "\
    id, circle_id, venue_id, title, description, starts_at, ends_at, \
    capacity, status, created_by, created_at, updated_at";

/// Column list for `playdate_rsvps` queries.
const RSVP_COLUMNS: &str =
    "id, playdate_id, user_id, child_id, status, created_at, updated_at";

/// Provides playdate scheduling and RSVP operations.
pub struct PlaydateRepo;

impl PlaydateRepo {
    /// Upcoming playdates visible to the user: scheduled, starting at or
    /// after `from`, in circles where the user is an approved member.
    /// Optionally restricted to one circle.
    pub async fn list_upcoming(
        pool: &PgPool,
        user_id: DbId,
        circle_id: Option<DbId>,
        from: Option<Timestamp>,
    ) -> Result<Vec<PlaydateWithCounts>, sqlx::Error> {
        let from = from.unwrap_or_else(chrono::Utc::now);

        let sql = "\
            SELECT p.id, p.circle_id, p.venue_id, p.title, p.description, \
                   p.starts_at, p.ends_at, p.capacity, p.status, p.created_by, \
                   p.created_at, p.updated_at, \
                   (SELECT COUNT(*) FROM playdate_rsvps r \
                    WHERE r.playdate_id = p.id AND r.status = 'going') AS going_count, \
                   (SELECT COUNT(*) FROM playdate_rsvps r \
                    WHERE r.playdate_id = p.id AND r.status = 'maybe') AS maybe_count \
            FROM playdates p \
            JOIN circle_members m \
              ON m.circle_id = p.circle_id AND m.user_id = $1 AND m.status = 'approved' \
            WHERE p.status = 'scheduled' \
              AND p.starts_at >= $2 \
              AND ($3::uuid IS NULL OR p.circle_id = $3) \
            ORDER BY p.starts_at";

        sqlx::query_as::<_, PlaydateWithCounts>(sql)
            .bind(user_id)
            .bind(from)
            .bind(circle_id)
            .fetch_all(pool)
            .await
    }

    /// Schedule a playdate.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePlaydate,
        created_by: DbId,
    ) -> Result<Playdate, sqlx::Error> {
        let sql = format!(
            "INSERT INTO playdates \
                 (circle_id, venue_id, title, description, starts_at, ends_at, capacity, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {PLAYDATE_COLUMNS}"
        );
        sqlx::query_as::<_, Playdate>(&sql)
            .bind(input.circle_id)
            .bind(input.venue_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.capacity)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a playdate by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Playdate>, sqlx::Error> {
        let sql = format!("SELECT {PLAYDATE_COLUMNS} FROM playdates WHERE id = $1");
        sqlx::query_as::<_, Playdate>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Mark a playdate cancelled. Returns the updated row.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<Option<Playdate>, sqlx::Error> {
        let sql = format!(
            "UPDATE playdates SET status = $2, updated_at = now() \
             WHERE id = $1 RETURNING {PLAYDATE_COLUMNS}"
        );
        sqlx::query_as::<_, Playdate>(&sql)
            .bind(id)
            .bind(STATUS_CANCELLED)
            .fetch_optional(pool)
            .await
    }

    /// Count of children currently RSVPed "going".
    pub async fn going_count(pool: &PgPool, playdate_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM playdate_rsvps WHERE playdate_id = $1 AND status = 'going'",
        )
        .bind(playdate_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Upsert one RSVP row per child in a single transaction. A repeated
    /// RSVP for the same child overwrites the previous status.
    pub async fn upsert_rsvps(
        pool: &PgPool,
        playdate_id: DbId,
        user_id: DbId,
        entries: &[RsvpEntry],
    ) -> Result<Vec<PlaydateRsvp>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut rows = Vec::with_capacity(entries.len());

        let sql = format!(
            "INSERT INTO playdate_rsvps (playdate_id, user_id, child_id, status) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT ON CONSTRAINT uq_playdate_rsvps_playdate_child \
             DO UPDATE SET status = EXCLUDED.status, updated_at = now() \
             RETURNING {RSVP_COLUMNS}"
        );
        for entry in entries {
            let row = sqlx::query_as::<_, PlaydateRsvp>(&sql)
                .bind(playdate_id)
                .bind(user_id)
                .bind(entry.child_id)
                .bind(&entry.status)
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }

        tx.commit().await?;
        Ok(rows)
    }

    /// List RSVPs for a playdate.
    pub async fn list_rsvps(
        pool: &PgPool,
        playdate_id: DbId,
    ) -> Result<Vec<PlaydateRsvp>, sqlx::Error> {
        let sql = format!(
            "SELECT {RSVP_COLUMNS} FROM playdate_rsvps \
             WHERE playdate_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, PlaydateRsvp>(&sql)
            .bind(playdate_id)
            .fetch_all(pool)
            .await
    }
}
