//! Repository for the super-admin oversight dashboard.

use sqlx::PgPool;

use crate::models::admin::AdminStats;

/// Provides aggregate queries for the admin dashboard.
pub struct AdminRepo;

impl AdminRepo {
    /// Platform-wide totals, computed in one round trip.
    pub async fn stats(pool: &PgPool) -> Result<AdminStats, sqlx::Error> {
        let sql = "\
            SELECT \
                (SELECT COUNT(*) FROM profiles) AS total_users, \
                (SELECT COUNT(*) FROM circles) AS total_circles, \
                (SELECT COUNT(*) FROM playdates) AS total_playdates, \
                (SELECT COUNT(*) FROM playdates \
                 WHERE status = 'scheduled' AND starts_at >= now()) AS upcoming_playdates, \
                (SELECT COUNT(*) FROM venues) AS total_venues, \
                (SELECT COUNT(*) FROM venue_reviews) AS total_reviews";
        sqlx::query_as::<_, AdminStats>(sql).fetch_one(pool).await
    }
}
