use serde::Serialize;
use sqlx::FromRow;

/// Aggregate counts for the super-admin oversight dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_circles: i64,
    pub total_playdates: i64,
    pub upcoming_playdates: i64,
    pub total_venues: i64,
    pub total_reviews: i64,
}
