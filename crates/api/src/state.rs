use std::sync::Arc;

use playcircle_places::PlaceLookup;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: playcircle_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// External places provider, behind a trait object so tests can
    /// substitute a mock.
    pub places: Arc<dyn PlaceLookup>,
}
