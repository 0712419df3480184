//! Shared application state for the ledger API.

use mahjong_db::DbPool;

/// Shared state for the Axum application.
///
/// Wrapped in [`std::sync::Arc`] and injected via Axum's `State` extractor.
/// The state holds no ledger data of its own: every request reads and
/// writes through the database pool.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection pool to the ledger database.
    pub db: DbPool,
    /// Whether cross-origin requests from any origin are allowed.
    pub cors_any_origin: bool,
}

impl AppState {
    /// Create application state over an initialized database, with
    /// permissive CORS.
    pub const fn new(db: DbPool) -> Self {
        Self {
            db,
            cors_any_origin: true,
        }
    }

    /// Set whether cross-origin requests are allowed.
    #[must_use]
    pub const fn with_cors_any_origin(mut self, enabled: bool) -> Self {
        self.cors_any_origin = enabled;
        self
    }
}
