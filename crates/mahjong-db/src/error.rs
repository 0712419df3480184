//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`sqlx`] errors and names the ledger-level failures (duplicate round,
//! missing singleton row) that callers map to client responses.

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `SQLite` operation failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    /// A schema migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Stored `playersData` could not be encoded or decoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A round with this number is already stored.
    #[error("round {0} already exists")]
    DuplicateRound(i64),

    /// A singleton row (`settings` or `stats`) is missing.
    #[error("{0} row not found")]
    NotFound(&'static str),

    /// A stored value violates the schema's expectations.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The database directory could not be prepared.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
