//! `SQLite` connection pool and initialization.
//!
//! The ledger lives in a single embedded `SQLite` file. Uses [`sqlx`] with
//! runtime query construction (not compile-time checked) so the crate builds
//! without a database present. All queries are parameterized.

use std::str::FromStr;
use std::time::Duration;

use mahjong_types::{Setting, Stat};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::DbError;

/// Default maximum number of connections in the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default connection timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// URL of a private in-memory database.
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Configuration for the `SQLite` connection pool.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// `SQLite` connection URL.
    ///
    /// Format: `sqlite://path/to/file.db` or `sqlite::memory:`
    pub url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl DbConfig {
    /// Create a new configuration from a database URL.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Configuration for a private in-memory database.
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_URL)
    }

    /// Set the maximum number of connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Whether the URL names an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Connection pool handle to the ledger database.
///
/// Wraps a [`sqlx::SqlitePool`]; the record stores borrow the inner pool.
#[derive(Debug, Clone)]
pub struct DbPool {
    pool: SqlitePool,
}

impl DbPool {
    /// Connect to `SQLite` using the provided configuration.
    ///
    /// The database file and its parent directory are created when missing.
    /// An in-memory database is pinned to one connection that is never
    /// recycled, since every new connection would otherwise see an empty
    /// database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the URL cannot be parsed,
    /// [`DbError::Io`] if the parent directory cannot be created, or
    /// [`DbError::Sqlite`] if the connection fails.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let connect_options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DbError::Config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = config.is_in_memory();

        let connect_options = if in_memory {
            connect_options
        } else {
            if let Some(parent) = connect_options.get_filename().parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await?;
            }
            connect_options.journal_mode(SqliteJournalMode::Wal)
        };

        let max_connections = if in_memory { 1 } else { config.max_connections };
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(max_connections)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options)
            .await?;

        tracing::info!(
            url = %config.url,
            max_connections,
            "Connected to SQLite"
        );

        Ok(Self { pool })
    }

    /// Connect, migrate and seed the singleton rows in one step.
    ///
    /// This is the normal startup path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any of the three steps fails.
    pub async fn open(config: &DbConfig) -> Result<Self, DbError> {
        let db = Self::connect(config).await?;
        db.run_migrations().await?;
        db.ensure_defaults().await?;
        Ok(db)
    }

    /// Run all pending migrations from the `migrations/` directory.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Migration`] if any migration fails.
    pub async fn run_migrations(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Create the `settings` and `stats` singleton rows with their defaults
    /// if they do not exist yet. Existing rows are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if an insert fails.
    pub async fn ensure_defaults(&self) -> Result<(), DbError> {
        let setting = Setting::default();
        let stat = Stat::default();

        let mut tx = self.pool.begin().await?;

        let settings_created = sqlx::query(
            r"INSERT OR IGNORE INTO settings (id, commission_rate, commission_threshold)
              VALUES (1, ?, ?)",
        )
        .bind(setting.commission_rate)
        .bind(setting.commission_threshold)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let stats_created = sqlx::query(
            r"INSERT OR IGNORE INTO stats (id, total_commission, round_count)
              VALUES (1, ?, ?)",
        )
        .bind(stat.total_commission)
        .bind(stat.round_count)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        if settings_created > 0 || stats_created > 0 {
            tracing::info!(settings_created, stats_created, "Seeded singleton rows");
        }
        Ok(())
    }

    /// Return a reference to the underlying [`SqlitePool`].
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections in the pool gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("SQLite pool closed");
    }
}
