//! Persistence for the running commission aggregate.
//!
//! Round mutations move this row through [`crate::aggregate::StatUpdate`];
//! this store covers the direct reads and the manual total override.

use mahjong_types::Stat;
use sqlx::{SqliteConnection, SqlitePool};

use crate::aggregate::StatUpdate;
use crate::error::DbError;

/// Operations on the `stats` table (one row, `id = 1`).
pub struct StatStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StatStore<'a> {
    /// Create a new stat store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Read the aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the row was never seeded.
    pub async fn get(&self) -> Result<Stat, DbError> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn).await
    }

    /// Set the collected commission to an absolute value, leaving the round
    /// count alone, and return the stored result.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the row was never seeded.
    pub async fn update_total(&self, total_commission: f64) -> Result<Stat, DbError> {
        let mut conn = self.pool.acquire().await?;

        let result = sqlx::query("UPDATE stats SET total_commission = ? WHERE id = 1")
            .bind(total_commission)
            .execute(&mut *conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("stats"));
        }

        tracing::info!(total_commission, "Overrode stat total");
        fetch(&mut conn).await
    }
}

/// Read the singleton on an existing connection or transaction.
pub(crate) async fn fetch(conn: &mut SqliteConnection) -> Result<Stat, DbError> {
    let row = sqlx::query_as::<_, StatRow>(
        r"SELECT total_commission, round_count
          FROM stats
          WHERE id = 1",
    )
    .fetch_optional(&mut *conn)
    .await?;

    row.map(Stat::from).ok_or(DbError::NotFound("stats"))
}

/// Reset the singleton to its defaults on an existing transaction.
pub(crate) async fn reset(conn: &mut SqliteConnection) -> Result<(), DbError> {
    StatUpdate::Replace(Stat::default()).apply(conn).await
}

/// A row from the `stats` table.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct StatRow {
    /// Sum of commissions collected.
    pub total_commission: f64,
    /// Number of recorded rounds.
    pub round_count: i64,
}

impl From<StatRow> for Stat {
    fn from(row: StatRow) -> Self {
        Self {
            total_commission: row.total_commission,
            round_count: row.round_count,
        }
    }
}
