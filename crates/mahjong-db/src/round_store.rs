//! Persistence for recorded game rounds.
//!
//! Every round mutation also moves the `stats` singleton (see
//! [`crate::aggregate`]); both writes share one transaction so a failed
//! insert never leaves a half-counted round behind.

use mahjong_types::Round;
use sqlx::{SqliteConnection, SqlitePool};

use crate::aggregate::StatUpdate;
use crate::error::DbError;

/// Operations on the `rounds` table.
pub struct RoundStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RoundStore<'a> {
    /// Create a new round store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Return every stored round in storage (`round_num`) order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails, or
    /// [`DbError::Serialization`] if a stored `playersData` is not JSON.
    pub async fn list(&self) -> Result<Vec<Round>, DbError> {
        let mut conn = self.pool.acquire().await?;
        fetch_all(&mut conn).await
    }

    /// Insert a single round and count it into the stats.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DuplicateRound`] if `round_num` is already stored;
    /// neither the rounds nor the stats change in that case.
    pub async fn insert(&self, round: &Round) -> Result<Round, DbError> {
        let mut tx = self.pool.begin().await?;

        insert_row(&mut tx, round).await?;
        StatUpdate::for_insert(round).apply(&mut tx).await?;

        tx.commit().await?;

        tracing::info!(
            round_num = round.round_num,
            commission = round.commission,
            "Inserted round"
        );
        Ok(round.clone())
    }

    /// Atomically replace every stored round with `rounds` and recompute the
    /// stats from them.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DuplicateRound`] if `rounds` repeats a round number.
    /// The previous rounds and stats are kept on any error.
    pub async fn replace_all(&self, rounds: &[Round]) -> Result<usize, DbError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM rounds")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        for round in rounds {
            insert_row(&mut tx, round).await?;
        }
        StatUpdate::for_replace(rounds).apply(&mut tx).await?;

        tx.commit().await?;

        tracing::info!(deleted, inserted = rounds.len(), "Replaced all rounds");
        Ok(rounds.len())
    }
}

/// Read every round on an existing connection or transaction.
pub(crate) async fn fetch_all(conn: &mut SqliteConnection) -> Result<Vec<Round>, DbError> {
    let rows = sqlx::query_as::<_, RoundRow>(
        r"SELECT round_num, players_data, commission, rate, threshold, time, timestamp
          FROM rounds
          ORDER BY round_num",
    )
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(Round::try_from).collect()
}

async fn insert_row(conn: &mut SqliteConnection, round: &Round) -> Result<(), DbError> {
    let players_data = serde_json::to_string(&round.players_data)?;

    let result = sqlx::query(
        r"INSERT INTO rounds (round_num, players_data, commission, rate, threshold, time, timestamp)
          VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(round.round_num)
    .bind(players_data)
    .bind(round.commission)
    .bind(round.rate)
    .bind(round.threshold)
    .bind(&round.time)
    .bind(round.timestamp)
    .execute(&mut *conn)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(DbError::DuplicateRound(round.round_num))
        }
        Err(e) => Err(e.into()),
    }
}

/// A row from the `rounds` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoundRow {
    /// Round number (primary key).
    pub round_num: i64,
    /// `playersData` serialized as JSON text.
    pub players_data: String,
    /// Commission taken.
    pub commission: f64,
    /// Commission rate applied.
    pub rate: f64,
    /// Minimum-score threshold.
    pub threshold: f64,
    /// Human-readable time.
    pub time: String,
    /// Client sort key.
    pub timestamp: i64,
}

impl TryFrom<RoundRow> for Round {
    type Error = DbError;

    fn try_from(row: RoundRow) -> Result<Self, Self::Error> {
        Ok(Self {
            round_num: row.round_num,
            players_data: serde_json::from_str(&row.players_data)?,
            commission: row.commission,
            rate: row.rate,
            threshold: row.threshold,
            time: row.time,
            timestamp: row.timestamp,
        })
    }
}
