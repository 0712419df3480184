//! Persistence for cash-ledger entries.
//!
//! Entries are independent of the commission stats: nothing here touches
//! the `stats` row. The `balance` column is stored exactly as the client
//! computed it.

use mahjong_types::{Detail, DetailKind, NewDetail};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::DbError;

/// Operations on the `details` table.
pub struct DetailStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DetailStore<'a> {
    /// Create a new detail store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Return every stored entry in id order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn list(&self) -> Result<Vec<Detail>, DbError> {
        let mut conn = self.pool.acquire().await?;
        fetch_all(&mut conn).await
    }

    /// Insert one entry and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the insert fails.
    pub async fn insert(&self, detail: NewDetail) -> Result<Detail, DbError> {
        let mut conn = self.pool.acquire().await?;
        let id = insert_row(&mut conn, &detail).await?;

        tracing::info!(id, kind = %detail.kind, amount = detail.amount, "Inserted detail");
        Ok(detail.with_id(id))
    }

    /// Atomically replace every stored entry with `details`.
    ///
    /// New ids are assigned; ids supplied by the client are not reused.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if any statement fails, in which case the
    /// previous entries are kept.
    pub async fn replace_all(&self, details: &[NewDetail]) -> Result<usize, DbError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM details")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        for detail in details {
            insert_row(&mut tx, detail).await?;
        }

        tx.commit().await?;

        tracing::info!(deleted, inserted = details.len(), "Replaced all details");
        Ok(details.len())
    }
}

/// Read every entry on an existing connection or transaction.
pub(crate) async fn fetch_all(conn: &mut SqliteConnection) -> Result<Vec<Detail>, DbError> {
    let rows = sqlx::query_as::<_, DetailRow>(
        r"SELECT id, type AS kind, detail, amount, time, timestamp, balance
          FROM details
          ORDER BY id",
    )
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(Detail::try_from).collect()
}

async fn insert_row(conn: &mut SqliteConnection, detail: &NewDetail) -> Result<i64, DbError> {
    let result = sqlx::query(
        r"INSERT INTO details (type, detail, amount, time, timestamp, balance)
          VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(detail.kind.as_str())
    .bind(&detail.detail)
    .bind(detail.amount)
    .bind(&detail.time)
    .bind(detail.timestamp)
    .bind(detail.balance)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// A row from the `details` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DetailRow {
    /// Entry id.
    pub id: i64,
    /// `income` or `expense`.
    pub kind: String,
    /// Description.
    pub detail: String,
    /// Transaction magnitude.
    pub amount: f64,
    /// Human-readable time.
    pub time: String,
    /// Client sort key.
    pub timestamp: i64,
    /// Client-computed running balance.
    pub balance: f64,
}

impl TryFrom<DetailRow> for Detail {
    type Error = DbError;

    fn try_from(row: DetailRow) -> Result<Self, Self::Error> {
        let kind: DetailKind = row
            .kind
            .parse()
            .map_err(|e| DbError::Corrupt(format!("details.id={}: {e}", row.id)))?;

        Ok(Self {
            id: row.id,
            kind,
            detail: row.detail,
            amount: row.amount,
            time: row.time,
            timestamp: row.timestamp,
            balance: row.balance,
        })
    }
}
