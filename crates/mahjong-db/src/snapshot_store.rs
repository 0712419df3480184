//! Whole-ledger operations: the export snapshot and the clear reset.
//!
//! Both span all four tables and run inside one transaction, so an export
//! never mixes states from before and after a concurrent write, and a clear
//! is either fully visible or not at all.

use chrono::{DateTime, Local};
use mahjong_types::{EXPORT_TIME_FORMAT, ExportSnapshot, Setting};
use sqlx::SqlitePool;

use crate::error::DbError;
use crate::{detail_store, round_store, settings_store, stat_store};

/// Operations spanning every ledger table.
pub struct SnapshotStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SnapshotStore<'a> {
    /// Create a new snapshot store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Read all four collections in one pass, stamping the snapshot with
    /// `now`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any read fails or a singleton row is missing.
    pub async fn export(&self, now: DateTime<Local>) -> Result<ExportSnapshot, DbError> {
        let mut tx = self.pool.begin().await?;

        let all_rounds = round_store::fetch_all(&mut tx).await?;
        let gold_details = detail_store::fetch_all(&mut tx).await?;
        let commission_settings = settings_store::fetch(&mut tx).await?;
        let stat = stat_store::fetch(&mut tx).await?;

        tx.commit().await?;

        tracing::debug!(
            rounds = all_rounds.len(),
            details = gold_details.len(),
            "Exported ledger snapshot"
        );

        Ok(ExportSnapshot {
            all_rounds,
            total_commission: stat.total_commission,
            gold_details,
            commission_settings,
            export_time: now.format(EXPORT_TIME_FORMAT).to_string(),
        })
    }

    /// Delete every round and entry and reset the singletons to their
    /// defaults as one atomic unit.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any statement fails; nothing is changed then.
    pub async fn clear_all(&self) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let rounds = sqlx::query("DELETE FROM rounds")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let details = sqlx::query("DELETE FROM details")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        settings_store::write(&mut tx, Setting::default()).await?;
        stat_store::reset(&mut tx).await?;

        tx.commit().await?;

        tracing::info!(rounds, details, "Cleared ledger");
        Ok(())
    }
}
