//! Persistence for the commission configuration singleton.

use mahjong_types::Setting;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::DbError;

/// Operations on the `settings` table (one row, `id = 1`).
pub struct SettingsStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SettingsStore<'a> {
    /// Create a new settings store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Read the commission configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the row was never seeded.
    pub async fn get(&self) -> Result<Setting, DbError> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn).await
    }

    /// Overwrite both fields in place and return the stored result.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the row was never seeded.
    pub async fn update(&self, setting: Setting) -> Result<Setting, DbError> {
        let mut conn = self.pool.acquire().await?;
        write(&mut conn, setting).await?;

        tracing::info!(
            commission_rate = setting.commission_rate,
            commission_threshold = setting.commission_threshold,
            "Updated settings"
        );
        fetch(&mut conn).await
    }
}

/// Read the singleton on an existing connection or transaction.
pub(crate) async fn fetch(conn: &mut SqliteConnection) -> Result<Setting, DbError> {
    let row = sqlx::query_as::<_, SettingRow>(
        r"SELECT commission_rate, commission_threshold
          FROM settings
          WHERE id = 1",
    )
    .fetch_optional(&mut *conn)
    .await?;

    row.map(Setting::from).ok_or(DbError::NotFound("settings"))
}

/// Overwrite the singleton on an existing connection or transaction.
pub(crate) async fn write(conn: &mut SqliteConnection, setting: Setting) -> Result<(), DbError> {
    let result = sqlx::query(
        r"UPDATE settings
          SET commission_rate = ?, commission_threshold = ?
          WHERE id = 1",
    )
    .bind(setting.commission_rate)
    .bind(setting.commission_threshold)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound("settings"));
    }
    Ok(())
}

/// A row from the `settings` table.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct SettingRow {
    /// Commission rate.
    pub commission_rate: f64,
    /// Minimum score for commission to apply.
    pub commission_threshold: f64,
}

impl From<SettingRow> for Setting {
    fn from(row: SettingRow) -> Self {
        Self {
            commission_rate: row.commission_rate,
            commission_threshold: row.commission_threshold,
        }
    }
}
