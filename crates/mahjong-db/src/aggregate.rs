//! Stat maintenance for round mutations.
//!
//! Two policies keep the `stats` row in step with the `rounds` table:
//!
//! | Mutation | Policy | Effect |
//! |----------|--------|--------|
//! | single insert | [`StatUpdate::Increment`] | `total += commission`, `count += 1` |
//! | replace all | [`StatUpdate::Replace`] | recomputed from the new rounds only |
//!
//! The replace policy ignores whatever the row held before, so a partial
//! replacement shrinks the aggregate. Cash-ledger entries never feed it.

use mahjong_types::{Round, Stat};
use sqlx::SqliteConnection;

use crate::error::DbError;

/// A pending change to the `stats` singleton.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatUpdate {
    /// Add one round's commission to the running totals.
    Increment {
        /// Commission of the newly inserted round.
        commission: f64,
    },
    /// Overwrite the totals with values recomputed from a full round set.
    Replace(Stat),
}

impl StatUpdate {
    /// The incremental policy for a newly inserted round.
    pub const fn for_insert(round: &Round) -> Self {
        Self::Increment {
            commission: round.commission,
        }
    }

    /// The replace policy for a full replacement sequence.
    pub fn for_replace(rounds: &[Round]) -> Self {
        Self::Replace(recompute(rounds))
    }

    /// Apply the update to the `stats` row on the given connection.
    ///
    /// Callers run this inside the same transaction as the round mutation so
    /// the two commit or roll back together.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the `stats` row is missing, or
    /// [`DbError::Sqlite`] if the update fails.
    pub async fn apply(self, conn: &mut SqliteConnection) -> Result<(), DbError> {
        let result = match self {
            Self::Increment { commission } => {
                sqlx::query(
                    r"UPDATE stats
                      SET total_commission = total_commission + ?,
                          round_count = round_count + 1
                      WHERE id = 1",
                )
                .bind(commission)
                .execute(&mut *conn)
                .await?
            }
            Self::Replace(stat) => {
                sqlx::query(
                    r"UPDATE stats
                      SET total_commission = ?, round_count = ?
                      WHERE id = 1",
                )
                .bind(stat.total_commission)
                .bind(stat.round_count)
                .execute(&mut *conn)
                .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("stats"));
        }
        Ok(())
    }
}

/// Recompute the aggregate from a complete set of rounds.
pub fn recompute(rounds: &[Round]) -> Stat {
    Stat {
        // Folded from +0.0: `Sum for f64` starts at -0.0, which would
        // serialize an empty ledger's total as `-0.0`.
        total_commission: rounds.iter().fold(0.0, |acc, r| acc + r.commission),
        round_count: i64::try_from(rounds.len()).unwrap_or(i64::MAX),
    }
}
