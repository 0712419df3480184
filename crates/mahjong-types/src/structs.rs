//! Persisted record types for the mahjong score ledger.
//!
//! Field names follow the camelCase projection the browser client has always
//! consumed (`roundNum`, `playersData`, `commissionRate`, ...). Monetary
//! values are plain `f64` because the client computes them in JavaScript
//! numbers and expects them back unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use validator::Validate;

use crate::enums::DetailKind;

/// Commission rate applied when no setting has been saved yet.
pub const DEFAULT_COMMISSION_RATE: f64 = 20.0;

/// Minimum score for commission to apply when no setting has been saved yet.
pub const DEFAULT_COMMISSION_THRESHOLD: f64 = 500.0;

/// Threshold recorded on a round when the client omits it.
pub const DEFAULT_ROUND_THRESHOLD: f64 = 500.0;

/// `chrono` format string of [`ExportSnapshot::export_time`].
pub const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Round
// ---------------------------------------------------------------------------

/// One recorded outcome of a game round.
///
/// `round_num` is supplied by the client and is the primary key.
/// `players_data` is stored opaquely and returned exactly as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Round {
    /// Round number, unique within the ledger.
    #[ts(type = "number")]
    pub round_num: i64,
    /// Per-player results, never interpreted by the server.
    pub players_data: serde_json::Value,
    /// House commission taken for this round.
    pub commission: f64,
    /// Commission rate in effect when the round was recorded.
    pub rate: f64,
    /// Minimum-score threshold in effect when the round was recorded.
    #[serde(default = "default_round_threshold", deserialize_with = "threshold_or_default")]
    pub threshold: f64,
    /// Human-readable time of the round.
    #[validate(length(max = 50))]
    pub time: String,
    /// Client-side sort key (epoch milliseconds).
    #[ts(type = "number")]
    pub timestamp: i64,
}

const fn default_round_threshold() -> f64 {
    DEFAULT_ROUND_THRESHOLD
}

/// An explicit `null` threshold is treated like an absent one.
fn threshold_or_default<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(DEFAULT_ROUND_THRESHOLD))
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// One stored cash-ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Detail {
    /// Store-assigned identifier, increasing with every insert.
    #[ts(type = "number")]
    pub id: i64,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: DetailKind,
    /// Free-text description.
    pub detail: String,
    /// Magnitude of the transaction.
    pub amount: f64,
    /// Human-readable time of the entry.
    pub time: String,
    /// Client-side sort key (epoch milliseconds).
    #[ts(type = "number")]
    pub timestamp: i64,
    /// Running balance computed by the client when the entry was made.
    pub balance: f64,
}

/// A cash-ledger entry as submitted by the client, before an id is assigned.
///
/// Any `id` present in the request body is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewDetail {
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: DetailKind,
    /// Free-text description.
    #[validate(length(max = 200))]
    pub detail: String,
    /// Magnitude of the transaction.
    pub amount: f64,
    /// Human-readable time of the entry.
    #[validate(length(max = 50))]
    pub time: String,
    /// Client-side sort key (epoch milliseconds).
    #[ts(type = "number")]
    pub timestamp: i64,
    /// Running balance computed by the client.
    pub balance: f64,
}

impl NewDetail {
    /// Attach the store-assigned identifier.
    pub fn with_id(self, id: i64) -> Detail {
        Detail {
            id,
            kind: self.kind,
            detail: self.detail,
            amount: self.amount,
            time: self.time,
            timestamp: self.timestamp,
            balance: self.balance,
        }
    }
}

// ---------------------------------------------------------------------------
// Singletons
// ---------------------------------------------------------------------------

/// Commission configuration. Exactly one exists after initialization.
///
/// The same shape is accepted as the body of `POST /api/settings`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Setting {
    /// Commission rate.
    pub commission_rate: f64,
    /// Minimum score for commission to apply.
    pub commission_threshold: f64,
}

impl Default for Setting {
    fn default() -> Self {
        Self {
            commission_rate: DEFAULT_COMMISSION_RATE,
            commission_threshold: DEFAULT_COMMISSION_THRESHOLD,
        }
    }
}

/// Running aggregate of collected commission. Exactly one exists after
/// initialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Stat {
    /// Sum of commissions collected.
    pub total_commission: f64,
    /// Number of recorded rounds.
    #[ts(type = "number")]
    pub round_count: i64,
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Everything the ledger holds, read in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ExportSnapshot {
    /// Every stored round, in storage order.
    pub all_rounds: Vec<Round>,
    /// `Stat::total_commission` at the time of the export.
    pub total_commission: f64,
    /// Every stored cash-ledger entry, in storage order.
    pub gold_details: Vec<Detail>,
    /// The commission configuration.
    pub commission_settings: Setting,
    /// Local time the export was generated, formatted with
    /// [`EXPORT_TIME_FORMAT`].
    pub export_time: String,
}
