//! Enumeration types for the mahjong score ledger.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Direction of a cash-ledger entry.
///
/// Serialized as the lowercase strings `"income"` and `"expense"`, which is
/// also how the kind is stored in the `details` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum DetailKind {
    /// Money paid into the pot.
    Income,
    /// Money paid out of the pot.
    Expense,
}

impl DetailKind {
    /// The database and wire representation of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl core::fmt::Display for DetailKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored or submitted kind is neither `income` nor `expense`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown detail type: {0}")]
pub struct ParseDetailKindError(pub String);

impl FromStr for DetailKind {
    type Err = ParseDetailKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(ParseDetailKindError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [DetailKind::Income, DetailKind::Expense] {
            assert_eq!(kind.as_str().parse::<DetailKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "refund".parse::<DetailKind>();
        assert_eq!(err, Err(ParseDetailKindError("refund".to_owned())));
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&DetailKind::Expense).ok();
        assert_eq!(json.as_deref(), Some("\"expense\""));
    }
}
