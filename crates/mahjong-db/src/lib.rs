//! `SQLite` data layer for the mahjong score ledger.
//!
//! Four tables back the ledger: `rounds`, `details`, and the `settings` and
//! `stats` singletons. Each table has a small store type that borrows the
//! connection pool; every mutation commits before it returns.
//!
//! # Architecture
//!
//! ```text
//! Request handler
//!     |
//!     +-- RoundStore     (rounds)   --+-- StatUpdate --> stats
//!     +-- DetailStore    (details)
//!     +-- SettingsStore  (settings)
//!     +-- StatStore      (stats)
//!     +-- SnapshotStore  (all four: export / clear)
//! ```
//!
//! # Modules
//!
//! - [`sqlite`] -- Pool configuration, migrations, singleton seeding
//! - [`aggregate`] -- Incremental and replace policies for the stats row
//! - [`round_store`] -- Round listing, insertion and bulk replacement
//! - [`detail_store`] -- Cash-ledger listing, insertion and bulk replacement
//! - [`settings_store`] -- Commission configuration
//! - [`stat_store`] -- Commission aggregate
//! - [`snapshot_store`] -- Export and clear
//! - [`error`] -- Shared error types

pub mod aggregate;
pub mod detail_store;
pub mod error;
pub mod round_store;
pub mod settings_store;
pub mod snapshot_store;
pub mod sqlite;
pub mod stat_store;

// Re-export primary types for convenience.
pub use aggregate::StatUpdate;
pub use detail_store::{DetailRow, DetailStore};
pub use error::DbError;
pub use round_store::{RoundRow, RoundStore};
pub use settings_store::{SettingRow, SettingsStore};
pub use snapshot_store::SnapshotStore;
pub use sqlite::{DbConfig, DbPool, IN_MEMORY_URL};
pub use stat_store::{StatRow, StatStore};
