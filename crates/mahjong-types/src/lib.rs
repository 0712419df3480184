//! Shared type definitions for the mahjong score ledger.
//!
//! This crate is the single source of truth for the four record types the
//! ledger persists and for the request/response payloads of the HTTP API.
//! Types flow downstream to `TypeScript` via `ts-rs` for the browser client.
//!
//! # Modules
//!
//! - [`enums`] -- Enumeration types (ledger entry kind)
//! - [`structs`] -- Persisted records (`Round`, `Detail`, `Setting`, `Stat`)
//!   and the export snapshot
//! - [`requests`] -- Request and response payloads of the HTTP API

pub mod enums;
pub mod requests;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DetailKind, ParseDetailKindError};
pub use requests::{Batch, HealthResponse, MessageResponse, StatTotalUpdate};
pub use structs::{
    DEFAULT_COMMISSION_RATE, DEFAULT_COMMISSION_THRESHOLD, DEFAULT_ROUND_THRESHOLD, Detail,
    EXPORT_TIME_FORMAT, ExportSnapshot, NewDetail, Round, Setting, Stat,
};
