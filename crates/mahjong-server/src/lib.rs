//! HTTP JSON API for the mahjong score ledger.
//!
//! This crate provides an Axum HTTP server that exposes the ledger's four
//! record collections as JSON CRUD endpoints:
//!
//! - **Rounds** (`/api/rounds`, `/api/rounds/all`) -- per-round results;
//!   every write also moves the commission stats
//! - **Details** (`/api/details`, `/api/details/all`) -- the cash ledger
//! - **Settings** (`/api/settings`) -- commission rate and threshold
//! - **Stats** (`/api/stats`, `/api/stats/total`) -- commission aggregate
//! - **Export / clear** (`/api/export`, `/api/clear`) -- whole-ledger
//!   snapshot and reset
//! - **Health** (`/api/healthz`)
//!
//! # Architecture
//!
//! Handlers are thin: each one parses and validates the body through
//! [`extract::ValidatedJson`], performs exactly one store call from
//! [`mahjong_db`], and serializes the result. Failures are rendered as a
//! `{"error": ..., "status": ...}` envelope by [`error::ApiError`].

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use config::{AppConfig, ConfigError};
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
