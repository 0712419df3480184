//! REST API endpoint handlers for the ledger server.
//!
//! Each handler performs exactly one store operation against the shared
//! [`AppState`] database pool and commits before responding.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/rounds` | List all rounds |
//! | `POST` | `/api/rounds` | Add one round (201) |
//! | `POST` | `/api/rounds/all` | Replace all rounds |
//! | `GET` | `/api/details` | List all cash-ledger entries |
//! | `POST` | `/api/details` | Add one entry (201) |
//! | `POST` | `/api/details/all` | Replace all entries |
//! | `GET` | `/api/settings` | Commission configuration |
//! | `POST` | `/api/settings` | Save commission configuration |
//! | `GET` | `/api/stats` | Commission aggregate |
//! | `PUT` | `/api/stats/total` | Override collected commission |
//! | `GET` | `/api/export` | Whole-ledger snapshot |
//! | `DELETE` | `/api/clear` | Reset the ledger |
//! | `GET` | `/api/healthz` | Liveness probe |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use mahjong_db::{DetailStore, RoundStore, SettingsStore, SnapshotStore, StatStore};
use mahjong_types::{
    Batch, Detail, ExportSnapshot, HealthResponse, MessageResponse, NewDetail, Round, Setting,
    Stat, StatTotalUpdate,
};

use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Rounds
// ---------------------------------------------------------------------------

/// List every recorded round in storage order.
pub async fn list_rounds(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Round>>, ApiError> {
    let rounds = RoundStore::new(state.db.pool()).list().await?;
    tracing::debug!(count = rounds.len(), "Listed rounds");
    Ok(Json(rounds))
}

/// Record one round and add its commission to the stats.
///
/// A repeated `roundNum` is rejected with 409 and changes nothing.
pub async fn add_round(
    State(state): State<Arc<AppState>>,
    ValidatedJson(round): ValidatedJson<Round>,
) -> Result<(StatusCode, Json<Round>), ApiError> {
    let created = RoundStore::new(state.db.pool()).insert(&round).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace every round with the submitted array and recompute the stats
/// from it.
pub async fn save_all_rounds(
    State(state): State<Arc<AppState>>,
    ValidatedJson(rounds): ValidatedJson<Batch<Round>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let saved = RoundStore::new(state.db.pool())
        .replace_all(&rounds.into_inner())
        .await?;
    Ok(Json(MessageResponse::new(format!("Saved {saved} rounds"))))
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

/// List every cash-ledger entry in id order.
pub async fn list_details(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Detail>>, ApiError> {
    let details = DetailStore::new(state.db.pool()).list().await?;
    tracing::debug!(count = details.len(), "Listed details");
    Ok(Json(details))
}

/// Record one cash-ledger entry; the response carries the assigned id.
pub async fn add_detail(
    State(state): State<Arc<AppState>>,
    ValidatedJson(detail): ValidatedJson<NewDetail>,
) -> Result<(StatusCode, Json<Detail>), ApiError> {
    let created = DetailStore::new(state.db.pool()).insert(detail).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace every cash-ledger entry with the submitted array.
pub async fn save_all_details(
    State(state): State<Arc<AppState>>,
    ValidatedJson(details): ValidatedJson<Batch<NewDetail>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let saved = DetailStore::new(state.db.pool())
        .replace_all(&details.into_inner())
        .await?;
    Ok(Json(MessageResponse::new(format!("Saved {saved} details"))))
}

// ---------------------------------------------------------------------------
// Settings and stats
// ---------------------------------------------------------------------------

/// Return the commission configuration.
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Setting>, ApiError> {
    Ok(Json(SettingsStore::new(state.db.pool()).get().await?))
}

/// Overwrite the commission configuration.
pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    ValidatedJson(setting): ValidatedJson<Setting>,
) -> Result<Json<Setting>, ApiError> {
    Ok(Json(SettingsStore::new(state.db.pool()).update(setting).await?))
}

/// Return the commission aggregate.
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<Stat>, ApiError> {
    Ok(Json(StatStore::new(state.db.pool()).get().await?))
}

/// Set the collected commission to an absolute value.
pub async fn update_stat_total(
    State(state): State<Arc<AppState>>,
    ValidatedJson(update): ValidatedJson<StatTotalUpdate>,
) -> Result<Json<Stat>, ApiError> {
    let stat = StatStore::new(state.db.pool())
        .update_total(update.total_commission)
        .await?;
    Ok(Json(stat))
}

// ---------------------------------------------------------------------------
// Export / clear / health
// ---------------------------------------------------------------------------

/// Return every collection in one snapshot, stamped with the current local
/// time.
pub async fn export(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ExportSnapshot>, ApiError> {
    let snapshot = SnapshotStore::new(state.db.pool())
        .export(chrono::Local::now())
        .await?;
    Ok(Json(snapshot))
}

/// Delete all rounds and entries and restore the default settings and stats.
pub async fn clear(State(state): State<Arc<AppState>>) -> Result<Json<MessageResponse>, ApiError> {
    SnapshotStore::new(state.db.pool()).clear_all().await?;
    Ok(Json(MessageResponse::new("Database cleared successfully")))
}

/// Liveness probe.
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// JSON 404 for any path without a route.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
