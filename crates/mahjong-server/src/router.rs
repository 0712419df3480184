//! Axum router construction for the ledger API.
//!
//! Assembles all routes into a single [`Router`] with request tracing and,
//! unless disabled, permissive CORS for the browser client.

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the ledger server.
///
/// See [`handlers`] for the endpoint table. Unknown paths get a JSON 404;
/// a known path with the wrong verb gets 405.
pub fn build_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route(
            "/api/rounds",
            get(handlers::list_rounds).post(handlers::add_round),
        )
        .route("/api/rounds/all", post(handlers::save_all_rounds))
        .route(
            "/api/details",
            get(handlers::list_details).post(handlers::add_detail),
        )
        .route("/api/details/all", post(handlers::save_all_details))
        .route(
            "/api/settings",
            get(handlers::get_settings).post(handlers::save_settings),
        )
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/stats/total", put(handlers::update_stat_total))
        .route("/api/export", get(handlers::export))
        .route("/api/clear", delete(handlers::clear))
        .route("/api/healthz", get(handlers::healthz))
        .fallback(handlers::not_found);

    let router = if state.cors_any_origin {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
