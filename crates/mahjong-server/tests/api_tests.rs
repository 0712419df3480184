//! Integration tests for the ledger API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. Every test gets its own in-memory database, so
//! the full request path (extraction, validation, store transaction,
//! serialization) is exercised.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use mahjong_db::{DbConfig, DbPool};
use mahjong_server::{AppState, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn make_app() -> Router {
    let db = DbPool::open(&DbConfig::in_memory()).await.unwrap();
    build_router(Arc::new(AppState::new(db)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

fn round_json(round_num: i64, commission: f64) -> Value {
    json!({
        "roundNum": round_num,
        "playersData": [
            {"name": "East", "score": 1200},
            {"name": "South", "score": -400}
        ],
        "commission": commission,
        "rate": 20,
        "threshold": 500,
        "time": "2025-06-01 20:15",
        "timestamp": 1_748_780_100_000_i64 + round_num
    })
}

fn detail_json(kind: &str, amount: f64, balance: f64) -> Value {
    json!({
        "type": kind,
        "detail": "table fee",
        "amount": amount,
        "time": "2025-06-01 21:00",
        "timestamp": 1_748_782_800_000_i64,
        "balance": balance
    })
}

// ---------------------------------------------------------------------------
// Fresh ledger
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fresh_ledger_has_defaults() {
    let app = make_app().await;

    let (status, rounds) = get(&app, "/api/rounds").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rounds, json!([]));

    let (status, details) = get(&app, "/api/details").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details, json!([]));

    let (_, settings) = get(&app, "/api/settings").await;
    assert_eq!(settings["commissionRate"], 20.0);
    assert_eq!(settings["commissionThreshold"], 500.0);

    let (_, stats) = get(&app, "/api/stats").await;
    assert_eq!(stats["totalCommission"], 0.0);
    assert_eq!(stats["roundCount"], 0);
}

#[tokio::test]
async fn healthz_returns_ok() {
    let app = make_app().await;
    let (status, body) = get(&app, "/api/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// ---------------------------------------------------------------------------
// Rounds
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_round_increments_stats() {
    let app = make_app().await;

    let (status, created) = post(&app, "/api/rounds", round_json(1, 20.0)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["roundNum"], 1);

    let (status, _) = post(&app, "/api/rounds", round_json(2, 12.5)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, stats) = get(&app, "/api/stats").await;
    assert_eq!(stats["totalCommission"], 32.5);
    assert_eq!(stats["roundCount"], 2);

    let (_, rounds) = get(&app, "/api/rounds").await;
    let nums: Vec<i64> = rounds
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["roundNum"].as_i64().unwrap())
        .collect();
    assert_eq!(nums, vec![1, 2]);
}

#[tokio::test]
async fn add_round_defaults_missing_threshold() {
    let app = make_app().await;

    let mut body = round_json(7, 0.0);
    body.as_object_mut().unwrap().remove("threshold");

    let (status, created) = post(&app, "/api/rounds", body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["threshold"], 500.0);

    let (_, rounds) = get(&app, "/api/rounds").await;
    assert_eq!(rounds[0]["threshold"], 500.0);
}

#[tokio::test]
async fn players_data_round_trips_unchanged() {
    let app = make_app().await;

    let mut body = round_json(3, 40.0);
    let players = json!([
        {"name": "West", "score": 2000, "tags": ["dealer", {"streak": 3}]},
        {"name": "North", "score": null, "note": "left early"}
    ]);
    body["playersData"] = players.clone();

    let (status, _) = post(&app, "/api/rounds", body).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, rounds) = get(&app, "/api/rounds").await;
    assert_eq!(rounds[0]["playersData"], players);
}

#[tokio::test]
async fn players_data_bytes_match_request() {
    let app = make_app().await;

    let players = r#"{"zeta":1,"alpha":2,"mid":{"south":[3,{"y":1,"x":2}],"east":null}}"#;
    let body = format!(
        r#"{{"roundNum":1,"playersData":{players},"commission":20,"rate":20,"threshold":500,"time":"t","timestamp":1}}"#
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/rounds")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let request = Request::builder()
        .uri("/api/rounds")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(
        text.contains(&format!(r#""playersData":{players}"#)),
        "stored text: {text}"
    );
}

#[tokio::test]
async fn duplicate_round_is_conflict_and_changes_nothing() {
    let app = make_app().await;

    let (status, _) = post(&app, "/api/rounds", round_json(1, 20.0)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(&app, "/api/rounds", round_json(1, 99.0)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);
    assert!(body["error"].as_str().unwrap().contains("round 1"));

    let (_, stats) = get(&app, "/api/stats").await;
    assert_eq!(stats["totalCommission"], 20.0);
    assert_eq!(stats["roundCount"], 1);

    let (_, rounds) = get(&app, "/api/rounds").await;
    assert_eq!(rounds.as_array().unwrap().len(), 1);
    assert_eq!(rounds[0]["commission"], 20.0);
}

#[tokio::test]
async fn save_all_rounds_recomputes_stats() {
    let app = make_app().await;

    post(&app, "/api/rounds", round_json(1, 20.0)).await;
    post(&app, "/api/rounds", round_json(2, 20.0)).await;

    let batch = json!([round_json(10, 5.0), round_json(11, 7.5), round_json(12, 0.0)]);
    let (status, body) = post(&app, "/api/rounds/all", batch).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Saved 3 rounds");

    let (_, stats) = get(&app, "/api/stats").await;
    assert_eq!(stats["totalCommission"], 12.5);
    assert_eq!(stats["roundCount"], 3);

    let (_, rounds) = get(&app, "/api/rounds").await;
    let nums: Vec<i64> = rounds
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["roundNum"].as_i64().unwrap())
        .collect();
    assert_eq!(nums, vec![10, 11, 12]);
}

#[tokio::test]
async fn save_all_rounds_empty_resets_stats() {
    let app = make_app().await;

    post(&app, "/api/rounds", round_json(1, 20.0)).await;

    let (status, body) = post(&app, "/api/rounds/all", json!([])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Saved 0 rounds");

    let (_, stats) = get(&app, "/api/stats").await;
    assert_eq!(stats["totalCommission"], 0.0);
    assert_eq!(stats["roundCount"], 0);
    let (_, rounds) = get(&app, "/api/rounds").await;
    assert_eq!(rounds, json!([]));
}

#[tokio::test]
async fn save_all_rounds_with_repeat_rolls_back() {
    let app = make_app().await;

    post(&app, "/api/rounds", round_json(1, 20.0)).await;

    let batch = json!([round_json(5, 1.0), round_json(5, 2.0)]);
    let (status, _) = post(&app, "/api/rounds/all", batch).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, rounds) = get(&app, "/api/rounds").await;
    assert_eq!(rounds.as_array().unwrap().len(), 1);
    assert_eq!(rounds[0]["roundNum"], 1);
    let (_, stats) = get(&app, "/api/stats").await;
    assert_eq!(stats["totalCommission"], 20.0);
    assert_eq!(stats["roundCount"], 1);
}

#[tokio::test]
async fn round_missing_field_is_bad_request() {
    let app = make_app().await;

    let mut body = round_json(1, 20.0);
    body.as_object_mut().unwrap().remove("commission");

    let (status, body) = post(&app, "/api/rounds", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].is_string());

    let (_, stats) = get(&app, "/api/stats").await;
    assert_eq!(stats["roundCount"], 0);
}

#[tokio::test]
async fn overlong_time_is_bad_request() {
    let app = make_app().await;

    let mut body = round_json(1, 20.0);
    body["time"] = json!("x".repeat(51));

    let (status, _) = post(&app, "/api/rounds", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_detail_assigns_id_and_leaves_stats() {
    let app = make_app().await;

    let (status, first) = post(&app, "/api/details", detail_json("income", 100.0, 100.0)).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, second) = post(&app, "/api/details", detail_json("expense", 30.0, 70.0)).await;

    let first_id = first["id"].as_i64().unwrap();
    let second_id = second["id"].as_i64().unwrap();
    assert!(second_id > first_id);
    assert_eq!(second["type"], "expense");
    assert_eq!(second["balance"], 70.0);

    let (_, details) = get(&app, "/api/details").await;
    assert_eq!(details.as_array().unwrap().len(), 2);
    assert_eq!(details[0]["id"], first_id);

    let (_, stats) = get(&app, "/api/stats").await;
    assert_eq!(stats["totalCommission"], 0.0);
    assert_eq!(stats["roundCount"], 0);
}

#[tokio::test]
async fn unknown_detail_type_is_bad_request() {
    let app = make_app().await;
    let (status, _) = post(&app, "/api/details", detail_json("refund", 5.0, 5.0)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn save_all_details_replaces_entries() {
    let app = make_app().await;

    post(&app, "/api/details", detail_json("income", 100.0, 100.0)).await;

    let batch = json!([
        detail_json("income", 50.0, 50.0),
        detail_json("expense", 10.0, 40.0)
    ]);
    let (status, body) = post(&app, "/api/details/all", batch).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Saved 2 details");

    let (_, details) = get(&app, "/api/details").await;
    let amounts: Vec<f64> = details
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["amount"].as_f64().unwrap())
        .collect();
    assert_eq!(amounts, vec![50.0, 10.0]);
}

// ---------------------------------------------------------------------------
// Settings and stats
// ---------------------------------------------------------------------------

#[tokio::test]
async fn save_settings_overwrites() {
    let app = make_app().await;

    let (status, saved) = post(
        &app,
        "/api/settings",
        json!({"commissionRate": 15, "commissionThreshold": 300}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["commissionRate"], 15.0);

    let (_, settings) = get(&app, "/api/settings").await;
    assert_eq!(settings["commissionRate"], 15.0);
    assert_eq!(settings["commissionThreshold"], 300.0);
}

#[tokio::test]
async fn settings_missing_field_is_bad_request() {
    let app = make_app().await;

    let (status, body) = post(&app, "/api/settings", json!({"commissionRate": 15})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (_, settings) = get(&app, "/api/settings").await;
    assert_eq!(settings["commissionRate"], 20.0);
}

#[tokio::test]
async fn stat_total_override_keeps_round_count() {
    let app = make_app().await;

    post(&app, "/api/rounds", round_json(1, 20.0)).await;

    let (status, stat) = send(
        &app,
        Method::PUT,
        "/api/stats/total",
        Some(json!({"totalCommission": 150})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stat["totalCommission"], 150.0);
    assert_eq!(stat["roundCount"], 1);

    // An override is not a replace: the next insert still increments.
    post(&app, "/api/rounds", round_json(2, 10.0)).await;
    let (_, stats) = get(&app, "/api/stats").await;
    assert_eq!(stats["totalCommission"], 160.0);
    assert_eq!(stats["roundCount"], 2);
}

// ---------------------------------------------------------------------------
// Export and clear
// ---------------------------------------------------------------------------

#[tokio::test]
async fn export_bundles_every_collection() {
    let app = make_app().await;

    post(&app, "/api/rounds", round_json(1, 20.0)).await;
    post(&app, "/api/details", detail_json("income", 100.0, 100.0)).await;

    let (status, snapshot) = get(&app, "/api/export").await;
    assert_eq!(status, StatusCode::OK);

    let (_, rounds) = get(&app, "/api/rounds").await;
    let (_, details) = get(&app, "/api/details").await;
    let (_, settings) = get(&app, "/api/settings").await;
    assert_eq!(snapshot["allRounds"], rounds);
    assert_eq!(snapshot["goldDetails"], details);
    assert_eq!(snapshot["commissionSettings"], settings);
    assert_eq!(snapshot["totalCommission"], 20.0);

    let export_time = snapshot["exportTime"].as_str().unwrap();
    assert_eq!(export_time.len(), 19);
    assert!(chrono::NaiveDateTime::parse_from_str(export_time, "%Y-%m-%d %H:%M:%S").is_ok());
}

#[tokio::test]
async fn clear_resets_everything() {
    let app = make_app().await;

    post(&app, "/api/rounds", round_json(1, 20.0)).await;
    post(&app, "/api/details", detail_json("income", 100.0, 100.0)).await;
    post(
        &app,
        "/api/settings",
        json!({"commissionRate": 10, "commissionThreshold": 100}),
    )
    .await;

    let (status, body) = send(&app, Method::DELETE, "/api/clear", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Database cleared successfully");

    let (_, rounds) = get(&app, "/api/rounds").await;
    assert_eq!(rounds, json!([]));
    let (_, details) = get(&app, "/api/details").await;
    assert_eq!(details, json!([]));
    let (_, settings) = get(&app, "/api/settings").await;
    assert_eq!(settings["commissionRate"], 20.0);
    assert_eq!(settings["commissionThreshold"], 500.0);
    let (_, stats) = get(&app, "/api/stats").await;
    assert_eq!(stats["totalCommission"], 0.0);
    assert_eq!(stats["roundCount"], 0);

    // A round number used before the clear is free again.
    let (status, _) = post(&app, "/api/rounds", round_json(1, 20.0)).await;
    assert_eq!(status, StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = make_app().await;
    let (status, body) = get(&app, "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert!(body["error"].as_str().unwrap().contains("/api/nope"));
}

#[tokio::test]
async fn wrong_method_is_405() {
    let app = make_app().await;
    let (status, _) = get(&app, "/api/clear").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = make_app().await;

    let request = Request::builder()
        .uri("/api/healthz")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
