//! Integration tests for the HTTP API.
//!
//! The router is driven in-process with `oneshot` over an in-memory store, so
//! no database or network listener is needed.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use knockout::history::LogMatchRecorder;
use knockout::seeding::FixedSequence;
use knockout::{MemoryTournamentStore, Randomness, TournamentManager};
use ko_server::api::{AppState, create_router, request_id::REQUEST_ID_HEADER};
use ko_server::config::PlayerLimits;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot` method

/// Router over a fresh in-memory store; players are seeded in roster order
fn create_test_server() -> Router {
    let manager = TournamentManager::new(
        Arc::new(MemoryTournamentStore::new()),
        Arc::new(LogMatchRecorder),
    )
    .with_randomness(Randomness::from(FixedSequence::new(vec![0.999])));

    create_router(AppState {
        manager: Arc::new(manager),
        limits: PlayerLimits::default(),
    })
}

/// Send one request and decode the JSON body (`Value::Null` when empty)
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value, HeaderMap) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json, headers)
}

async fn submit(
    app: &Router,
    key: &str,
    match_id: u32,
    winner: i64,
    a: u32,
    b: u32,
) -> (StatusCode, Value) {
    let (status, body, _) = send(
        app,
        "POST",
        &format!("/api/v1/tournaments/{key}/matches/{match_id}/result"),
        Some(json!({ "winner_id": winner, "score_a": a, "score_b": b })),
    )
    .await;
    (status, body)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_server();
    let (status, body, _) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], true);
    assert_eq!(body["tournaments"], 0);
}

#[tokio::test]
async fn test_request_id_echoed_or_generated() {
    let app = create_test_server();

    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "trace-me")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "trace-me");

    let (_, _, headers) = send(&app, "GET", "/health", None).await;
    assert!(headers.contains_key(REQUEST_ID_HEADER));
}

// ============================================================================
// Tournament Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_create_returns_key_and_bracket() {
    let app = create_test_server();
    let (status, body, _) = send(
        &app,
        "POST",
        "/api/v1/tournaments",
        Some(json!({ "player_count": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let key = body["key"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(key).is_ok());

    let bracket = &body["bracket"];
    assert_eq!(bracket["bracket_size"], 8);
    assert_eq!(bracket["byes"], 3);
    assert_eq!(bracket["total_rounds"], 3);
    assert_eq!(bracket["total_matches"], 7);
    assert_eq!(bracket["status"], "in_progress");
    assert_eq!(bracket["rounds"][0]["name"], "Quarterfinals");
    assert_eq!(bracket["rounds"][2]["name"], "Finals");

    let (status, fetched, _) = send(&app, "GET", &format!("/api/v1/tournaments/{key}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["key"], key);
}

#[tokio::test]
async fn test_player_count_outside_limits() {
    let app = create_test_server();

    for count in [0, 1, 17] {
        let (status, body, _) = send(
            &app,
            "POST",
            "/api/v1/tournaments",
            Some(json!({ "player_count": count })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "player_count {count}");
        assert_eq!(body["code"], "invalid_player_count");
    }
}

#[tokio::test]
async fn test_full_playthrough_over_http() {
    let app = create_test_server();
    let (status, _, _) = send(
        &app,
        "PUT",
        "/api/v1/tournaments/cup",
        Some(json!({ "player_count": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Roster order: #0 is 1 v 2, #1 is 3 v 4, #2 is the final
    let (status, playable, _) = send(&app, "GET", "/api/v1/tournaments/cup/playable", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(playable.as_array().unwrap().len(), 2);

    let (status, _) = submit(&app, "cup", 0, 2, 1, 3).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = submit(&app, "cup", 1, 3, 3, 0).await;
    assert_eq!(status, StatusCode::OK);

    let (status, final_match, _) =
        send(&app, "GET", "/api/v1/tournaments/cup/matches/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(final_match["state"], "ready");
    assert_eq!(final_match["occupant_a"]["id"], 2);
    assert_eq!(final_match["occupant_b"]["id"], 3);

    let (status, bracket) = submit(&app, "cup", 2, 3, 1, 2).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bracket["status"], "champion_decided");
    assert_eq!(bracket["champion"]["id"], 3);
    assert_eq!(bracket["champion"]["name"], "Player 3");
}

#[tokio::test]
async fn test_result_errors_map_to_status() {
    let app = create_test_server();
    send(
        &app,
        "PUT",
        "/api/v1/tournaments/cup",
        Some(json!({ "player_count": 4 })),
    )
    .await;

    // Winner not in the match
    let (status, body) = submit(&app, "cup", 0, 4, 1, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "unknown_winner");

    // Final has no occupants yet
    let (status, body) = submit(&app, "cup", 2, 1, 1, 0).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "not_ready");

    // No such match
    let (status, body) = submit(&app, "cup", 42, 1, 1, 0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "match_not_found");

    // Identical resubmission is fine, a different one is not
    let (status, _) = submit(&app, "cup", 0, 1, 2, 0).await;
    assert_eq!(status, StatusCode::OK);
    let (status, bracket) = submit(&app, "cup", 0, 1, 2, 0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bracket["version"], 1);
    let (status, body) = submit(&app, "cup", 0, 2, 0, 2).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "already_decided");
}

#[tokio::test]
async fn test_unknown_tournament_is_not_found() {
    let app = create_test_server();

    let (status, body, _) = send(&app, "GET", "/api/v1/tournaments/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "no_tournament");

    let (status, _) = submit(&app, "missing", 0, 1, 1, 0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_tears_down() {
    let app = create_test_server();
    send(
        &app,
        "PUT",
        "/api/v1/tournaments/cup",
        Some(json!({ "player_count": 3 })),
    )
    .await;

    let (status, _, _) = send(&app, "DELETE", "/api/v1/tournaments/cup", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(&app, "DELETE", "/api/v1/tournaments/cup", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(&app, "GET", "/api/v1/tournaments/cup", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bye_matches_shown_resolved() {
    let app = create_test_server();
    let (_, body, _) = send(
        &app,
        "PUT",
        "/api/v1/tournaments/cup",
        Some(json!({ "player_count": 3 })),
    )
    .await;

    // Roster order puts the bye last: #1 is Player 3 v BYE
    let bye_match = &body["rounds"][0]["matches"][1];
    assert_eq!(bye_match["state"], "bye_resolved");
    assert_eq!(bye_match["winner_id"], 3);
    assert_eq!(bye_match["occupant_b"]["is_bye"], true);
    assert!(bye_match["score_a"].is_null());
    assert_eq!(body["rounds"][1]["matches"][0]["occupant_b"]["id"], 3);
}
