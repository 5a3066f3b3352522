//! HTTP API for the bracket server.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework for HTTP
//! - **Tower**: Middleware for CORS and request correlation
//! - **TournamentManager**: Keyed tournaments over the configured store
//!
//! # Modules
//!
//! - [`tournaments`]: Bracket creation, views, and result reporting
//! - [`request_id`]: Request correlation, timing, and request metrics
//!
//! # Endpoints Overview
//!
//! ```text
//! GET    /health                                          - Server health status
//! POST   /api/v1/tournaments                              - Create under a new key
//! PUT    /api/v1/tournaments/{key}                        - Create or replace at key
//! GET    /api/v1/tournaments/{key}                        - Bracket view
//! DELETE /api/v1/tournaments/{key}                        - Tear down
//! GET    /api/v1/tournaments/{key}/playable               - Matches awaiting results
//! GET    /api/v1/tournaments/{key}/matches/{match_id}     - Single match
//! POST   /api/v1/tournaments/{key}/matches/{match_id}/result - Report a result
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use ko_server::api::{create_router, AppState};
//! use ko_server::config::PlayerLimits;
//! use knockout::{MemoryTournamentStore, TournamentManager};
//! use knockout::history::LogMatchRecorder;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = TournamentManager::new(
//!     Arc::new(MemoryTournamentStore::new()),
//!     Arc::new(LogMatchRecorder),
//! );
//! let state = AppState {
//!     manager: Arc::new(manager),
//!     limits: PlayerLimits::default(),
//! };
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:6969").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod request_id;
pub mod tournaments;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use knockout::TournamentManager;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::PlayerLimits;

/// Application state shared across all HTTP handlers.
///
/// # Fields
///
/// - `manager`: Owns tournament lifecycle, history, and notarization
/// - `limits`: Player counts accepted for new tournaments
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<TournamentManager>,
    pub limits: PlayerLimits,
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Arguments
///
/// - `state`: Application state with the tournament manager
///
/// # Returns
///
/// Configured Axum router ready to serve requests
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", create_v1_router())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create API v1 router with all versioned endpoints.
fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/tournaments", post(tournaments::create_tournament))
        .route(
            "/tournaments/{key}",
            get(tournaments::get_tournament)
                .put(tournaments::put_tournament)
                .delete(tournaments::delete_tournament),
        )
        .route(
            "/tournaments/{key}/playable",
            get(tournaments::playable_matches),
        )
        .route(
            "/tournaments/{key}/matches/{match_id}",
            get(tournaments::get_match),
        )
        .route(
            "/tournaments/{key}/matches/{match_id}/result",
            post(tournaments::submit_result),
        )
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` if the tournament store answers, or
/// `503 Service Unavailable` otherwise.
///
/// # Example
///
/// ```bash
/// curl http://localhost:6969/health
/// # {"status":"healthy","store":true,"tournaments":2,"timestamp":"2026-10-18T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_healthy = state.manager.health_check().await.is_ok();
    let tournaments = if store_healthy {
        state.manager.active_count().await.ok()
    } else {
        None
    };

    let status_code = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if store_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "store": store_healthy,
        "tournaments": tournaments,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
