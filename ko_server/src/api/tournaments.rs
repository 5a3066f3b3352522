//! Tournament API handlers.
//!
//! This module provides HTTP REST endpoints for bracket operations including:
//! - Creating a tournament under a fresh or chosen key
//! - Viewing the bracket, a single match, or the matches awaiting results
//! - Reporting match results
//! - Tearing a tournament down
//!
//! # Examples
//!
//! Create a tournament:
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/tournaments \
//!   -H "Content-Type: application/json" \
//!   -d '{"player_count": 5}'
//! ```
//!
//! Report a result:
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/tournaments/KEY/matches/0/result \
//!   -H "Content-Type: application/json" \
//!   -d '{"winner_id": 2, "score_a": 1, "score_b": 3}'
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use knockout::{
    Match, MatchId, MatchState, Player, PlayerId, Submission, Tournament, TournamentError,
    TournamentStatus, bracket::addressing,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AppState, request_id::RequestId};
use crate::{logging, metrics};

#[derive(Debug, Deserialize)]
pub struct CreateTournamentRequest {
    pub player_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SubmitResultRequest {
    pub winner_id: PlayerId,
    pub score_a: u32,
    pub score_b: u32,
}

#[derive(Debug, Serialize)]
pub struct CreatedTournamentResponse {
    pub key: String,
    pub bracket: BracketView,
}

#[derive(Debug, Serialize)]
pub struct BracketView {
    pub key: String,
    pub player_count: usize,
    pub bracket_size: usize,
    pub byes: usize,
    pub total_rounds: usize,
    pub total_matches: usize,
    pub status: TournamentStatus,
    pub champion: Option<Player>,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub rounds: Vec<RoundView>,
}

#[derive(Debug, Serialize)]
pub struct RoundView {
    pub round: usize,
    pub name: String,
    pub matches: Vec<MatchView>,
}

#[derive(Debug, Serialize)]
pub struct MatchView {
    pub id: MatchId,
    pub round: usize,
    pub slot: usize,
    pub state: MatchState,
    pub occupant_a: Option<Player>,
    pub occupant_b: Option<Player>,
    pub winner_id: Option<PlayerId>,
    pub score_a: Option<u32>,
    pub score_b: Option<u32>,
    /// Match the winner moves into; absent for the final
    pub next_match: Option<MatchId>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

impl BracketView {
    fn new(key: &str, tournament: &Tournament) -> Self {
        let rounds = tournament
            .rounds()
            .iter()
            .enumerate()
            .map(|(round, matches)| RoundView {
                round,
                name: tournament.round_name(round),
                matches: matches
                    .iter()
                    .map(|m| MatchView::new(tournament.rounds_count(), m))
                    .collect(),
            })
            .collect();

        Self {
            key: key.to_string(),
            player_count: tournament.player_count(),
            bracket_size: tournament.bracket_size(),
            byes: tournament.byes(),
            total_rounds: tournament.rounds_count(),
            total_matches: tournament.total_matches(),
            status: tournament.status(),
            champion: tournament.champion().cloned(),
            version: tournament.version(),
            created_at: tournament.created_at(),
            rounds,
        }
    }
}

impl MatchView {
    fn new(rounds: usize, m: &Match) -> Self {
        let state = m.state();
        // Bye resolutions carry no real score
        let scores = match (&m.result, state) {
            (Some(r), MatchState::Completed) => (Some(r.score_a), Some(r.score_b)),
            _ => (None, None),
        };

        Self {
            id: m.id,
            round: m.round,
            slot: m.slot,
            state,
            occupant_a: m.occupant_a.clone(),
            occupant_b: m.occupant_b.clone(),
            winner_id: m.winner().map(|p| p.id),
            score_a: scores.0,
            score_b: scores.1,
            next_match: addressing::next_slot(rounds, m.round, m.slot)
                .and_then(|(round, slot, _)| addressing::match_id(rounds, round, slot)),
        }
    }
}

/// Map an engine error onto an HTTP status and client-safe body.
pub fn error_response(err: &TournamentError) -> ApiError {
    let (status, code) = match err {
        TournamentError::InvalidPlayerCount(_) => (StatusCode::BAD_REQUEST, "invalid_player_count"),
        TournamentError::InvalidSeeding(_) => (StatusCode::BAD_REQUEST, "invalid_seeding"),
        TournamentError::UnknownWinner { .. } => (StatusCode::BAD_REQUEST, "unknown_winner"),
        TournamentError::NotFound(_) => (StatusCode::NOT_FOUND, "match_not_found"),
        TournamentError::NoTournament(_) => (StatusCode::NOT_FOUND, "no_tournament"),
        TournamentError::NotReady(_) => (StatusCode::CONFLICT, "not_ready"),
        TournamentError::AlreadyDecided(_) => (StatusCode::CONFLICT, "already_decided"),
        TournamentError::Superseded(_) => (StatusCode::CONFLICT, "superseded"),
        TournamentError::StoreUnavailable(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
        }
        TournamentError::LedgerUnavailable(_) => (StatusCode::BAD_GATEWAY, "ledger_unavailable"),
    };

    if status.is_server_error() {
        tracing::error!("Tournament operation failed: {}", err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.client_message(),
            code,
        }),
    )
}

async fn refresh_active_gauge(state: &AppState) {
    if let Ok(count) = state.manager.active_count().await {
        metrics::active_tournaments(count);
    }
}

async fn create_at(
    state: &AppState,
    key: &str,
    player_count: usize,
) -> Result<BracketView, ApiError> {
    if !state.limits.contains(player_count) {
        return Err(error_response(&TournamentError::InvalidPlayerCount(
            player_count,
        )));
    }

    let tournament = state
        .manager
        .create_tournament(key, player_count)
        .await
        .map_err(|e| error_response(&e))?;

    metrics::tournaments_created_total();
    refresh_active_gauge(state).await;

    Ok(BracketView::new(key, &tournament))
}

/// Create a tournament under a new key.
///
/// # Response
///
/// Returns `201 Created` with the generated key and the initial bracket, with
/// bye matches already resolved.
///
/// # Errors
///
/// - `400 Bad Request`: Player count outside the configured limits
/// - `503 Service Unavailable`: Tournament store unreachable
pub async fn create_tournament(
    State(state): State<AppState>,
    Json(request): Json<CreateTournamentRequest>,
) -> Result<(StatusCode, Json<CreatedTournamentResponse>), ApiError> {
    let key = Uuid::new_v4().to_string();
    let bracket = create_at(&state, &key, request.player_count).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedTournamentResponse { key, bracket }),
    ))
}

/// Create a tournament under a caller-chosen key, replacing any tournament there.
pub async fn put_tournament(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<CreateTournamentRequest>,
) -> Result<Json<BracketView>, ApiError> {
    Ok(Json(create_at(&state, &key, request.player_count).await?))
}

/// Get the full bracket.
///
/// # Errors
///
/// - `404 Not Found`: No tournament under this key
pub async fn get_tournament(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<BracketView>, ApiError> {
    let tournament = state
        .manager
        .tournament(&key)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(BracketView::new(&key, &tournament)))
}

/// Tear a tournament down.
///
/// Returns `204 No Content`, or `404 Not Found` if nothing was stored under the key.
pub async fn delete_tournament(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state
        .manager
        .reset(&key)
        .await
        .map_err(|e| error_response(&e))?;

    if !removed {
        return Err(error_response(&TournamentError::NoTournament(key)));
    }

    refresh_active_gauge(&state).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a single match.
///
/// # Errors
///
/// - `404 Not Found`: No tournament under this key, or no such match
pub async fn get_match(
    State(state): State<AppState>,
    Path((key, match_id)): Path<(String, u32)>,
) -> Result<Json<MatchView>, ApiError> {
    let tournament = state
        .manager
        .tournament(&key)
        .await
        .map_err(|e| error_response(&e))?;
    let m = tournament
        .get_match(MatchId(match_id))
        .map_err(|e| error_response(&e))?;

    Ok(Json(MatchView::new(tournament.rounds_count(), m)))
}

/// List the matches currently waiting for a result.
pub async fn playable_matches(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Vec<MatchView>>, ApiError> {
    let tournament = state
        .manager
        .tournament(&key)
        .await
        .map_err(|e| error_response(&e))?;

    let rounds = tournament.rounds_count();
    Ok(Json(
        tournament
            .playable_matches()
            .into_iter()
            .map(|m| MatchView::new(rounds, m))
            .collect(),
    ))
}

/// Report the result of a match.
///
/// Resubmitting an identical result is accepted and changes nothing.
///
/// # Response
///
/// Returns `200 OK` with the bracket after the winner has been advanced.
///
/// # Errors
///
/// - `400 Bad Request`: Winner is not playing in this match
/// - `404 Not Found`: No tournament under this key, or no such match
/// - `409 Conflict`: Match not ready, or already decided differently
/// - `503 Service Unavailable`: Tournament store unreachable
pub async fn submit_result(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((key, match_id)): Path<(String, u32)>,
    Json(request): Json<SubmitResultRequest>,
) -> Result<Json<BracketView>, ApiError> {
    let outcome = match state
        .manager
        .submit_result(
            &key,
            MatchId(match_id),
            request.winner_id,
            request.score_a,
            request.score_b,
        )
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            metrics::match_results_total("rejected");
            tracing::warn!(
                request_id = request_id.as_str(),
                tournament_key = %key,
                match_id = match_id,
                "Result rejected: {}",
                e
            );
            return Err(error_response(&e));
        }
    };

    metrics::match_results_total(match outcome.submission {
        Submission::Recorded => "recorded",
        Submission::Unchanged => "unchanged",
    });

    if outcome.crowned {
        metrics::champions_crowned_total();
        if let Some(champion) = outcome.tournament.champion() {
            logging::log_ledger_event(
                Some(&key),
                "queued",
                &format!("Champion {} queued for notarization", champion.name),
            );
        }
    }

    Ok(Json(BracketView::new(&key, &outcome.tournament)))
}
