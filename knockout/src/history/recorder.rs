//! Match history: an audit trail of played results.
//!
//! History is written after the bracket state is saved and is never read back
//! by the engine, so a failed write costs an audit row, not bracket progress.
#![allow(clippy::needless_raw_string_hashes)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::errors::{RecorderError, RecorderResult};
use crate::bracket::{Match, MatchId, Player, PlayerId};
use crate::db::timeouts::with_default_timeout;

/// A finished, externally played match.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MatchRecord {
    pub tournament_key: String,
    pub match_id: MatchId,
    pub round: usize,
    pub occupant_a: Player,
    pub occupant_b: Player,
    pub winner_id: PlayerId,
    pub score_a: u32,
    pub score_b: u32,
    pub recorded_at: DateTime<Utc>,
}

impl MatchRecord {
    /// Build a record from a match that has both occupants and a result.
    pub fn from_match(tournament_key: &str, m: &Match) -> Option<Self> {
        let (a, b) = m.occupants()?;
        let result = m.result.as_ref()?;
        Some(Self {
            tournament_key: tournament_key.to_string(),
            match_id: m.id,
            round: m.round,
            occupant_a: a.clone(),
            occupant_b: b.clone(),
            winner_id: result.winner_id,
            score_a: result.score_a,
            score_b: result.score_b,
            recorded_at: result.recorded_at,
        })
    }
}

/// Column values of one `match_history` row. Every value converts without loss.
#[derive(Debug, PartialEq)]
struct HistoryRow {
    match_id: i64,
    round: i32,
    score_a: i64,
    score_b: i64,
}

impl TryFrom<&MatchRecord> for HistoryRow {
    type Error = RecorderError;

    fn try_from(record: &MatchRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            match_id: i64::from(record.match_id.0),
            round: i32::try_from(record.round)
                .map_err(|_| RecorderError::OutOfRange("round", record.round.to_string()))?,
            score_a: i64::from(record.score_a),
            score_b: i64::from(record.score_b),
        })
    }
}

/// Trait for match history sinks
#[async_trait]
pub trait MatchRecorder: Send + Sync {
    /// Persist one finished match
    async fn submit(&self, record: &MatchRecord) -> RecorderResult<()>;
}

/// Writes match history rows to PostgreSQL.
///
/// Requires the `match_history` table from [`crate::db::schema`].
#[derive(Clone)]
pub struct PgMatchRecorder {
    pool: PgPool,
}

impl PgMatchRecorder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchRecorder for PgMatchRecorder {
    async fn submit(&self, record: &MatchRecord) -> RecorderResult<()> {
        let row = HistoryRow::try_from(record)?;

        with_default_timeout(
            sqlx::query(
                r#"
                INSERT INTO match_history (
                    tournament_key, match_id, round,
                    player_a, player_a_name, player_b, player_b_name,
                    winner_id, score_a, score_b, recorded_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(&record.tournament_key)
            .bind(row.match_id)
            .bind(row.round)
            .bind(record.occupant_a.id)
            .bind(&record.occupant_a.name)
            .bind(record.occupant_b.id)
            .bind(&record.occupant_b.name)
            .bind(record.winner_id)
            .bind(row.score_a)
            .bind(row.score_b)
            .bind(record.recorded_at)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }
}

/// Writes match history as structured log lines. Used when no database is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogMatchRecorder;

#[async_trait]
impl MatchRecorder for LogMatchRecorder {
    async fn submit(&self, record: &MatchRecord) -> RecorderResult<()> {
        info!(
            "Match history [{}] {}: {} vs {} -> {} ({}-{})",
            record.tournament_key,
            record.match_id,
            record.occupant_a,
            record.occupant_b,
            record.winner_id,
            record.score_a,
            record.score_b
        );
        Ok(())
    }
}
