//! PostgreSQL tournament store.
#![allow(clippy::needless_raw_string_hashes)]

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{StoreError, StoreResult, TournamentStore};
use crate::db::timeouts::with_default_timeout;
use crate::tournament::Tournament;

/// Stores each tournament as one JSONB row keyed by tournament key.
///
/// Requires the `tournaments` table from [`crate::db::schema`].
#[derive(Clone)]
pub struct PgTournamentStore {
    pool: PgPool,
}

impl PgTournamentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn stored_identity(&self, key: &str) -> StoreResult<Option<(Uuid, u64)>> {
        let row = with_default_timeout(
            sqlx::query("SELECT generation, version FROM tournaments WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.map(|r| {
            (
                r.get::<Uuid, _>("generation"),
                r.get::<i64, _>("version") as u64,
            )
        }))
    }
}

#[async_trait]
impl TournamentStore for PgTournamentStore {
    async fn load(&self, key: &str) -> StoreResult<Option<Tournament>> {
        let row = with_default_timeout(
            sqlx::query("SELECT state FROM tournaments WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool),
        )
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let tournament: Tournament = serde_json::from_value(row.get("state"))?;
        if !tournament.is_well_formed() {
            return Err(StoreError::Corrupt(key.to_string()));
        }

        Ok(Some(tournament))
    }

    async fn save(&self, key: &str, tournament: &Tournament) -> StoreResult<()> {
        let state = serde_json::to_value(tournament)?;

        with_default_timeout(
            sqlx::query(
                r#"
                INSERT INTO tournaments (key, generation, version, state)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (key) DO UPDATE
                SET generation = EXCLUDED.generation,
                    version = EXCLUDED.version,
                    state = EXCLUDED.state,
                    created_at = NOW(),
                    updated_at = NOW()
                "#,
            )
            .bind(key)
            .bind(tournament.generation())
            .bind(tournament.version() as i64)
            .bind(state)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn save_if_version(
        &self,
        key: &str,
        expected_version: u64,
        tournament: &Tournament,
    ) -> StoreResult<()> {
        let state = serde_json::to_value(tournament)?;

        // Check and write in one statement
        let result = with_default_timeout(
            sqlx::query(
                r#"
                UPDATE tournaments
                SET version = $4, state = $5, updated_at = NOW()
                WHERE key = $1 AND generation = $2 AND version = $3
                "#,
            )
            .bind(key)
            .bind(tournament.generation())
            .bind(expected_version as i64)
            .bind(tournament.version() as i64)
            .bind(state)
            .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(match self.stored_identity(key).await? {
                Some((generation, _)) if generation != tournament.generation() => {
                    StoreError::Superseded(key.to_string())
                }
                stored => StoreError::VersionConflict {
                    key: key.to_string(),
                    expected: expected_version,
                    actual: stored.map(|(_, version)| version),
                },
            });
        }

        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<bool> {
        let result = with_default_timeout(
            sqlx::query("DELETE FROM tournaments WHERE key = $1")
                .bind(key)
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StoreResult<usize> {
        let row = with_default_timeout(
            sqlx::query("SELECT COUNT(*) AS count FROM tournaments").fetch_one(&self.pool),
        )
        .await?;

        Ok(row.get::<i64, _>("count") as usize)
    }

    async fn health_check(&self) -> StoreResult<()> {
        with_default_timeout(sqlx::query("SELECT 1").execute(&self.pool)).await?;
        Ok(())
    }
}
