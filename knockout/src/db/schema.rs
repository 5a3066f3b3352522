//! Table definitions for tournament state and match history.

use sqlx::PgPool;

/// Idempotent DDL, applied in order.
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS tournaments (
        key TEXT PRIMARY KEY,
        generation UUID NOT NULL,
        version BIGINT NOT NULL,
        state JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS match_history (
        id BIGSERIAL PRIMARY KEY,
        tournament_key TEXT NOT NULL,
        match_id BIGINT NOT NULL,
        round INTEGER NOT NULL,
        player_a BIGINT NOT NULL,
        player_a_name TEXT NOT NULL,
        player_b BIGINT NOT NULL,
        player_b_name TEXT NOT NULL,
        winner_id BIGINT NOT NULL,
        score_a BIGINT NOT NULL,
        score_b BIGINT NOT NULL,
        recorded_at TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS match_history_tournament_idx ON match_history (tournament_key)",
];

/// Create any missing tables and indexes.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
