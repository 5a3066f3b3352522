//! Keyed persistence for in-progress tournaments.
//!
//! The store holds the authoritative live bracket so a tournament survives
//! reloads and restarts. Writes after creation go through
//! [`TournamentStore::save_if_version`], which checks and writes atomically;
//! two racing result submissions therefore cannot both apply to the same
//! loaded state, and a write prepared against a tournament that has since been
//! superseded never lands on its replacement.

use async_trait::async_trait;

use crate::tournament::Tournament;

pub mod errors;
pub mod memory;
pub mod postgres;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryTournamentStore;
pub use postgres::PgTournamentStore;

/// Trait for tournament persistence
#[async_trait]
pub trait TournamentStore: Send + Sync {
    /// Load the tournament stored under `key`, `None` when nothing is in progress
    async fn load(&self, key: &str) -> StoreResult<Option<Tournament>>;

    /// Store `tournament` under `key`, replacing whatever was there
    async fn save(&self, key: &str, tournament: &Tournament) -> StoreResult<()>;

    /// Store `tournament` only if the key still holds the same tournament
    /// (same [`Tournament::generation`]) at `expected_version`.
    ///
    /// # Errors
    ///
    /// * `StoreError::VersionConflict` - the stored tournament changed or vanished
    /// * `StoreError::Superseded` - another tournament was created under `key`
    async fn save_if_version(
        &self,
        key: &str,
        expected_version: u64,
        tournament: &Tournament,
    ) -> StoreResult<()>;

    /// Delete the tournament under `key`. Returns whether one existed.
    async fn remove(&self, key: &str) -> StoreResult<bool>;

    /// Number of stored tournaments
    async fn count(&self) -> StoreResult<usize>;

    /// Check that the backing storage answers
    async fn health_check(&self) -> StoreResult<()>;
}
