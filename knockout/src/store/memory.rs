//! Process-local tournament store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, TournamentStore};
use crate::tournament::Tournament;

/// In-memory store; state is lost when the process exits.
#[derive(Default)]
pub struct MemoryTournamentStore {
    tournaments: RwLock<HashMap<String, Tournament>>,
}

impl MemoryTournamentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TournamentStore for MemoryTournamentStore {
    async fn load(&self, key: &str) -> StoreResult<Option<Tournament>> {
        Ok(self.tournaments.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, tournament: &Tournament) -> StoreResult<()> {
        self.tournaments
            .write()
            .await
            .insert(key.to_string(), tournament.clone());
        Ok(())
    }

    async fn save_if_version(
        &self,
        key: &str,
        expected_version: u64,
        tournament: &Tournament,
    ) -> StoreResult<()> {
        let mut tournaments = self.tournaments.write().await;
        let stored = tournaments.get(key);

        if stored.is_some_and(|t| t.generation() != tournament.generation()) {
            return Err(StoreError::Superseded(key.to_string()));
        }

        let actual = stored.map(Tournament::version);
        if actual != Some(expected_version) {
            return Err(StoreError::VersionConflict {
                key: key.to_string(),
                expected: expected_version,
                actual,
            });
        }

        tournaments.insert(key.to_string(), tournament.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<bool> {
        Ok(self.tournaments.write().await.remove(key).is_some())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.tournaments.read().await.len())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
