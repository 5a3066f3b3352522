//! Champion notarization on an external ledger.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::{LedgerError, LedgerResult};
use crate::tournament::Tournament;

/// What gets notarized once a tournament has a champion.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChampionEntry {
    pub winner_name: String,
    pub player_count: usize,
    pub total_rounds: usize,
    pub total_matches: usize,
}

impl ChampionEntry {
    /// Entry for a decided tournament, `None` while it is still in progress.
    pub fn from_tournament(tournament: &Tournament) -> Option<Self> {
        let champion = tournament.champion()?;
        Some(Self {
            winner_name: champion.name.clone(),
            player_count: tournament.player_count(),
            total_rounds: tournament.rounds_count(),
            total_matches: tournament.total_matches(),
        })
    }
}

/// Ledger acknowledgement of a notarized champion.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LedgerReceipt {
    pub tournament_id: u64,
    pub proof_ref: String,
}

/// Trait for champion ledgers
#[async_trait]
pub trait ChampionLedger: Send + Sync {
    /// Record a champion. Called once per decided tournament.
    async fn record(&self, entry: &ChampionEntry) -> LedgerResult<LedgerReceipt>;
}

/// Ledger reached over HTTP: `POST {base_url}/tournaments` with a JSON
/// [`ChampionEntry`], answered by a JSON [`LedgerReceipt`].
#[derive(Clone, Debug)]
pub struct HttpChampionLedger {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpChampionLedger {
    /// Create a ledger client
    ///
    /// # Arguments
    ///
    /// * `base_url` - Ledger service root, e.g. `http://localhost:8545/api`
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> LedgerResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/tournaments", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChampionLedger for HttpChampionLedger {
    async fn record(&self, entry: &ChampionEntry) -> LedgerResult<LedgerReceipt> {
        let response = self.client.post(&self.endpoint).json(entry).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<LedgerReceipt>().await?)
    }
}
