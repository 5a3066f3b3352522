//! Tournament manager: keyed tournaments over a store, with history and
//! champion notarization on the side.

use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

use super::engine::{Submission, Tournament};
use super::errors::{TournamentError, TournamentResult};
use crate::bracket::{Match, MatchId, Player, PlayerId};
use crate::history::{ChampionEntry, ChampionLedger, MatchRecord, MatchRecorder};
use crate::seeding::Randomness;
use crate::store::{StoreError, TournamentStore};

/// Attempts at load → apply → conditional save before giving up on a contended key.
const MAX_SUBMIT_ATTEMPTS: usize = 3;

/// Result of a submission through the manager
#[derive(Clone, Debug)]
pub struct SubmitOutcome {
    /// Tournament as stored after the submission
    pub tournament: Tournament,
    pub submission: Submission,
    /// True when this submission decided the champion
    pub crowned: bool,
}

/// Tournament manager
#[derive(Clone)]
pub struct TournamentManager {
    store: Arc<dyn TournamentStore>,
    recorder: Arc<dyn MatchRecorder>,
    ledger: Option<Arc<dyn ChampionLedger>>,
    randomness: Arc<Mutex<Randomness>>,
    notarizations: Arc<Mutex<JoinSet<()>>>,
}

impl TournamentManager {
    /// Create a new tournament manager with thread randomness and no ledger
    pub fn new(store: Arc<dyn TournamentStore>, recorder: Arc<dyn MatchRecorder>) -> Self {
        Self {
            store,
            recorder,
            ledger: None,
            randomness: Arc::new(Mutex::new(Randomness::default())),
            notarizations: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// Notarize champions on `ledger`
    pub fn with_ledger(mut self, ledger: Arc<dyn ChampionLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Seed new brackets from `randomness`
    pub fn with_randomness(mut self, randomness: Randomness) -> Self {
        self.randomness = Arc::new(Mutex::new(randomness));
        self
    }

    /// Create a tournament under `key`, superseding any tournament already there.
    pub async fn create_tournament(
        &self,
        key: &str,
        player_count: usize,
    ) -> TournamentResult<Tournament> {
        let tournament = {
            let mut rng = self.randomness.lock().await;
            Tournament::new(player_count, &mut *rng)?
        };

        self.store.save(key, &tournament).await?;

        info!(
            "Tournament {key} created: {} players, {} rounds",
            tournament.player_count(),
            tournament.rounds_count()
        );

        Ok(tournament)
    }

    /// Store a tournament built elsewhere (e.g. from an explicit seeding) under `key`.
    pub async fn install(&self, key: &str, tournament: &Tournament) -> TournamentResult<()> {
        self.store.save(key, tournament).await?;
        info!("Tournament {key} installed");
        Ok(())
    }

    /// Get the tournament stored under `key`
    pub async fn tournament(&self, key: &str) -> TournamentResult<Tournament> {
        self.store
            .load(key)
            .await?
            .ok_or_else(|| TournamentError::NoTournament(key.to_string()))
    }

    /// Get a single match
    pub async fn get_match(&self, key: &str, match_id: MatchId) -> TournamentResult<Match> {
        let tournament = self.tournament(key).await?;
        tournament.get_match(match_id).cloned()
    }

    /// Champion of the tournament under `key`, if decided
    pub async fn champion(&self, key: &str) -> TournamentResult<Option<Player>> {
        Ok(self.tournament(key).await?.champion().cloned())
    }

    /// Record a result for a match of the tournament under `key`.
    ///
    /// The stored tournament is only replaced if nobody else wrote it since it
    /// was loaded; on a conflict the submission is re-applied to the fresh
    /// state, so a racing duplicate ends up `Unchanged` or `AlreadyDecided`.
    ///
    /// Match history and champion notarization happen after the save and
    /// never undo it.
    ///
    /// # Errors
    ///
    /// * `TournamentError::NoTournament` - nothing stored under `key`
    /// * `TournamentError::Superseded` - another tournament was created under
    ///   `key` while the result was being applied; nothing is written
    /// * Any validation error from [`Tournament::submit_result`]
    /// * `TournamentError::StoreUnavailable` - load or save failed, or the key
    ///   stayed contended for every attempt
    pub async fn submit_result(
        &self,
        key: &str,
        match_id: MatchId,
        winner_id: PlayerId,
        score_a: u32,
        score_b: u32,
    ) -> TournamentResult<SubmitOutcome> {
        let mut attempt = 1;
        let mut generation = None;

        loop {
            let mut tournament = self.tournament(key).await?;
            let loaded_version = tournament.version();

            // A retry must keep applying to the bracket the first attempt saw
            if *generation.get_or_insert(tournament.generation()) != tournament.generation() {
                warn!("Tournament {key}: replaced while applying result for {match_id}");
                return Err(TournamentError::Superseded(key.to_string()));
            }
            let had_champion = tournament.champion().is_some();

            let submission = tournament.submit_result(match_id, winner_id, score_a, score_b)?;
            if submission == Submission::Unchanged {
                debug!("Tournament {key}: duplicate result for {match_id} ignored");
                return Ok(SubmitOutcome {
                    tournament,
                    submission,
                    crowned: false,
                });
            }

            match self
                .store
                .save_if_version(key, loaded_version, &tournament)
                .await
            {
                Ok(()) => {}
                Err(StoreError::VersionConflict {
                    expected, actual, ..
                }) if attempt < MAX_SUBMIT_ATTEMPTS => {
                    warn!(
                        "Tournament {key}: version conflict on {match_id} (expected {expected}, found {actual:?}), retrying"
                    );
                    attempt += 1;
                    continue;
                }
                Err(StoreError::Superseded(_)) => {
                    warn!("Tournament {key}: replaced while applying result for {match_id}");
                    return Err(TournamentError::Superseded(key.to_string()));
                }
                Err(e) => return Err(e.into()),
            }

            self.record_history(key, &tournament, match_id).await;

            let crowned = !had_champion && tournament.champion().is_some();
            if crowned {
                self.notarize(key, &tournament).await;
            }

            return Ok(SubmitOutcome {
                tournament,
                submission,
                crowned,
            });
        }
    }

    /// Tear down the tournament under `key`. Returns whether one existed.
    pub async fn reset(&self, key: &str) -> TournamentResult<bool> {
        let removed = self.store.remove(key).await?;
        if removed {
            info!("Tournament {key} reset");
        }
        Ok(removed)
    }

    /// Number of stored tournaments
    pub async fn active_count(&self) -> TournamentResult<usize> {
        Ok(self.store.count().await?)
    }

    /// Check the store is reachable
    pub async fn health_check(&self) -> TournamentResult<()> {
        Ok(self.store.health_check().await?)
    }

    /// Wait for every pending champion notarization to finish.
    pub async fn wait_for_ledger(&self) {
        let mut pending = self.notarizations.lock().await;
        while let Some(joined) = pending.join_next().await {
            if let Err(e) = joined {
                error!("Champion notarization task failed: {e}");
            }
        }
    }

    async fn record_history(&self, key: &str, tournament: &Tournament, match_id: MatchId) {
        let Some(record) = tournament
            .get_match(match_id)
            .ok()
            .and_then(|m| MatchRecord::from_match(key, m))
        else {
            return;
        };

        if let Err(e) = self.recorder.submit(&record).await {
            warn!("Tournament {key}: failed to record history for {match_id}: {e}");
        }
    }

    async fn notarize(&self, key: &str, tournament: &Tournament) {
        let (Some(ledger), Some(entry)) =
            (self.ledger.clone(), ChampionEntry::from_tournament(tournament))
        else {
            return;
        };

        let key = key.to_string();
        let mut pending = self.notarizations.lock().await;

        // Reap finished tasks so the set doesn't grow across tournaments
        while pending.try_join_next().is_some() {}

        pending.spawn(async move {
            match ledger.record(&entry).await {
                Ok(receipt) => info!(
                    "Tournament {key}: champion {} notarized as #{} ({})",
                    entry.winner_name, receipt.tournament_id, receipt.proof_ref
                ),
                Err(e) => error!(
                    "Tournament {key}: {}",
                    TournamentError::LedgerUnavailable(e)
                ),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{
        LedgerError, LedgerReceipt, LedgerResult, LogMatchRecorder, RecorderResult,
    };
    use crate::seeding::FixedSequence;
    use crate::store::MemoryTournamentStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingLedger {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ChampionLedger for CountingLedger {
        async fn record(&self, _entry: &ChampionEntry) -> LedgerResult<LedgerReceipt> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(LedgerError::Rejected {
                    status: 500,
                    body: "down".to_string(),
                });
            }
            Ok(LedgerReceipt {
                tournament_id: n as u64,
                proof_ref: format!("proof-{n}"),
            })
        }
    }

    #[derive(Default)]
    struct CountingRecorder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MatchRecorder for CountingRecorder {
        async fn submit(&self, _record: &MatchRecord) -> RecorderResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn manager() -> TournamentManager {
        TournamentManager::new(
            Arc::new(MemoryTournamentStore::new()),
            Arc::new(LogMatchRecorder),
        )
        .with_randomness(Randomness::from(FixedSequence::new(vec![0.999])))
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let mgr = manager();
        let created = mgr.create_tournament("cup", 4).await.unwrap();
        let fetched = mgr.tournament("cup").await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(mgr.active_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_player_count() {
        let mgr = manager();
        let err = mgr.create_tournament("cup", 1).await.unwrap_err();

        assert!(matches!(err, TournamentError::InvalidPlayerCount(1)));
        assert_eq!(mgr.active_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_tournament() {
        let mgr = manager();
        assert!(matches!(
            mgr.tournament("nope").await,
            Err(TournamentError::NoTournament(_))
        ));
        assert!(matches!(
            mgr.submit_result("nope", MatchId(0), 1, 1, 0).await,
            Err(TournamentError::NoTournament(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_persists_and_records_history() {
        let recorder = Arc::new(CountingRecorder::default());
        let mgr = TournamentManager::new(Arc::new(MemoryTournamentStore::new()), recorder.clone())
            .with_randomness(Randomness::from(FixedSequence::new(vec![0.999])));

        // 0.999 keeps the roster in order: match #0 is Player 1 vs Player 2
        mgr.create_tournament("cup", 4).await.unwrap();
        let outcome = mgr.submit_result("cup", MatchId(0), 1, 3, 1).await.unwrap();

        assert_eq!(outcome.submission, Submission::Recorded);
        assert!(!outcome.crowned);
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 1);

        let m = mgr.get_match("cup", MatchId(2)).await.unwrap();
        assert_eq!(m.occupant_a.map(|p| p.id), Some(1));

        // Duplicate does not write history again
        let again = mgr.submit_result("cup", MatchId(0), 1, 3, 1).await.unwrap();
        assert_eq!(again.submission, Submission::Unchanged);
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_champion_notarized_once() {
        let ledger = Arc::new(CountingLedger::default());
        let mgr = manager().with_ledger(ledger.clone());

        mgr.create_tournament("cup", 2).await.unwrap();
        let outcome = mgr.submit_result("cup", MatchId(0), 2, 0, 2).await.unwrap();
        assert!(outcome.crowned);

        mgr.submit_result("cup", MatchId(0), 2, 0, 2).await.unwrap();
        mgr.wait_for_ledger().await;

        assert_eq!(ledger.calls.load(Ordering::SeqCst), 1);
        assert_eq!(mgr.champion("cup").await.unwrap().map(|p| p.id), Some(2));
    }

    #[tokio::test]
    async fn test_ledger_failure_keeps_champion() {
        let ledger = Arc::new(CountingLedger {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let mgr = manager().with_ledger(ledger.clone());

        mgr.create_tournament("cup", 2).await.unwrap();
        mgr.submit_result("cup", MatchId(0), 1, 2, 0).await.unwrap();
        mgr.wait_for_ledger().await;

        assert_eq!(ledger.calls.load(Ordering::SeqCst), 1);
        assert_eq!(mgr.champion("cup").await.unwrap().map(|p| p.id), Some(1));
    }

    #[tokio::test]
    async fn test_reset() {
        let mgr = manager();
        mgr.create_tournament("cup", 3).await.unwrap();

        assert!(mgr.reset("cup").await.unwrap());
        assert!(!mgr.reset("cup").await.unwrap());
        assert!(matches!(
            mgr.champion("cup").await,
            Err(TournamentError::NoTournament(_))
        ));
    }

    #[tokio::test]
    async fn test_create_supersedes_existing() {
        let mgr = manager();
        mgr.create_tournament("cup", 2).await.unwrap();
        mgr.submit_result("cup", MatchId(0), 1, 1, 0).await.unwrap();

        let fresh = mgr.create_tournament("cup", 8).await.unwrap();
        assert_eq!(fresh.player_count(), 8);
        assert!(mgr.champion("cup").await.unwrap().is_none());
        assert_eq!(mgr.active_count().await.unwrap(), 1);
    }
}
