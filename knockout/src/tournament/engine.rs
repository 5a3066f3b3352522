//! Bracket progression state machine.
//!
//! A [`Tournament`] owns every match of a single-elimination bracket. It is
//! mutated only by recording results; each resolution writes the winner into
//! the next round, and any match that ends up facing a bye resolves on the
//! spot. Propagation is synchronous, so once every playable match has a
//! result the bracket always converges on exactly one champion.

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use super::errors::{TournamentError, TournamentResult};
use crate::bracket::{
    BracketSize, Match, MatchId, MatchResult, MatchState, Player, PlayerId, Side, addressing,
};
use crate::seeding::{RandomSource, Seeder};

/// Overall progress of a tournament
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    InProgress,
    ChampionDecided,
}

/// Outcome of an accepted result submission
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Submission {
    /// Result stored and propagated
    Recorded,
    /// Identical result was already stored; nothing changed
    Unchanged,
}

/// A single-elimination tournament and all of its matches.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Tournament {
    player_count: usize,
    bracket_size: usize,
    rounds: Vec<Vec<Match>>,
    champion: Option<Player>,
    generation: Uuid,
    version: u64,
    created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a tournament for `player_count` players, seeded by `rng`.
    ///
    /// Bye matches in the first round resolve immediately.
    ///
    /// # Errors
    ///
    /// * `TournamentError::InvalidPlayerCount` - fewer than two players
    pub fn new<R: RandomSource + ?Sized>(
        player_count: usize,
        rng: &mut R,
    ) -> TournamentResult<Self> {
        let size = BracketSize::for_players(player_count)?;
        let occupants = Seeder::seed(&size, rng);
        Self::build(size, occupants)
    }

    /// Create a tournament from an explicit round-0 order.
    ///
    /// The occupant list must have a power-of-two length of at least two,
    /// distinct ids, and at least one real player.
    ///
    /// # Errors
    ///
    /// * `TournamentError::InvalidSeeding` - the occupant list breaks one of the rules above
    pub fn from_seeding(occupants: Vec<Player>) -> TournamentResult<Self> {
        let slots = occupants.len();
        let real = occupants.iter().filter(|p| !p.is_bye).count();
        let distinct: HashSet<PlayerId> = occupants.iter().map(|p| p.id).collect();

        if slots < 2 || !slots.is_power_of_two() || real == 0 || distinct.len() != slots {
            return Err(TournamentError::InvalidSeeding(slots));
        }

        Self::build(BracketSize::from_parts(real, slots), occupants)
    }

    fn build(size: BracketSize, occupants: Vec<Player>) -> TournamentResult<Self> {
        let mut rounds = Vec::with_capacity(size.rounds);
        for round in 0..size.rounds {
            let count = size.matches_in_round(round);
            let mut matches = Vec::with_capacity(count);
            for slot in 0..count {
                let id = addressing::match_id(size.rounds, round, slot)
                    .ok_or(TournamentError::InvalidPlayerCount(size.player_count))?;
                matches.push(Match::new(id, round, slot));
            }
            rounds.push(matches);
        }

        for (idx, occupant) in occupants.into_iter().enumerate() {
            let side = if idx % 2 == 0 { Side::A } else { Side::B };
            rounds[0][idx / 2].place(side, occupant);
        }

        let mut tournament = Self {
            player_count: size.player_count,
            bracket_size: size.bracket_size,
            rounds,
            champion: None,
            generation: Uuid::new_v4(),
            version: 0,
            created_at: Utc::now(),
        };

        for slot in 0..size.matches_in_round(0) {
            tournament.settle(0, slot);
        }

        info!(
            "Created bracket: {} players, {} slots, {} byes, {} rounds",
            size.player_count, size.bracket_size, size.byes, size.rounds
        );

        Ok(tournament)
    }

    /// Record the result of a ready match and propagate its winner.
    ///
    /// # Arguments
    ///
    /// * `match_id` - Match being reported
    /// * `winner_id` - Id of the winning occupant
    /// * `score_a` - Score of occupant A
    /// * `score_b` - Score of occupant B
    ///
    /// # Returns
    ///
    /// * `Submission::Recorded` - result stored, winner advanced
    /// * `Submission::Unchanged` - the same result was already stored
    ///
    /// # Errors
    ///
    /// * `TournamentError::NotFound` - no such match
    /// * `TournamentError::NotReady` - match pending or decided by a bye
    /// * `TournamentError::UnknownWinner` - winner is not an occupant
    /// * `TournamentError::AlreadyDecided` - a different result already exists
    ///
    /// Rejected submissions leave the tournament untouched.
    pub fn submit_result(
        &mut self,
        match_id: MatchId,
        winner_id: PlayerId,
        score_a: u32,
        score_b: u32,
    ) -> TournamentResult<Submission> {
        let (round, slot) = self.position(match_id)?;
        let current = &self.rounds[round][slot];

        match (current.state(), &current.result) {
            (MatchState::Completed, Some(existing)) => {
                return if existing.same_outcome(winner_id, score_a, score_b) {
                    Ok(Submission::Unchanged)
                } else {
                    Err(TournamentError::AlreadyDecided(match_id))
                };
            }
            (MatchState::Ready, _) => {}
            _ => return Err(TournamentError::NotReady(match_id)),
        }

        let winner = match current.occupants() {
            Some((a, _)) if a.id == winner_id => a.clone(),
            Some((_, b)) if b.id == winner_id => b.clone(),
            _ => {
                return Err(TournamentError::UnknownWinner {
                    match_id,
                    winner_id,
                });
            }
        };

        debug!("Match {match_id} won by {winner} ({score_a}-{score_b})");
        self.rounds[round][slot].result = Some(MatchResult::new(winner_id, score_a, score_b));
        self.version += 1;

        if let Some((next_round, next_slot)) = self.advance(round, slot, winner) {
            self.settle(next_round, next_slot);
        }

        Ok(Submission::Recorded)
    }

    /// Resolve bye matches starting at (`round`, `slot`), following the
    /// winner forward for as long as it keeps meeting byes.
    fn settle(&mut self, mut round: usize, mut slot: usize) {
        loop {
            let current = &mut self.rounds[round][slot];
            if current.result.is_some() {
                return;
            }

            let winner = match current.occupants() {
                Some((a, b)) if b.is_bye => a.clone(),
                Some((a, b)) if a.is_bye => b.clone(),
                _ => return,
            };

            debug!("Match {} resolved by bye: {} advances", current.id, winner);
            current.result = Some(MatchResult::by_bye(winner.id));

            match self.advance(round, slot, winner) {
                Some((next_round, next_slot)) => {
                    round = next_round;
                    slot = next_slot;
                }
                None => return,
            }
        }
    }

    /// Move `winner` of (`round`, `slot`) into the next round, or crown them
    /// if this was the final. Returns the match the winner moved into.
    fn advance(&mut self, round: usize, slot: usize, winner: Player) -> Option<(usize, usize)> {
        match addressing::next_slot(self.rounds.len(), round, slot) {
            Some((next_round, next_slot, side)) => {
                self.rounds[next_round][next_slot].place(side, winner);
                Some((next_round, next_slot))
            }
            None => {
                info!("Champion decided: {} (id {})", winner.name, winner.id);
                self.champion = Some(winner);
                None
            }
        }
    }

    fn position(&self, match_id: MatchId) -> TournamentResult<(usize, usize)> {
        addressing::locate(self.rounds.len(), match_id)
            .filter(|&(round, slot)| slot < self.rounds[round].len())
            .ok_or(TournamentError::NotFound(match_id))
    }

    /// Look up a match by id.
    pub fn get_match(&self, match_id: MatchId) -> TournamentResult<&Match> {
        let (round, slot) = self.position(match_id)?;
        Ok(&self.rounds[round][slot])
    }

    /// Current state of a match.
    pub fn match_state(&self, match_id: MatchId) -> TournamentResult<MatchState> {
        self.get_match(match_id).map(Match::state)
    }

    /// Matches waiting for an externally played result.
    pub fn playable_matches(&self) -> Vec<&Match> {
        self.matches()
            .filter(|m| m.state() == MatchState::Ready)
            .collect()
    }

    /// All matches, round-major.
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.rounds.iter().flatten()
    }

    pub fn rounds(&self) -> &[Vec<Match>] {
        &self.rounds
    }

    pub fn round_name(&self, round: usize) -> String {
        addressing::round_name(self.rounds.len(), round)
    }

    pub fn champion(&self) -> Option<&Player> {
        self.champion.as_ref()
    }

    pub fn status(&self) -> TournamentStatus {
        if self.champion.is_some() {
            TournamentStatus::ChampionDecided
        } else {
            TournamentStatus::InProgress
        }
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn bracket_size(&self) -> usize {
        self.bracket_size
    }

    pub fn byes(&self) -> usize {
        self.bracket_size - self.player_count
    }

    pub fn rounds_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn total_matches(&self) -> usize {
        self.rounds.iter().map(Vec::len).sum()
    }

    /// Incremented on every recorded result; used for optimistic concurrency.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Identity of this bracket, fixed at creation. A tournament that
    /// supersedes another under the same key always has a different one.
    pub fn generation(&self) -> Uuid {
        self.generation
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the shape matches what addressing expects. Used to reject
    /// corrupted state coming back from storage.
    pub fn is_well_formed(&self) -> bool {
        if self.bracket_size < 2
            || !self.bracket_size.is_power_of_two()
            || self.player_count > self.bracket_size
        {
            return false;
        }

        let rounds = self.bracket_size.trailing_zeros() as usize;
        self.rounds.len() == rounds
            && self.rounds.iter().enumerate().all(|(round, matches)| {
                matches.len() == addressing::matches_in_round(rounds, round)
                    && matches.iter().enumerate().all(|(slot, m)| {
                        m.round == round
                            && m.slot == slot
                            && addressing::match_id(rounds, round, slot) == Some(m.id)
                    })
            })
    }
}
