//! Bracket sizing: player count to bracket size, byes and rounds.

use serde::{Deserialize, Serialize};

use crate::tournament::errors::{TournamentError, TournamentResult};

/// Smallest number of players a bracket can be built for.
pub const MIN_PLAYERS: usize = 2;

/// Shape of a single-elimination bracket.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BracketSize {
    /// Real players entered
    pub player_count: usize,
    /// Round-0 slots, always a power of two
    pub bracket_size: usize,
    /// Placeholder occupants padding the bracket
    pub byes: usize,
    /// Number of rounds, `log2(bracket_size)`
    pub rounds: usize,
}

impl BracketSize {
    /// Size a bracket for `player_count` players.
    ///
    /// # Errors
    ///
    /// * `TournamentError::InvalidPlayerCount` - fewer than two players, or a
    ///   count whose bracket would not fit in `usize`
    pub fn for_players(player_count: usize) -> TournamentResult<Self> {
        if player_count < MIN_PLAYERS {
            return Err(TournamentError::InvalidPlayerCount(player_count));
        }

        let bracket_size = player_count
            .checked_next_power_of_two()
            .ok_or(TournamentError::InvalidPlayerCount(player_count))?;

        Ok(Self::from_parts(player_count, bracket_size))
    }

    /// Shape of an already-seeded bracket of `bracket_size` slots holding
    /// `player_count` real players. `bracket_size` must be a power of two.
    pub(crate) fn from_parts(player_count: usize, bracket_size: usize) -> Self {
        Self {
            player_count,
            bracket_size,
            byes: bracket_size - player_count,
            rounds: bracket_size.trailing_zeros() as usize,
        }
    }

    /// Number of matches played in `round`.
    pub fn matches_in_round(&self, round: usize) -> usize {
        if round >= self.rounds {
            0
        } else {
            self.bracket_size >> (round + 1)
        }
    }

    /// Total matches across the bracket.
    pub fn total_matches(&self) -> usize {
        self.bracket_size - 1
    }
}
