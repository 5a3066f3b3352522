//! Tournament error types.

use thiserror::Error;

use crate::bracket::{MatchId, PlayerId};
use crate::history::LedgerError;
use crate::store::StoreError;

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Fewer than two players, or too many to size a bracket for
    #[error("Invalid player count: {0}")]
    InvalidPlayerCount(usize),

    /// Explicit seeding is not a power of two or holds no real player
    #[error("Invalid seeding of {0} slots")]
    InvalidSeeding(usize),

    /// No match with this id in the bracket
    #[error("Match not found: {0}")]
    NotFound(MatchId),

    /// Match is pending, bye-resolved, or otherwise not playable
    #[error("Match {0} is not ready for a result")]
    NotReady(MatchId),

    /// Submitted winner is not one of the match's occupants
    #[error("Player {winner_id} is not playing in match {match_id}")]
    UnknownWinner {
        match_id: MatchId,
        winner_id: PlayerId,
    },

    /// Match already has a different result
    #[error("Match {0} already has a different result")]
    AlreadyDecided(MatchId),

    /// No tournament in progress under this key
    #[error("No tournament in progress: {0}")]
    NoTournament(String),

    /// Tournament under this key was replaced while a result was being applied
    #[error("Tournament {0} was replaced by a new one")]
    Superseded(String),

    /// Persistence read or write failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// External champion ledger call failed
    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(#[from] LedgerError),
}

impl From<StoreError> for TournamentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Superseded(key) => TournamentError::Superseded(key),
            other => TournamentError::StoreUnavailable(other),
        }
    }
}

impl TournamentError {
    /// Get a client-safe error message that doesn't leak storage or ledger details
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::StoreUnavailable(_) => "Tournament storage unavailable".to_string(),
            TournamentError::LedgerUnavailable(_) => "Champion ledger unavailable".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_message_hides_store_details() {
        let err = TournamentError::from(StoreError::Timeout(Duration::from_secs(5)));
        assert_eq!(err.client_message(), "Tournament storage unavailable");
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_superseded_store_write_is_not_an_outage() {
        let err = TournamentError::from(StoreError::Superseded("cup".to_string()));
        assert!(matches!(err, TournamentError::Superseded(ref key) if key == "cup"));
        assert_eq!(err.client_message(), "Tournament cup was replaced by a new one");
    }

    #[test]
    fn test_client_message_passes_validation_errors() {
        let err = TournamentError::UnknownWinner {
            match_id: MatchId(0),
            winner_id: 9,
        };
        assert_eq!(err.client_message(), "Player 9 is not playing in match #0");
    }
}
