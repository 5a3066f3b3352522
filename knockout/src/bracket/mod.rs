//! Bracket shape, addressing and entities.
//!
//! - [`sizing`]: player count to bracket size, byes and rounds
//! - [`addressing`]: (round, slot) to match id, feeder slots and round names
//! - [`entities`]: players, matches and results

pub mod addressing;
pub mod entities;
pub mod sizing;

pub use addressing::{feeders, locate, match_id, matches_in_round, next_slot, round_name};
pub use entities::{BYE_NAME, Match, MatchId, MatchResult, MatchState, Player, PlayerId, Side};
pub use sizing::{BracketSize, MIN_PLAYERS};
