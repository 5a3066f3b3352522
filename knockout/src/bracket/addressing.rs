//! Deterministic mapping between bracket positions and match ids.
//!
//! Ids are assigned round-major then slot-major, starting at 0 for the first
//! match of round 0 and ending at `bracket_size - 2` for the final. They depend
//! only on the bracket's shape, so results keyed by id stay valid across
//! reloads.

use super::entities::{MatchId, Side};

/// Number of matches in `round` of a bracket with `rounds` rounds.
pub fn matches_in_round(rounds: usize, round: usize) -> usize {
    if round >= rounds {
        0
    } else {
        1 << (rounds - round - 1)
    }
}

/// Id of the match at (`round`, `slot`), or `None` if the position is outside
/// the bracket.
pub fn match_id(rounds: usize, round: usize, slot: usize) -> Option<MatchId> {
    if slot >= matches_in_round(rounds, round) {
        return None;
    }
    let offset = (1usize << rounds) - (1usize << (rounds - round));
    u32::try_from(offset + slot).ok().map(MatchId)
}

/// Inverse of [`match_id`]: the (`round`, `slot`) position of `id`.
pub fn locate(rounds: usize, id: MatchId) -> Option<(usize, usize)> {
    let mut remaining = id.0 as usize;
    for round in 0..rounds {
        let count = matches_in_round(rounds, round);
        if remaining < count {
            return Some((round, remaining));
        }
        remaining -= count;
    }
    None
}

/// The two slots of round `round - 1` whose winners meet in (`round`, `slot`).
pub fn feeders(round: usize, slot: usize) -> Option<(usize, usize)> {
    if round == 0 {
        None
    } else {
        Some((2 * slot, 2 * slot + 1))
    }
}

/// Where the winner of (`round`, `slot`) goes next. `None` for the final.
pub fn next_slot(rounds: usize, round: usize, slot: usize) -> Option<(usize, usize, Side)> {
    if round + 1 >= rounds {
        return None;
    }
    let side = if slot % 2 == 0 { Side::A } else { Side::B };
    Some((round + 1, slot / 2, side))
}

/// Human-readable name of `round`.
pub fn round_name(rounds: usize, round: usize) -> String {
    match rounds.saturating_sub(round) {
        1 => "Finals".to_string(),
        2 => "Semifinals".to_string(),
        3 => "Quarterfinals".to_string(),
        _ => format!("Round {}", round + 1),
    }
}
