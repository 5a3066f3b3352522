//! Round-0 seeding by uniform shuffle of players and byes.

use super::random::RandomSource;
use crate::bracket::{BracketSize, Player, PlayerId};

/// Builds the ordered round-0 occupant list for a bracket.
pub struct Seeder;

impl Seeder {
    /// Players `1..=player_count` followed by byes `-1, -2, ...`, unshuffled.
    pub fn roster(size: &BracketSize) -> Vec<Player> {
        let players = (1..=size.player_count as PlayerId)
            .map(|id| Player::new(id, format!("Player {id}")));
        let byes = (1..=size.byes as PlayerId).map(|n| Player::bye(-n));
        players.chain(byes).collect()
    }

    /// The roster in uniformly random order. Byes are shuffled together with
    /// real players; nothing places them specially.
    ///
    /// # Arguments
    ///
    /// * `size` - Bracket shape to seed
    /// * `rng` - Randomness source consumed by the shuffle
    ///
    /// # Returns
    ///
    /// * `Vec<Player>` - `bracket_size` occupants, assigned left to right to round-0 slots
    pub fn seed<R: RandomSource + ?Sized>(size: &BracketSize, rng: &mut R) -> Vec<Player> {
        let mut occupants = Self::roster(size);
        shuffle(&mut occupants, rng);
        occupants
    }
}

/// Fisher-Yates shuffle driven by a [`RandomSource`].
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = pick_index(rng.next_f64(), i + 1);
        items.swap(i, j);
    }
}

/// Map a float in `[0, 1)` onto `0..bound`.
fn pick_index(value: f64, bound: usize) -> usize {
    let idx = (value * bound as f64) as usize;
    idx.min(bound - 1)
}
