//! Bracket entities: players, matches and results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Player ID type. Real players are positive, byes are negative.
pub type PlayerId = i64;

/// Display name given to every bye occupant.
pub const BYE_NAME: &str = "BYE";

/// A bracket occupant, either a real player or a bye placeholder.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_bye: bool,
}

impl Player {
    /// Create a real player.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_bye: false,
        }
    }

    /// Create a bye placeholder.
    pub fn bye(id: PlayerId) -> Self {
        Self {
            id,
            name: BYE_NAME.to_string(),
            is_bye: true,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Stable match identifier, derived from the match's position in the bracket.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct MatchId(pub u32);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of a match an occupant sits on.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Side {
    A,
    B,
}

/// Final outcome of a match. Written once, never amended.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MatchResult {
    pub winner_id: PlayerId,
    pub score_a: u32,
    pub score_b: u32,
    pub recorded_at: DateTime<Utc>,
}

impl MatchResult {
    pub fn new(winner_id: PlayerId, score_a: u32, score_b: u32) -> Self {
        Self {
            winner_id,
            score_a,
            score_b,
            recorded_at: Utc::now(),
        }
    }

    /// Result derived from a bye; no game was played.
    pub fn by_bye(winner_id: PlayerId) -> Self {
        Self::new(winner_id, 0, 0)
    }

    /// Whether `other` reports the same outcome, ignoring when it was recorded.
    pub fn same_outcome(&self, winner_id: PlayerId, score_a: u32, score_b: u32) -> bool {
        self.winner_id == winner_id && self.score_a == score_a && self.score_b == score_b
    }
}

/// Derived lifecycle state of a single match.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    /// An occupant slot is still empty
    Pending,
    /// Both occupants are real players and no result exists yet
    Ready,
    /// At least one occupant is a bye and the result was derived
    ByeResolved,
    /// A played result was recorded
    Completed,
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::ByeResolved => "bye-resolved",
            Self::Completed => "completed",
        };
        write!(f, "{repr}")
    }
}

/// One match of the bracket.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Match {
    pub id: MatchId,
    pub round: usize,
    pub slot: usize,
    pub occupant_a: Option<Player>,
    pub occupant_b: Option<Player>,
    pub result: Option<MatchResult>,
}

impl Match {
    pub fn new(id: MatchId, round: usize, slot: usize) -> Self {
        Self {
            id,
            round,
            slot,
            occupant_a: None,
            occupant_b: None,
            result: None,
        }
    }

    /// Both occupants, if both slots have been filled.
    pub fn occupants(&self) -> Option<(&Player, &Player)> {
        match (&self.occupant_a, &self.occupant_b) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    pub fn has_bye(&self) -> bool {
        self.occupant_a.as_ref().is_some_and(|p| p.is_bye)
            || self.occupant_b.as_ref().is_some_and(|p| p.is_bye)
    }

    pub fn state(&self) -> MatchState {
        match (&self.result, self.occupants()) {
            (Some(_), _) if self.has_bye() => MatchState::ByeResolved,
            (Some(_), _) => MatchState::Completed,
            (None, Some(_)) if !self.has_bye() => MatchState::Ready,
            _ => MatchState::Pending,
        }
    }

    /// The occupant who won, once a result exists.
    pub fn winner(&self) -> Option<&Player> {
        let winner_id = self.result.as_ref()?.winner_id;
        [&self.occupant_a, &self.occupant_b]
            .into_iter()
            .flatten()
            .find(|p| p.id == winner_id)
    }

    pub(crate) fn place(&mut self, side: Side, occupant: Player) {
        match side {
            Side::A => self.occupant_a = Some(occupant),
            Side::B => self.occupant_b = Some(occupant),
        }
    }
}
