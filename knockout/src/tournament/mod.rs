//! Single-elimination tournaments.
//!
//! This module provides:
//! - [`Tournament`]: the bracket progression state machine
//! - [`TournamentManager`]: keyed tournaments over a [`crate::store::TournamentStore`]
//!   with match history and champion notarization
//! - [`TournamentError`]: every rejection a caller can see
//!
//! ## Example
//!
//! ```
//! use knockout::bracket::{MatchId, Player};
//! use knockout::tournament::{Tournament, TournamentStatus};
//!
//! let mut cup = Tournament::from_seeding(vec![
//!     Player::new(1, "Player 1"),
//!     Player::new(2, "Player 2"),
//! ])
//! .unwrap();
//!
//! cup.submit_result(MatchId(0), 2, 1, 3).unwrap();
//! assert_eq!(cup.status(), TournamentStatus::ChampionDecided);
//! assert_eq!(cup.champion().map(|p| p.id), Some(2));
//! ```

pub mod engine;
pub mod errors;
pub mod manager;

pub use engine::{Submission, Tournament, TournamentStatus};
pub use errors::{TournamentError, TournamentResult};
pub use manager::{SubmitOutcome, TournamentManager};
