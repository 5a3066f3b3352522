//! # Knockout
//!
//! A single-elimination tournament bracket engine.
//!
//! Given a player count, the engine sizes a power-of-two bracket, pads it with
//! byes, seeds round 0 by uniform shuffle, and then advances winners round by
//! round as results are reported until one champion remains. Matches against
//! a bye resolve on their own, including byes that cascade through later
//! rounds.
//!
//! ## Core Modules
//!
//! - [`bracket`]: Sizing, match addressing, and the player/match entities
//! - [`seeding`]: Round-0 shuffle over an injected randomness source
//! - [`tournament`]: Progression engine and the keyed tournament manager
//! - [`store`]: Where live tournaments are kept (memory or PostgreSQL)
//! - [`history`]: Match history and champion ledger ports
//! - [`db`]: PostgreSQL pool, schema, and query timeouts
//!
//! ## Example
//!
//! ```
//! use knockout::{SeededRandom, Tournament};
//!
//! let cup = Tournament::new(5, &mut SeededRandom::new(7)).unwrap();
//! assert_eq!(cup.bracket_size(), 8);
//! assert_eq!(cup.byes(), 3);
//! assert_eq!(cup.rounds_count(), 3);
//! ```

/// Bracket geometry and entities.
pub mod bracket;
pub use bracket::{BracketSize, Match, MatchId, MatchState, Player, PlayerId};

/// Database connection and schema.
pub mod db;

/// Match history and champion ledger.
pub mod history;

/// Round-0 seeding.
pub mod seeding;
pub use seeding::{RandomSource, Randomness, SeededRandom, ThreadRandom};

/// Tournament persistence.
pub mod store;
pub use store::{MemoryTournamentStore, PgTournamentStore, TournamentStore};

/// Progression engine and manager.
pub mod tournament;
pub use tournament::{
    Submission, SubmitOutcome, Tournament, TournamentError, TournamentManager, TournamentResult,
    TournamentStatus,
};
