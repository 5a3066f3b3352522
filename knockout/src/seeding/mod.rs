//! Round-0 seeding.
//!
//! Players and byes are shuffled together with a Fisher-Yates shuffle driven
//! by an injected [`RandomSource`], so tests can pin the permutation.
//!
//! ## Example
//!
//! ```
//! use knockout::bracket::BracketSize;
//! use knockout::seeding::{SeededRandom, Seeder};
//!
//! let size = BracketSize::for_players(5).unwrap();
//! let occupants = Seeder::seed(&size, &mut SeededRandom::new(1));
//! assert_eq!(occupants.len(), 8);
//! ```

pub mod random;
pub mod seeder;

pub use random::{FixedSequence, RandomSource, Randomness, SeededRandom, ThreadRandom};
pub use seeder::{Seeder, shuffle};
