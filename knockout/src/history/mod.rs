//! Durable history and audit collaborators.
//!
//! Two ports sit beside the live bracket state, never in place of it:
//!
//! - [`MatchRecorder`]: one row per externally played match
//! - [`ChampionLedger`]: one notarized entry per decided tournament
//!
//! Failures here are logged by the caller and never roll back the bracket.

pub mod errors;
pub mod ledger;
pub mod recorder;

pub use errors::{LedgerError, LedgerResult, RecorderError, RecorderResult};
pub use ledger::{ChampionEntry, ChampionLedger, HttpChampionLedger, LedgerReceipt};
pub use recorder::{LogMatchRecorder, MatchRecord, MatchRecorder, PgMatchRecorder};
