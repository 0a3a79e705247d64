//! Dual-phase vote ledger.

pub mod ledger;

pub use ledger::VoteLedger;
