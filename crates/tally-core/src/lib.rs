// Library root: the scoring engine and the session records it consumes.
//
// Every function in this crate is a pure computation over in-memory records.
// Callers own their state and replace it wholesale; nothing here holds on to
// anything between calls.

pub mod history;
pub mod leaderboard;
pub mod roster;
pub mod scoring;
pub mod session;
pub mod sort;
