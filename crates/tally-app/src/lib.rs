// Library root: the collaborators around the scoring engine (config, session
// log, CSV export, app state, text rendering) exposed for the binary and
// integration tests.

pub mod cli;
pub mod config;
pub mod export;
pub mod log;
pub mod render;
pub mod state;
