//! Persistence of run output: the match report and the run log.

pub mod local;
pub mod run_log;

// Re-export for convenience
pub use local::{LocalStorage, WriteMetadata};
pub use run_log::RunLog;
