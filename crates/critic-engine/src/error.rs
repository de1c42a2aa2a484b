//! Registry-facing errors.

use critic_state::JobState;
use thiserror::Error;

/// Errors surfaced to callers of registry operations. Driver-level
/// trouble never appears here; it accumulates on the job as warnings.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Rejected at `create`: bad root, no analyzers, no categories.
    #[error("illegal input: {0}")]
    IllegalInput(String),

    /// A control operation in an incompatible state. The job is
    /// unchanged.
    #[error("cannot {operation} a {state} job")]
    IllegalState {
        operation: &'static str,
        state: JobState,
    },

    /// Unknown job id.
    #[error("no such job: {0}")]
    NotFound(String),
}
