//! Unified review-job state types.
//!
//! The job record, its lifecycle state machine, the progress tracker,
//! and the snapshot/result shapes callers observe. Everything here is a
//! plain value; the engine guards it with the job's mutex.

pub mod progress;
pub mod types;

pub use progress::{ProgressSnapshot, ProgressTracker};
pub use types::{
    summarize, JobState, ReviewInput, ReviewJob, ReviewResult, ReviewSummary, StatusSnapshot,
    Tally,
};
