//! The critic analysis engine.
//!
//! A [`ReviewRegistry`] owns review jobs: it validates input, starts a
//! background executor per job, and exposes the status/control/result
//! operations. Within a job, analyzer batches run concurrently under a
//! semaphore; pause and cancel reach the executor through a per-job
//! control signal.

pub mod cache;
pub mod classify;
pub mod config;
pub mod control;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod plan;
pub mod registry;

pub use classify::classify;
pub use config::EngineConfig;
pub use control::ControlSignal;
pub use error::EngineError;
pub use registry::ReviewRegistry;
