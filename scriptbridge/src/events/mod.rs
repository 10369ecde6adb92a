//! Run lifecycle observers.
//!
//! The orchestrator reports `run.started`, `run.completed`, `run.failed` and
//! `run.rejected` events to a [`RunObserver`] for logging and monitoring.

mod observer;

pub use observer::{CollectingRunObserver, LoggingRunObserver, NoOpRunObserver, RunObserver};

/// Emitted when a run starts.
pub const RUN_STARTED: &str = "run.started";
/// Emitted when a run completes.
pub const RUN_COMPLETED: &str = "run.completed";
/// Emitted when a run fails.
pub const RUN_FAILED: &str = "run.failed";
/// Emitted when a run is refused before starting.
pub const RUN_REJECTED: &str = "run.rejected";
