//! Testing utilities for code built on scriptbridge.
//!
//! This module provides:
//! - A scripted interpreter driven by a line-oriented test script
//! - A download host recording every export
//! - An output collector and outcome assertions

mod assertions;
mod hosts;
mod interpreter;

pub use assertions::{assert_completed, assert_failed, assert_failed_with};
pub use hosts::{CollectingOutput, RecordedDownload, RecordingDownloadHost};
pub use interpreter::ScriptedInterpreter;
