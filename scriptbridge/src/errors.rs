//! Error types for scriptbridge.
//!
//! Two families live here: [`BridgeError`] for failures of the bridge itself
//! (a misconfigured host, a rejected concurrent run) and [`InterpreterError`]
//! for whatever the interpreter raised during a run. Interpreter errors never
//! cross the orchestrator boundary as errors; they are turned into a message
//! by [`normalize`] and carried by `ExecutionOutcome::Failed`.

use crate::core::RunId;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

/// Message used when an interpreter error has no usable text.
pub const UNKNOWN_INTERPRETER_ERROR: &str = "<unknown interpreter error>";

/// The main error type for bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A required host surface (display surface, document) is missing.
    ///
    /// This signals a misconfigured host and is never retried.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// A run was requested while another run on the same orchestrator was
    /// still in flight.
    #[error("A run is already in flight: {active}")]
    RunInFlight {
        /// The run currently holding the orchestrator.
        active: RunId,
    },

    /// The download host could not trigger an export.
    #[error("Export failed: {0}")]
    Export(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Creates a precondition failure.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    /// Returns true if this error signals a misconfigured host.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// An error raised by the interpreter during a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpreterError {
    /// A structured exception with a category and a message.
    #[error("{kind}: {message}{}", line_suffix(*line))]
    Exception {
        /// Error category, e.g. `NameError`.
        kind: String,
        /// Human-readable message.
        message: String,
        /// Source line the error was raised on, when known.
        line: Option<u32>,
    },

    /// A raised value that is not a structured error, already rendered to text.
    #[error("{0}")]
    Raw(String),

    /// The interpreter's own work panicked.
    #[error("InternalError: {0}")]
    Panicked(String),
}

impl InterpreterError {
    /// Creates an exception without line information.
    pub fn exception(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Exception {
            kind: kind.into(),
            message: message.into(),
            line: None,
        }
    }

    /// Creates an exception raised on a known source line.
    pub fn exception_at(kind: impl Into<String>, message: impl Into<String>, line: u32) -> Self {
        Self::Exception {
            kind: kind.into(),
            message: message.into(),
            line: Some(line),
        }
    }

    /// Creates an error from a raw raised value.
    pub fn raw(value: impl Into<String>) -> Self {
        Self::Raw(value.into())
    }
}

fn line_suffix(line: Option<u32>) -> String {
    line.map(|n| format!(" on line {n}")).unwrap_or_default()
}

/// Capability of rendering a raised value as text.
///
/// Anything implementing [`fmt::Display`] is stringifiable.
pub trait Stringifiable {
    /// Renders the value as human-readable text.
    fn stringify(&self) -> String;
}

impl<T: fmt::Display + ?Sized> Stringifiable for T {
    fn stringify(&self) -> String {
        self.to_string()
    }
}

/// Converts an interpreter error into a single human-readable message.
///
/// Never panics. Empty renderings and renderings that panic fall back to
/// [`UNKNOWN_INTERPRETER_ERROR`].
pub fn normalize<E: Stringifiable + ?Sized>(error: &E) -> String {
    match catch_unwind(AssertUnwindSafe(|| error.stringify())) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => UNKNOWN_INTERPRETER_ERROR.to_string(),
        Err(_) => {
            tracing::warn!("Interpreter error rendering panicked");
            UNKNOWN_INTERPRETER_ERROR.to_string()
        }
    }
}
