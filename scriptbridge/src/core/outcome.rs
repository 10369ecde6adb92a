//! Terminal outcome of a run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The result of one run.
///
/// Exactly one outcome is produced per run. Interpreter failures are carried
/// as a normalized message, never as an error value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// Interpretation finished without an unhandled error.
    Completed,
    /// Interpretation raised an unhandled error.
    Failed {
        /// The normalized error message (category and text).
        message: String,
    },
}

impl ExecutionOutcome {
    /// Creates a failed outcome.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Returns true if the run completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true if the run failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns the failure message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Completed => None,
            Self::Failed { message } => Some(message.as_str()),
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Failed { message } => write!(f, "failed: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_completed() {
        let outcome = ExecutionOutcome::Completed;
        assert!(outcome.is_completed());
        assert!(!outcome.is_failed());
        assert_eq!(outcome.message(), None);
    }

    #[test]
    fn test_failed_carries_message() {
        let outcome = ExecutionOutcome::failed("NameError: x is not defined");
        assert!(outcome.is_failed());
        assert_eq!(outcome.message(), Some("NameError: x is not defined"));
        assert_eq!(outcome.to_string(), "failed: NameError: x is not defined");
    }

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_value(ExecutionOutcome::failed("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"status": "failed", "message": "boom"}));

        let json = serde_json::to_value(ExecutionOutcome::Completed).unwrap();
        assert_eq!(json, serde_json::json!({"status": "completed"}));
    }
}
