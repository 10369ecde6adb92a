//! Test assertions for run outcomes.

use crate::core::ExecutionOutcome;

/// Asserts that the run completed.
pub fn assert_completed(outcome: &ExecutionOutcome) {
    assert!(
        outcome.is_completed(),
        "Expected run to complete, got: {outcome}"
    );
}

/// Asserts that the run failed.
pub fn assert_failed(outcome: &ExecutionOutcome) {
    assert!(outcome.is_failed(), "Expected run to fail, got: {outcome}");
}

/// Asserts that the run failed with a message containing `needle`.
pub fn assert_failed_with(outcome: &ExecutionOutcome, needle: &str) {
    match outcome.message() {
        Some(message) => assert!(
            message.contains(needle),
            "Expected failure message containing '{needle}', got '{message}'"
        ),
        None => panic!("Expected run to fail with '{needle}', but it completed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_completed() {
        assert_completed(&ExecutionOutcome::Completed);
    }

    #[test]
    fn test_assert_failed_with() {
        let outcome = ExecutionOutcome::failed("NameError: x is not defined");
        assert_failed(&outcome);
        assert_failed_with(&outcome, "x is not defined");
    }

    #[test]
    #[should_panic(expected = "but it completed")]
    fn test_assert_failed_with_on_success_panics() {
        assert_failed_with(&ExecutionOutcome::Completed, "anything");
    }
}
