//! The sandboxed interpreter boundary.
//!
//! The interpreter itself is an external collaborator. Scriptbridge only
//! needs it to accept a configuration (where output goes, whether input
//! prompts are shown), draw into a bound surface, and run a named program.

use crate::errors::InterpreterError;
use crate::surface::DisplaySurface;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Receives text fragments produced by the interpreter.
pub trait OutputSink: Send + Sync {
    /// Writes one fragment.
    fn write(&self, text: &str);
}

impl<F> OutputSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn write(&self, text: &str) {
        self(text);
    }
}

/// Interpreter-wide configuration applied before a run.
#[derive(Clone)]
pub struct InterpreterConfig {
    /// Where produced text goes.
    pub output: Arc<dyn OutputSink>,
    /// Whether interactive input prompts display the caller-supplied prompt.
    pub prompt_enabled: bool,
}

impl InterpreterConfig {
    /// Creates a configuration writing to `output`.
    #[must_use]
    pub fn new(output: Arc<dyn OutputSink>, prompt_enabled: bool) -> Self {
        Self {
            output,
            prompt_enabled,
        }
    }
}

impl fmt::Debug for InterpreterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpreterConfig")
            .field("prompt_enabled", &self.prompt_enabled)
            .finish_non_exhaustive()
    }
}

/// An embedded script interpreter.
///
/// Configuration and the graphics binding are interpreter-wide: they stay in
/// effect until replaced, which is why the orchestrator re-establishes both
/// before every run.
#[async_trait]
pub trait Interpreter: Send + Sync {
    /// Replaces the interpreter-wide configuration.
    fn configure(&self, config: InterpreterConfig);

    /// Directs the graphics subsystem at `surface`.
    fn bind_graphics(&self, surface: Arc<dyn DisplaySurface>);

    /// Runs `code` as the main program named `program_name`.
    async fn import_main(&self, program_name: &str, code: &str) -> Result<(), InterpreterError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_closures_are_sinks() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let captured = written.clone();
        let sink: Arc<dyn OutputSink> = Arc::new(move |text: &str| {
            captured.lock().push(text.to_string());
        });

        sink.write("a");
        sink.write("b");
        assert_eq!(*written.lock(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_config_debug_hides_sink() {
        let config = InterpreterConfig::new(Arc::new(|_: &str| {}), true);
        assert_eq!(
            format!("{config:?}"),
            "InterpreterConfig { prompt_enabled: true, .. }"
        );
    }
}
