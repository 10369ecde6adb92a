//! A programmable interpreter double.

use crate::errors::InterpreterError;
use crate::interpreter::{Interpreter, InterpreterConfig, OutputSink};
use crate::surface::DisplaySurface;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// An interpreter executing a line-oriented test script.
///
/// Each non-blank line of the submitted code is one instruction:
///
/// | instruction          | effect                                        |
/// |----------------------|-----------------------------------------------|
/// | `out <text>`         | writes `<text>` to the output sink            |
/// | `draw <element>`     | appends `<element>` to the bound surface      |
/// | `input <prompt>`     | writes `<prompt>` if prompts are enabled      |
/// | `yield`              | yields to the runtime                         |
/// | `sleep <ms>`         | sleeps for `<ms>` milliseconds                |
/// | `raise <Kind>: <msg>`| raises a structured exception                 |
/// | `raw <value>`        | raises a non-structured value                 |
/// | `panic <msg>`        | panics                                        |
///
/// Anything else raises a `SyntaxError` naming the line.
#[derive(Default)]
pub struct ScriptedInterpreter {
    config: Mutex<Option<InterpreterConfig>>,
    surface: Mutex<Option<Arc<dyn DisplaySurface>>>,
    programs: Mutex<Vec<String>>,
    configure_calls: AtomicUsize,
}

impl ScriptedInterpreter {
    /// Creates a new scripted interpreter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the interpreter was configured.
    #[must_use]
    pub fn configure_calls(&self) -> usize {
        self.configure_calls.load(Ordering::SeqCst)
    }

    /// Program names of every run, in order.
    #[must_use]
    pub fn programs(&self) -> Vec<String> {
        self.programs.lock().clone()
    }

    /// Current prompt flag, if configured.
    #[must_use]
    pub fn prompt_enabled(&self) -> Option<bool> {
        self.config.lock().as_ref().map(|c| c.prompt_enabled)
    }

    /// Id of the bound surface, if any.
    #[must_use]
    pub fn bound_surface(&self) -> Option<String> {
        self.surface.lock().as_ref().map(|s| s.id().to_string())
    }

    /// Writes `text` to the currently configured sink, outside of any run.
    pub fn write_stale(&self, text: &str) {
        if let Some(sink) = self.sink() {
            sink.write(text);
        }
    }

    fn sink(&self) -> Option<Arc<dyn OutputSink>> {
        self.config.lock().as_ref().map(|c| Arc::clone(&c.output))
    }

    fn draw(&self, element: &str) {
        if let Some(surface) = self.surface.lock().as_ref() {
            surface.append(element);
        }
    }
}

impl std::fmt::Debug for ScriptedInterpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedInterpreter")
            .field("configure_calls", &self.configure_calls())
            .field("programs", &self.programs())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Interpreter for ScriptedInterpreter {
    fn configure(&self, config: InterpreterConfig) {
        self.configure_calls.fetch_add(1, Ordering::SeqCst);
        *self.config.lock() = Some(config);
    }

    fn bind_graphics(&self, surface: Arc<dyn DisplaySurface>) {
        *self.surface.lock() = Some(surface);
    }

    async fn import_main(&self, program_name: &str, code: &str) -> Result<(), InterpreterError> {
        self.programs.lock().push(program_name.to_string());
        let prompt_enabled = self.prompt_enabled().unwrap_or(false);

        for (index, line) in code.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (op, arg) = line.split_once(' ').unwrap_or((line, ""));

            match op {
                "out" => self.write_stale(arg),
                "draw" => self.draw(arg),
                "input" if prompt_enabled => self.write_stale(arg),
                "input" => {}
                "yield" => tokio::task::yield_now().await,
                "sleep" => {
                    let millis = arg.parse().unwrap_or(0);
                    tokio::time::sleep(Duration::from_millis(millis)).await;
                }
                "raise" => {
                    let (kind, message) = arg.split_once(':').unwrap_or(("Exception", arg));
                    return Err(InterpreterError::exception(kind.trim(), message.trim()));
                }
                "raw" => return Err(InterpreterError::raw(arg)),
                "panic" => panic!("{arg}"),
                _ => {
                    let line_no = u32::try_from(index + 1).unwrap_or(u32::MAX);
                    return Err(InterpreterError::exception_at(
                        "SyntaxError",
                        format!("unknown instruction '{op}'"),
                        line_no,
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::InMemorySurface;

    fn configured() -> (ScriptedInterpreter, Arc<Mutex<Vec<String>>>) {
        let interpreter = ScriptedInterpreter::new();
        let written = Arc::new(Mutex::new(Vec::new()));
        let captured = written.clone();
        interpreter.configure(InterpreterConfig::new(
            Arc::new(move |text: &str| captured.lock().push(text.to_string())),
            true,
        ));
        (interpreter, written)
    }

    #[tokio::test]
    async fn test_out_and_draw() {
        let (interpreter, written) = configured();
        let surface = Arc::new(InMemorySurface::new("canvas"));
        interpreter.bind_graphics(surface.clone());

        interpreter
            .import_main("main", "out hello\ndraw square\n\nout bye")
            .await
            .unwrap();

        assert_eq!(*written.lock(), vec!["hello", "bye"]);
        assert_eq!(surface.elements(), vec!["square"]);
        assert_eq!(interpreter.programs(), vec!["main"]);
    }

    #[tokio::test]
    async fn test_raise() {
        let (interpreter, _) = configured();
        let err = interpreter
            .import_main("main", "raise NameError: x is not defined")
            .await
            .unwrap_err();
        assert_eq!(err, InterpreterError::exception("NameError", "x is not defined"));
    }

    #[tokio::test]
    async fn test_unknown_instruction_names_line() {
        let (interpreter, _) = configured();
        let err = interpreter
            .import_main("main", "out a\nfrobnicate")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "SyntaxError: unknown instruction 'frobnicate' on line 2");
    }

    #[tokio::test]
    async fn test_input_respects_prompt_flag() {
        let interpreter = ScriptedInterpreter::new();
        let written = Arc::new(Mutex::new(Vec::new()));
        let captured = written.clone();
        interpreter.configure(InterpreterConfig::new(
            Arc::new(move |text: &str| captured.lock().push(text.to_string())),
            false,
        ));

        interpreter.import_main("main", "input Name?").await.unwrap();
        assert!(written.lock().is_empty());
    }
}
