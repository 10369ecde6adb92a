//! The execution orchestrator.
//!
//! A run goes through the same steps every time:
//!
//! 1. claim the orchestrator (one run in flight at a time)
//! 2. clear the display surface and bind the graphics subsystem to it
//! 3. configure the interpreter's output sink and prompt flag
//! 4. run the code as the main program
//! 5. settle to [`ExecutionOutcome::Completed`] or a normalized
//!    [`ExecutionOutcome::Failed`]
//!
//! Steps 2 and 3 happen before every run, so nothing configured for one run
//! leaks into the next. There is no queueing, cancellation or timeout: a
//! second run requested while one is in flight is rejected with
//! [`BridgeError::RunInFlight`], and a started run goes to completion.

mod handle;
mod relay;
mod token;


pub use handle::{OutputStream, RunHandle};
pub use relay::OutputCallback;

use crate::config::BridgeConfig;
use crate::core::{ExecutionOutcome, OutputEvent, RunId};
use crate::errors::{normalize, BridgeError, InterpreterError};
use crate::events::{NoOpRunObserver, RunObserver, RUN_COMPLETED, RUN_FAILED, RUN_REJECTED, RUN_STARTED};
use crate::interpreter::{Interpreter, InterpreterConfig};
use crate::observability::SpanTimer;
use crate::surface::SurfaceRegistry;
use futures::FutureExt;
use relay::OutputRelay;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use token::{ActiveRun, RunToken};
use tokio::sync::mpsc;
use tracing::{info, info_span, warn, Instrument};

/// Everything one run needs, passed explicitly instead of living in
/// interpreter-wide state.
#[derive(Clone)]
pub struct RunConfig {
    /// Receives the run's output events.
    pub output_sink: OutputCallback,
    /// Whether interactive input prompts display their prompt text.
    pub prompt_enabled: bool,
    /// Surface cleared before the run and drawn into during it.
    pub display_surface_id: String,
    /// Module name the code runs under.
    pub program_name: String,
}

impl RunConfig {
    /// Creates a run configuration with default settings.
    #[must_use]
    pub fn new<F>(on_output: F) -> Self
    where
        F: Fn(OutputEvent) + Send + Sync + 'static,
    {
        Self::from_config(&BridgeConfig::default(), Arc::new(on_output))
    }

    /// Creates a run configuration from bridge settings.
    #[must_use]
    pub fn from_config(config: &BridgeConfig, output_sink: OutputCallback) -> Self {
        Self {
            output_sink,
            prompt_enabled: config.prompt_enabled,
            display_surface_id: config.display_surface_id.clone(),
            program_name: config.program_name.clone(),
        }
    }

    /// Sets whether input prompts are displayed.
    #[must_use]
    pub fn with_prompt_enabled(mut self, enabled: bool) -> Self {
        self.prompt_enabled = enabled;
        self
    }

    /// Sets the display surface id.
    #[must_use]
    pub fn with_display_surface_id(mut self, id: impl Into<String>) -> Self {
        self.display_surface_id = id.into();
        self
    }

    /// Sets the program name.
    #[must_use]
    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("prompt_enabled", &self.prompt_enabled)
            .field("display_surface_id", &self.display_surface_id)
            .field("program_name", &self.program_name)
            .finish_non_exhaustive()
    }
}

/// Starts runs against an interpreter and reports their outcomes.
pub struct ExecutionOrchestrator {
    interpreter: Arc<dyn Interpreter>,
    surfaces: Arc<SurfaceRegistry>,
    config: BridgeConfig,
    observer: Arc<dyn RunObserver>,
    active: ActiveRun,
}

impl ExecutionOrchestrator {
    /// Creates an orchestrator.
    #[must_use]
    pub fn new(
        interpreter: Arc<dyn Interpreter>,
        surfaces: Arc<SurfaceRegistry>,
        config: BridgeConfig,
    ) -> Self {
        Self {
            interpreter,
            surfaces,
            config,
            observer: Arc::new(NoOpRunObserver),
            active: ActiveRun::default(),
        }
    }

    /// Sets the run lifecycle observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Returns the bridge configuration.
    #[must_use]
    pub const fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Returns the id of the run in flight, if any.
    #[must_use]
    pub fn active_run(&self) -> Option<RunId> {
        *self.active.lock()
    }

    /// Runs `code`, sending each output fragment to `on_output`.
    ///
    /// Interpreter failures resolve to [`ExecutionOutcome::Failed`]. An `Err`
    /// means the run never started: the display surface is missing or another
    /// run is in flight.
    ///
    /// `on_output` may write back into the interpreter's output sink; those
    /// fragments are delivered after the current call returns, keeping
    /// sequence order.
    pub async fn run<F>(&self, code: &str, on_output: F) -> Result<ExecutionOutcome, BridgeError>
    where
        F: Fn(OutputEvent) + Send + Sync + 'static,
    {
        let run_config = RunConfig::from_config(&self.config, Arc::new(on_output));
        self.run_with(code, run_config).await
    }

    /// Runs `code` with an explicit run configuration.
    pub async fn run_with(
        &self,
        code: &str,
        run_config: RunConfig,
    ) -> Result<ExecutionOutcome, BridgeError> {
        let token = match RunToken::acquire(&self.active) {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "Run rejected");
                self.observer
                    .try_emit(RUN_REJECTED, Some(serde_json::json!({ "reason": err.to_string() })));
                return Err(err);
            }
        };
        let run_id = token.run_id();

        let surface = self.surfaces.reset(&run_config.display_surface_id)?;
        self.interpreter.bind_graphics(surface);

        let relay = Arc::new(OutputRelay::new(run_id, Arc::clone(&run_config.output_sink)));
        self.interpreter.configure(InterpreterConfig::new(
            relay.clone(),
            run_config.prompt_enabled,
        ));

        self.observer
            .emit(
                RUN_STARTED,
                Some(serde_json::json!({
                    "run_id": run_id,
                    "program_name": run_config.program_name,
                    "code_bytes": code.len(),
                })),
            )
            .await;

        let span = info_span!("run", run_id = %run_id, program = %run_config.program_name);
        let timer = SpanTimer::start("run");
        let result = AssertUnwindSafe(self.interpreter.import_main(&run_config.program_name, code))
            .catch_unwind()
            .instrument(span)
            .await;
        relay.close();
        let duration_ms = timer.finish();
        let fragments = relay.forwarded();

        let outcome = match result {
            Ok(Ok(())) => ExecutionOutcome::Completed,
            Ok(Err(error)) => ExecutionOutcome::failed(normalize(&error)),
            Err(payload) => {
                let error = InterpreterError::Panicked(panic_message(payload.as_ref()));
                ExecutionOutcome::failed(normalize(&error))
            }
        };

        match &outcome {
            ExecutionOutcome::Completed => {
                info!(%run_id, duration_ms, fragments, "Run completed");
                self.observer
                    .emit(
                        RUN_COMPLETED,
                        Some(serde_json::json!({
                            "run_id": run_id,
                            "duration_ms": duration_ms,
                            "fragments": fragments,
                        })),
                    )
                    .await;
            }
            ExecutionOutcome::Failed { message } => {
                warn!(%run_id, duration_ms, fragments, error = %message, "Run failed");
                self.observer
                    .emit(
                        RUN_FAILED,
                        Some(serde_json::json!({
                            "run_id": run_id,
                            "duration_ms": duration_ms,
                            "fragments": fragments,
                            "error": message,
                        })),
                    )
                    .await;
            }
        }

        drop(token);
        Ok(outcome)
    }

    /// Starts `code` on its own task and returns a handle to its output and
    /// outcome.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(self: &Arc<Self>, code: impl Into<String>) -> RunHandle {
        let (sender, receiver) = mpsc::unbounded_channel();
        let orchestrator = Arc::clone(self);
        let code = code.into();

        let task = tokio::spawn(async move {
            orchestrator
                .run(&code, move |event| {
                    // The receiver may already be gone; the run still settles.
                    let _ = sender.send(event);
                })
                .await
        });

        RunHandle::new(OutputStream::new(receiver), task)
    }
}

impl std::fmt::Debug for ExecutionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionOrchestrator")
            .field("config", &self.config)
            .field("active_run", &self.active_run())
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "interpreter panicked".to_string()
    }
}
