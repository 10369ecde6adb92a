//! Handles for runs started in the background.

use crate::core::{ExecutionOutcome, OutputEvent};
use crate::errors::{normalize, BridgeError, InterpreterError};
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// Output events of a background run, in emission order.
///
/// The stream ends once the run has settled and every event was received.
#[derive(Debug)]
pub struct OutputStream {
    receiver: UnboundedReceiver<OutputEvent>,
}

impl OutputStream {
    pub(crate) const fn new(receiver: UnboundedReceiver<OutputEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event.
    pub async fn next_event(&mut self) -> Option<OutputEvent> {
        self.receiver.recv().await
    }

    /// Returns every event already delivered, without waiting.
    pub fn drain_ready(&mut self) -> Vec<OutputEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Stream for OutputStream {
    type Item = OutputEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// A run executing on its own task.
#[derive(Debug)]
pub struct RunHandle {
    /// The run's output events.
    pub output: OutputStream,
    task: JoinHandle<Result<ExecutionOutcome, BridgeError>>,
}

impl RunHandle {
    pub(crate) const fn new(
        output: OutputStream,
        task: JoinHandle<Result<ExecutionOutcome, BridgeError>>,
    ) -> Self {
        Self { output, task }
    }

    /// Returns true once the run has settled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the run to settle.
    ///
    /// A task that ended abnormally resolves to a failed outcome.
    pub async fn outcome(self) -> Result<ExecutionOutcome, BridgeError> {
        settle(self.task).await
    }

    /// Waits for the run to settle and collects its remaining output.
    pub async fn collect(self) -> (Vec<OutputEvent>, Result<ExecutionOutcome, BridgeError>) {
        let Self { mut output, task } = self;
        let outcome = settle(task).await;
        // The run's sender is gone once the task settled; every event is ready.
        (output.drain_ready(), outcome)
    }
}

async fn settle(
    task: JoinHandle<Result<ExecutionOutcome, BridgeError>>,
) -> Result<ExecutionOutcome, BridgeError> {
    match task.await {
        Ok(result) => result,
        Err(join_error) => {
            let error = InterpreterError::Panicked(format!("run task ended abnormally: {join_error}"));
            Ok(ExecutionOutcome::failed(normalize(&error)))
        }
    }
}
