//! Ordered relay from the interpreter's output sink to the run's callback.

use crate::core::{OutputEvent, RunId};
use crate::interpreter::OutputSink;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;

/// Callback receiving the output events of a run.
pub type OutputCallback = Arc<dyn Fn(OutputEvent) + Send + Sync>;

struct RelayState {
    next_sequence: u64,
    callback: Option<OutputCallback>,
    pending: VecDeque<OutputEvent>,
    delivering: bool,
}

/// Numbers fragments and forwards them to the run's callback.
///
/// Once closed, fragments are dropped: output arriving after its run settled
/// never reaches the caller. The callback runs outside the relay lock and may
/// write back into the interpreter's sink; such writes are queued and
/// delivered, in sequence order, once the current callback returns.
pub(crate) struct OutputRelay {
    run_id: RunId,
    state: Mutex<RelayState>,
}

impl OutputRelay {
    pub(crate) fn new(run_id: RunId, callback: OutputCallback) -> Self {
        Self {
            run_id,
            state: Mutex::new(RelayState {
                next_sequence: 0,
                callback: Some(callback),
                pending: VecDeque::new(),
                delivering: false,
            }),
        }
    }

    /// Number of fragments forwarded so far.
    pub(crate) fn forwarded(&self) -> u64 {
        self.state.lock().next_sequence
    }

    /// Stops forwarding and releases the callback.
    pub(crate) fn close(&self) {
        let mut state = self.state.lock();
        state.callback = None;
        state.pending.clear();
    }
}

impl OutputSink for OutputRelay {
    fn write(&self, text: &str) {
        {
            let mut state = self.state.lock();
            if state.callback.is_none() {
                trace!(run_id = %self.run_id, "Dropped output after run settled");
                return;
            }
            let event = OutputEvent::new(state.next_sequence, text);
            state.next_sequence += 1;
            state.pending.push_back(event);
            if state.delivering {
                return;
            }
            state.delivering = true;
        }

        let mut delivery = DeliveryGuard {
            state: &self.state,
            armed: true,
        };
        loop {
            let (callback, event) = {
                let mut state = self.state.lock();
                let next = state
                    .callback
                    .clone()
                    .zip(state.pending.pop_front());
                match next {
                    Some(next) => next,
                    None => {
                        state.delivering = false;
                        delivery.armed = false;
                        return;
                    }
                }
            };
            callback(event);
        }
    }
}

/// Clears the delivering flag if a callback unwinds mid-delivery.
struct DeliveryGuard<'a> {
    state: &'a Mutex<RelayState>,
    armed: bool,
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.state.lock();
            state.delivering = false;
            state.pending.clear();
        }
    }
}
