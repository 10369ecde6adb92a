//! Single-active-run marker.

use crate::core::RunId;
use crate::errors::BridgeError;
use parking_lot::Mutex;
use std::sync::Arc;

/// Slot holding the id of the run currently in flight.
pub(crate) type ActiveRun = Arc<Mutex<Option<RunId>>>;

/// Proof that a run holds the orchestrator. Frees the slot on drop.
#[derive(Debug)]
pub(crate) struct RunToken {
    slot: ActiveRun,
    run_id: RunId,
}

impl RunToken {
    /// Claims `slot` for a new run, or reports the run already holding it.
    pub(crate) fn acquire(slot: &ActiveRun) -> Result<Self, BridgeError> {
        let mut active = slot.lock();
        if let Some(existing) = *active {
            return Err(BridgeError::RunInFlight { active: existing });
        }
        let run_id = RunId::new();
        *active = Some(run_id);
        Ok(Self {
            slot: Arc::clone(slot),
            run_id,
        })
    }

    pub(crate) const fn run_id(&self) -> RunId {
        self.run_id
    }
}

impl Drop for RunToken {
    fn drop(&mut self) {
        let mut active = self.slot.lock();
        if *active == Some(self.run_id) {
            *active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_rejected() {
        let slot = ActiveRun::default();
        let first = RunToken::acquire(&slot).unwrap();

        match RunToken::acquire(&slot) {
            Err(BridgeError::RunInFlight { active }) => assert_eq!(active, first.run_id()),
            other => panic!("expected RunInFlight, got {other:?}"),
        }
    }

    #[test]
    fn test_drop_releases_slot() {
        let slot = ActiveRun::default();
        {
            let _token = RunToken::acquire(&slot).unwrap();
            assert!(slot.lock().is_some());
        }
        assert!(slot.lock().is_none());
        assert!(RunToken::acquire(&slot).is_ok());
    }
}
