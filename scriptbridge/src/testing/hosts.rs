//! Recording collaborators.

use crate::core::OutputEvent;
use crate::errors::BridgeError;
use crate::export::{DownloadHost, ExportHandle};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// One export seen by a [`RecordingDownloadHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDownload {
    /// Suggested file name.
    pub file_name: String,
    /// Exported content, decoded as UTF-8.
    pub content: String,
    /// MIME type the handle was created with.
    pub mime_type: String,
}

/// A download host that records exports instead of presenting them.
#[derive(Debug, Default)]
pub struct RecordingDownloadHost {
    next_id: AtomicU64,
    live: Mutex<HashMap<u64, (Vec<u8>, String)>>,
    downloads: Mutex<Vec<RecordedDownload>>,
    fail_triggers: AtomicBool,
}

impl RecordingDownloadHost {
    /// Creates a new recording host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later trigger fail.
    pub fn fail_triggers(&self) {
        self.fail_triggers.store(true, Ordering::SeqCst);
    }

    /// Returns the recorded downloads.
    #[must_use]
    pub fn downloads(&self) -> Vec<RecordedDownload> {
        self.downloads.lock().clone()
    }

    /// Returns the number of handles not yet revoked.
    #[must_use]
    pub fn live_handles(&self) -> usize {
        self.live.lock().len()
    }
}

impl DownloadHost for RecordingDownloadHost {
    fn create_handle(&self, content: &[u8], mime_type: &str) -> Result<ExportHandle, BridgeError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.live
            .lock()
            .insert(id, (content.to_vec(), mime_type.to_string()));
        Ok(ExportHandle {
            id,
            url: format!("blob:recording/{id}"),
        })
    }

    fn trigger(&self, handle: &ExportHandle, file_name: &str) -> Result<(), BridgeError> {
        if self.fail_triggers.load(Ordering::SeqCst) {
            return Err(BridgeError::Export("trigger disabled".to_string()));
        }
        let live = self.live.lock();
        let (bytes, mime_type) = live
            .get(&handle.id)
            .ok_or_else(|| BridgeError::Export(format!("unknown handle {}", handle.url)))?;
        self.downloads.lock().push(RecordedDownload {
            file_name: file_name.to_string(),
            content: String::from_utf8_lossy(bytes).into_owned(),
            mime_type: mime_type.clone(),
        });
        Ok(())
    }

    fn revoke(&self, handle: &ExportHandle) {
        self.live.lock().remove(&handle.id);
    }
}

/// Collects the output events of runs.
#[derive(Debug, Clone, Default)]
pub struct CollectingOutput {
    events: Arc<Mutex<Vec<OutputEvent>>>,
}

impl CollectingOutput {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a callback appending to this collector.
    #[must_use]
    pub fn callback(&self) -> impl Fn(OutputEvent) + Send + Sync + 'static {
        let events = Arc::clone(&self.events);
        move |event: OutputEvent| events.lock().push(event)
    }

    /// Returns the collected events.
    #[must_use]
    pub fn events(&self) -> Vec<OutputEvent> {
        self.events.lock().clone()
    }

    /// Returns the collected texts, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.text.clone()).collect()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}
