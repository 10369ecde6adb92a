//! Editor text persistence keyed by content fingerprint.

use super::SessionStore;
use crate::config::BridgeConfig;
use crate::errors::BridgeError;
use crate::fingerprint::{ContentFingerprint, FingerprintService};
use crate::utils::{millis_to_iso, Clock, SystemClock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// The persisted editor state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    /// The editor text.
    pub code: String,
    /// Hex fingerprint of `code`.
    pub fingerprint: String,
    /// When the snapshot was taken, in Unix milliseconds.
    pub saved_at_ms: i64,
}

impl EditorSnapshot {
    /// Parses the stored fingerprint.
    #[must_use]
    pub fn content_fingerprint(&self) -> Option<ContentFingerprint> {
        ContentFingerprint::from_hex(&self.fingerprint)
    }

    /// Returns `saved_at_ms` as an ISO 8601 string.
    #[must_use]
    pub fn saved_at_iso(&self) -> Option<String> {
        millis_to_iso(self.saved_at_ms)
    }
}

/// Result of [`EditorSession::persist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// A new snapshot was written.
    Saved(EditorSnapshot),
    /// The text matched the last snapshot; nothing was written.
    Unchanged(ContentFingerprint),
}

impl PersistOutcome {
    /// Returns true if a snapshot was written.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// Persists and restores editor text through a [`SessionStore`].
///
/// Only the latest snapshot is kept, under `{prefix}:snapshot`, so the
/// session holds one record per prefix however often the text is persisted.
pub struct EditorSession {
    store: SessionStore,
    fingerprints: FingerprintService,
    clock: Arc<dyn Clock>,
    prefix: String,
}

impl EditorSession {
    /// Creates an editor session using the system clock.
    #[must_use]
    pub fn new(store: SessionStore, prefix: impl Into<String>) -> Self {
        Self::with_clock(store, prefix, Arc::new(SystemClock))
    }

    /// Creates an editor session using the configured key prefix.
    #[must_use]
    pub fn from_config(store: SessionStore, config: &BridgeConfig) -> Self {
        Self::new(store, config.session_key_prefix.clone())
    }

    /// Creates an editor session with an explicit clock.
    #[must_use]
    pub fn with_clock(store: SessionStore, prefix: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            fingerprints: FingerprintService::new(),
            clock,
            prefix: prefix.into(),
        }
    }

    /// Key of the latest snapshot.
    #[must_use]
    pub fn snapshot_key(&self) -> String {
        format!("{}:snapshot", self.prefix)
    }

    /// Persists `code` unless it matches the latest snapshot.
    ///
    /// An unreadable previous snapshot is overwritten.
    pub async fn persist(&self, code: &str) -> Result<PersistOutcome, BridgeError> {
        let fingerprint = self.fingerprints.fingerprint(code).await;

        if let Ok(Some(previous)) = self.restore() {
            if previous.content_fingerprint() == Some(fingerprint) {
                return Ok(PersistOutcome::Unchanged(fingerprint));
            }
        }

        let snapshot = EditorSnapshot {
            code: code.to_string(),
            fingerprint: fingerprint.to_hex(),
            saved_at_ms: self.clock.now_millis(),
        };
        let encoded = serde_json::to_string(&snapshot)?;

        self.store.save(&self.snapshot_key(), &encoded);
        debug!(
            fingerprint = %snapshot.fingerprint,
            saved_at_ms = snapshot.saved_at_ms,
            "Editor snapshot persisted"
        );

        Ok(PersistOutcome::Saved(snapshot))
    }

    /// Restores the latest snapshot, or `None` if nothing was persisted.
    pub fn restore(&self) -> Result<Option<EditorSnapshot>, BridgeError> {
        let raw = self.store.load(&self.snapshot_key());
        if raw.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Returns true if `code` differs from the latest snapshot.
    pub async fn has_changed(&self, code: &str) -> bool {
        let fingerprint = self.fingerprints.fingerprint(code).await;
        match self.restore() {
            Ok(Some(snapshot)) => snapshot.content_fingerprint() != Some(fingerprint),
            _ => true,
        }
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
