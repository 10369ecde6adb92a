//! String key/value session store.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::trace;

/// A session-scoped, string-keyed persistence backend.
///
/// Records survive for the lifetime of the backend only.
pub trait SessionBackend: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Removes the value stored under `key`.
    fn remove(&self, key: &str);

    /// Removes every record.
    fn clear(&self);
}

/// Backend holding records in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemorySessionBackend {
    entries: DashMap<String, String>,
}

impl InMemorySessionBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionBackend for InMemorySessionBackend {
    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    fn clear(&self) {
        self.entries.clear();
    }
}

/// Session store with empty-string absence semantics.
///
/// Writes are last-write-wins. Key shapes are the caller's business.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
}

impl SessionStore {
    /// Creates a store over `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self { backend }
    }

    /// Creates a store over a fresh in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemorySessionBackend::new()))
    }

    /// Saves `value` under `key`, overwriting any existing record.
    pub fn save(&self, key: &str, value: &str) {
        trace!(key, bytes = value.len(), "Session save");
        self.backend.set(key, value);
    }

    /// Loads the value under `key`, or the empty string if it was never saved.
    #[must_use]
    pub fn load(&self, key: &str) -> String {
        self.backend.get(key).unwrap_or_default()
    }

    /// Returns the underlying backend.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn SessionBackend> {
        &self.backend
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let store = SessionStore::in_memory();
        store.save("k", "v");
        assert_eq!(store.load("k"), "v");
    }

    #[test]
    fn test_missing_key_is_empty() {
        let store = SessionStore::in_memory();
        assert_eq!(store.load("missing-key"), "");
    }

    #[test]
    fn test_overwrite() {
        let store = SessionStore::in_memory();
        store.save("k", "v1");
        store.save("k", "v2");
        assert_eq!(store.load("k"), "v2");
    }

    #[test]
    fn test_empty_value_round_trips() {
        let store = SessionStore::in_memory();
        store.save("k", "");
        assert_eq!(store.load("k"), "");
        assert!(store.backend().get("k").is_some());
    }

    #[test]
    fn test_backend_remove_and_clear() {
        let backend = Arc::new(InMemorySessionBackend::new());
        let store = SessionStore::new(backend.clone());

        store.save("a", "1");
        store.save("b", "2");
        assert_eq!(backend.len(), 2);

        backend.remove("a");
        assert_eq!(store.load("a"), "");
        assert_eq!(store.load("b"), "2");

        backend.clear();
        assert!(backend.is_empty());
    }

    #[test]
    fn test_clones_share_backend() {
        let store = SessionStore::in_memory();
        let other = store.clone();
        store.save("shared", "yes");
        assert_eq!(other.load("shared"), "yes");
    }

    #[tokio::test]
    async fn test_concurrent_writers_last_write_wins() {
        let store = SessionStore::in_memory();
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.save(&format!("key-{i}"), &i.to_string());
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        for i in 0..16 {
            assert_eq!(store.load(&format!("key-{i}")), i.to_string());
        }
    }
}
