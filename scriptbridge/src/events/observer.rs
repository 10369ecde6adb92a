//! Run observer trait and implementations.

use async_trait::async_trait;
use tracing::{debug, info, Level};

/// Trait for observers receiving run lifecycle events.
#[async_trait]
pub trait RunObserver: Send + Sync {
    /// Receives an event asynchronously.
    ///
    /// # Arguments
    ///
    /// * `event_type` - The type of event (e.g., "run.started")
    /// * `data` - Optional event data
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>);

    /// Receives an event without suspending.
    ///
    /// Must never panic.
    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>);
}

/// An observer that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpRunObserver;

#[async_trait]
impl RunObserver for NoOpRunObserver {
    async fn emit(&self, _event_type: &str, _data: Option<serde_json::Value>) {}

    fn try_emit(&self, _event_type: &str, _data: Option<serde_json::Value>) {}
}

/// An observer that logs events using the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingRunObserver {
    level: Level,
}

impl Default for LoggingRunObserver {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingRunObserver {
    /// Creates a logging observer at the given level.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging observer.
    #[must_use]
    pub const fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn log_event(&self, event_type: &str, data: Option<&serde_json::Value>) {
        if self.level == Level::DEBUG {
            debug!(event_type = %event_type, event_data = ?data, "Run event: {}", event_type);
        } else {
            info!(event_type = %event_type, event_data = ?data, "Run event: {}", event_type);
        }
    }
}

#[async_trait]
impl RunObserver for LoggingRunObserver {
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.log_event(event_type, data.as_ref());
    }

    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.log_event(event_type, data.as_ref());
    }
}

/// An observer collecting events in memory, for tests.
#[derive(Debug, Default)]
pub struct CollectingRunObserver {
    events: parking_lot::RwLock<Vec<(String, Option<serde_json::Value>)>>,
}

impl CollectingRunObserver {
    /// Creates a new collecting observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<(String, Option<serde_json::Value>)> {
        self.events.read().clone()
    }

    /// Returns the collected event types, in order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.events.read().iter().map(|(t, _)| t.clone()).collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait]
impl RunObserver for CollectingRunObserver {
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.events.write().push((event_type.to_string(), data));
    }

    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.events.write().push((event_type.to_string(), data));
    }
}
