//! Display surfaces the interpreter's graphics subsystem draws into.
//!
//! A surface is identified by a well-known id. The orchestrator clears the
//! configured surface before every run so drawings never leak between runs.

use crate::errors::BridgeError;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Id of the default drawing surface.
pub const DEFAULT_SURFACE_ID: &str = "canvas";

/// A stateful rendering target.
pub trait DisplaySurface: Send + Sync {
    /// Returns the surface id.
    fn id(&self) -> &str;

    /// Appends a rendered element.
    fn append(&self, element: &str);

    /// Removes every element.
    fn clear(&self);

    /// Returns true if nothing is drawn.
    fn is_empty(&self) -> bool;
}

/// A surface keeping its elements in memory.
#[derive(Debug)]
pub struct InMemorySurface {
    id: String,
    elements: Mutex<Vec<String>>,
}

impl InMemorySurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            elements: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of the drawn elements.
    #[must_use]
    pub fn elements(&self) -> Vec<String> {
        self.elements.lock().clone()
    }
}

impl DisplaySurface for InMemorySurface {
    fn id(&self) -> &str {
        &self.id
    }

    fn append(&self, element: &str) {
        self.elements.lock().push(element.to_string());
    }

    fn clear(&self) {
        self.elements.lock().clear();
    }

    fn is_empty(&self) -> bool {
        self.elements.lock().is_empty()
    }
}

/// Looks up display surfaces by id.
#[derive(Default)]
pub struct SurfaceRegistry {
    surfaces: RwLock<HashMap<String, Arc<dyn DisplaySurface>>>,
}

impl SurfaceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding one surface.
    #[must_use]
    pub fn with_surface(surface: Arc<dyn DisplaySurface>) -> Self {
        let registry = Self::new();
        registry.register(surface);
        registry
    }

    /// Registers `surface` under its id, replacing any previous surface.
    pub fn register(&self, surface: Arc<dyn DisplaySurface>) {
        self.surfaces.write().insert(surface.id().to_string(), surface);
    }

    /// Returns the surface registered under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn DisplaySurface>> {
        self.surfaces.read().get(id).cloned()
    }

    /// Returns the surface registered under `id`, or a precondition failure.
    pub fn require(&self, id: &str) -> Result<Arc<dyn DisplaySurface>, BridgeError> {
        self.get(id).ok_or_else(|| {
            BridgeError::precondition(format!("display surface '{id}' is not registered"))
        })
    }

    /// Clears the surface registered under `id` and returns it.
    pub fn reset(&self, id: &str) -> Result<Arc<dyn DisplaySurface>, BridgeError> {
        let surface = self.require(id)?;
        surface.clear();
        debug!(surface_id = id, "Display surface cleared");
        Ok(surface)
    }
}

impl std::fmt::Debug for SurfaceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<String> = self.surfaces.read().keys().cloned().collect();
        f.debug_struct("SurfaceRegistry").field("surfaces", &ids).finish()
    }
}
