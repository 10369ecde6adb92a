//! Session-lifetime persistence of editor state.
//!
//! [`SessionStore`] is a plain string key/value store where an absent key
//! reads as the empty string. [`EditorSession`] builds on it to persist the
//! editor text together with its fingerprint.

mod editor;
mod store;

pub use editor::{EditorSession, EditorSnapshot, PersistOutcome};
pub use store::{InMemorySessionBackend, SessionBackend, SessionStore};
