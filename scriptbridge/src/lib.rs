//! # Scriptbridge
//!
//! Execution orchestration and content identity for browser-hosted script
//! editors.
//!
//! Scriptbridge sits between an editor UI and an embedded, sandboxed script
//! interpreter and provides:
//!
//! - **Run orchestration**: configure the interpreter, reset the drawing
//!   surface, start a run and relay its output in emission order
//! - **Failure normalization**: interpreter errors become a single message string
//! - **Content fingerprints**: SHA-256 identity keys for editor text
//! - **Session persistence**: string key/value storage with empty-string absence
//! - **Text export**: client downloads through revocable, always-released handles
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scriptbridge::prelude::*;
//!
//! let orchestrator = ExecutionOrchestrator::new(interpreter, surfaces, BridgeConfig::default());
//!
//! let outcome = orchestrator
//!     .run("print('hello')", |event: OutputEvent| print!("{}", event.text))
//!     .await?;
//!
//! if let ExecutionOutcome::Failed { message } = outcome {
//!     eprintln!("{message}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod export;
pub mod fingerprint;
pub mod interpreter;
pub mod observability;
pub mod runner;
pub mod session;
pub mod surface;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::BridgeConfig;
    pub use crate::core::{ExecutionOutcome, OutputEvent, RunId};
    pub use crate::errors::{normalize, BridgeError, InterpreterError, Stringifiable};
    pub use crate::events::{
        CollectingRunObserver, LoggingRunObserver, NoOpRunObserver, RunObserver,
    };
    pub use crate::export::{ArtifactExporter, DirectoryDownloadHost, DownloadHost, ExportHandle};
    pub use crate::fingerprint::{ContentFingerprint, FingerprintService};
    pub use crate::interpreter::{Interpreter, InterpreterConfig, OutputSink};
    pub use crate::runner::{ExecutionOrchestrator, OutputStream, RunConfig, RunHandle};
    pub use crate::session::{
        EditorSession, EditorSnapshot, InMemorySessionBackend, PersistOutcome, SessionBackend,
        SessionStore,
    };
    pub use crate::surface::{DisplaySurface, InMemorySurface, SurfaceRegistry};
    pub use crate::utils::{Clock, FixedClock, SystemClock};
}
