//! Core domain model types for scriptbridge.
//!
//! This module contains the fundamental types shared by every component:
//! - The terminal outcome of a run
//! - Output events relayed from the interpreter
//! - Run identifiers

mod event;
mod identity;
mod outcome;

pub use event::OutputEvent;
pub use identity::RunId;
pub use outcome::ExecutionOutcome;
