//! Output events relayed from the interpreter to the display sink.

use serde::{Deserialize, Serialize};

/// One fragment of text the interpreter wants displayed.
///
/// `sequence` starts at zero for every run and grows by one per fragment, in
/// the order the interpreter produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEvent {
    /// Position of this fragment within its run.
    pub sequence: u64,
    /// The text fragment.
    pub text: String,
}

impl OutputEvent {
    /// Creates a new output event.
    #[must_use]
    pub fn new(sequence: u64, text: impl Into<String>) -> Self {
        Self {
            sequence,
            text: text.into(),
        }
    }
}

impl AsRef<str> for OutputEvent {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
