//! Utility types for time handling.
//!
//! This module provides the clock abstraction used for timestamping editor
//! snapshots and ISO 8601 rendering helpers.

mod clock;
pub mod timestamps;

pub use clock::{Clock, FixedClock, SystemClock};
pub use timestamps::{iso_timestamp, millis_to_iso, Timestamp};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_timestamp_format() {
        let ts = iso_timestamp();
        assert!(ts.contains('T'));
        assert!(ts.ends_with("+00:00"));
    }
}
