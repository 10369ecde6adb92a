//! Timestamp rendering helpers.

use chrono::{DateTime, TimeZone, Utc};

/// Represents a timestamp that can be serialized/deserialized.
pub type Timestamp = DateTime<Utc>;

/// Returns the current UTC time as an ISO 8601 formatted string.
///
/// The format is `YYYY-MM-DDTHH:MM:SS.ffffff+00:00`.
///
/// # Examples
///
/// ```
/// use scriptbridge::utils::iso_timestamp;
///
/// let ts = iso_timestamp();
/// assert!(ts.contains('T'));
/// ```
#[must_use]
pub fn iso_timestamp() -> String {
    format_iso(&Utc::now())
}

/// Renders Unix milliseconds as an ISO 8601 string.
///
/// Returns `None` when `millis` is outside chrono's representable range.
#[must_use]
pub fn millis_to_iso(millis: i64) -> Option<String> {
    Utc.timestamp_millis_opt(millis).single().map(|dt| format_iso(&dt))
}

fn format_iso(dt: &Timestamp) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_to_iso_epoch() {
        assert_eq!(
            millis_to_iso(0).as_deref(),
            Some("1970-01-01T00:00:00.000000+00:00")
        );
    }

    #[test]
    fn test_millis_to_iso_keeps_millis() {
        assert_eq!(
            millis_to_iso(1_500).as_deref(),
            Some("1970-01-01T00:00:01.500000+00:00")
        );
    }

    #[test]
    fn test_millis_to_iso_out_of_range() {
        assert!(millis_to_iso(i64::MAX).is_none());
    }
}
