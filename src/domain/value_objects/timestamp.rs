//! Wall-clock stamp carried by transaction records.
//!
//! Locks expire after a number of market operations, so nothing in the
//! protocol compares these instants. They exist for the history log: a
//! record says when a settlement or expiry was observed.
//!
//! ```
//! use market_protocol::domain::value_objects::timestamp::Timestamp;
//!
//! let new_year = Timestamp::from_millis(1_704_067_200_000).unwrap();
//! assert_eq!(new_year.to_string(), "2024-01-01T00:00:00+00:00");
//! ```

use chrono::{DateTime, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Instant at which a record was produced, in UTC.
///
/// Serializes as an RFC 3339 string so JSON-lines history stays readable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Stamps the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Rebuilds a stamp from Unix milliseconds, `None` when out of range.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Unix milliseconds, as logged by the tracing sink.
    #[inline]
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn settlement_stamp_falls_inside_the_call() {
        let before = Utc::now();
        let stamp = Timestamp::now();
        let after = Utc::now();

        assert!(before <= stamp.0 && stamp.0 <= after);
    }

    #[test]
    fn millis_survive_a_history_reload() {
        let stamp = Timestamp::from_millis(1_704_067_200_123).unwrap();
        assert_eq!(stamp.timestamp_millis(), 1_704_067_200_123);
        assert_eq!(Timestamp::from_millis(i64::MAX), None);
    }

    #[test]
    fn later_records_sort_after_earlier_ones() {
        let lock_issued = Timestamp::from_millis(1_000).unwrap();
        let lock_expired = Timestamp::from_millis(2_000).unwrap();
        assert!(lock_issued < lock_expired);
    }

    #[test]
    fn json_line_carries_rfc3339() {
        let epoch = Timestamp::from_millis(0).unwrap();
        let json = serde_json::to_string(&epoch).unwrap();
        assert_eq!(json, "\"1970-01-01T00:00:00Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(epoch, back);
    }

    #[test]
    fn converts_from_chrono() {
        let at = Utc.timestamp_millis_opt(42).single().unwrap();
        assert_eq!(Timestamp::from(at).timestamp_millis(), 42);
    }
}
