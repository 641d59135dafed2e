//! Half-open query windows.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A half-open interval `[start, end)` in epoch milliseconds.
///
/// An inverted or zero-length window contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageWindow {
    pub start: i64,
    pub end: i64,
}

impl UsageWindow {
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether `timestamp` falls inside `[start, end)`.
    #[must_use]
    pub const fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    /// Whether the half-open interval `[start, end)` shares any instant with this window.
    #[must_use]
    pub const fn overlaps(&self, start: i64, end: i64) -> bool {
        !self.is_empty() && start < end && start < self.end && end > self.start
    }
}

impl fmt::Display for UsageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", format_millis(self.start), format_millis(self.end))
    }
}

/// Renders epoch milliseconds as RFC 3339, falling back to the raw number
/// when the value is outside chrono's range.
pub fn format_millis(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms).map_or_else(
        || ms.to_string(),
        |dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}
