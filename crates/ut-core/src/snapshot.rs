//! Pre-aggregated usage snapshots.

use serde::{Deserialize, Serialize};

use crate::types::AppKey;

/// Foreground time reported for one application over one sub-interval.
///
/// A coarser data source (for example a daily usage bucket) produces one
/// snapshot per key per sub-interval, so several snapshots may share a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub key: AppKey,
    /// Reported foreground time in milliseconds. Missing values read as 0.
    #[serde(default)]
    pub interval_duration_ms: i64,
    /// Start of the sub-interval, epoch milliseconds.
    pub interval_start: i64,
    /// End of the sub-interval, epoch milliseconds.
    pub interval_end: i64,
}

impl UsageSnapshot {
    pub const fn new(key: AppKey, interval_duration_ms: i64, interval_start: i64, interval_end: i64) -> Self {
        Self {
            key,
            interval_duration_ms,
            interval_start,
            interval_end,
        }
    }

    /// The contribution of this snapshot to its key's total.
    #[must_use]
    pub const fn contribution(&self) -> i64 {
        if self.interval_duration_ms > 0 {
            self.interval_duration_ms
        } else {
            0
        }
    }
}
