//! Acquisition boundary.
//!
//! Sources supply raw events or snapshots for a window. They may block or
//! fail as a whole; the engine only sees fully materialized input.

use thiserror::Error;

use crate::event::UsageEvent;
use crate::merge::RecordError;
use crate::snapshot::UsageSnapshot;
use crate::window::UsageWindow;

/// A source failed to deliver any data.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

/// Capability shared by all usage sources.
pub trait UsageSource {
    /// Whether this environment can answer usage queries at all.
    fn supports_usage_query(&self) -> bool;

    /// Short description used in error messages and logs.
    fn describe(&self) -> String;
}

/// Supplies lifecycle events for a window.
pub trait EventSource: UsageSource {
    /// Events with timestamps in `[window.start, window.end)`, ordered by
    /// timestamp and possibly interleaved across keys.
    fn events(&self, window: UsageWindow) -> Result<Vec<UsageEvent>, SourceError>;
}

/// Supplies pre-aggregated snapshots for a window.
pub trait SnapshotSource: UsageSource {
    /// Snapshots whose sub-interval overlaps the window, one result per
    /// record so a single bad record does not fail the batch.
    fn snapshots(
        &self,
        window: UsageWindow,
    ) -> Result<Vec<Result<UsageSnapshot, RecordError>>, SourceError>;
}
