//! The usage query entry point.
//!
//! Validates the requested range, checks the source's capability, acquires
//! raw records and runs them through the engine. Only caller-input errors,
//! unsupported environments and wholesale source failures are returned as
//! errors; bad individual records degrade silently.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::{AggregateResult, build, total_ms};
use crate::enrich::{EnrichedResult, MetadataLookup, enrich_all};
use crate::merge::merge_records;
use crate::session::{ReconstructOptions, reconstruct_with};
use crate::source::{EventSource, SnapshotSource, SourceError};
use crate::window::UsageWindow;

/// Errors that cross the engine boundary.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A required query parameter was absent.
    #[error("missing {field}")]
    InvalidArgument { field: &'static str },

    /// The environment cannot answer usage queries.
    #[error("unsupported environment: {0}")]
    UnsupportedEnvironment(String),

    #[error("failed to read usage data: {0}")]
    Source(#[from] SourceError),
}

/// Which acquisition path answers a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Pair raw lifecycle events into sessions.
    #[default]
    Events,
    /// Sum pre-aggregated snapshots.
    Snapshots,
    /// Sum snapshots and attach package metadata.
    Enriched,
}

impl QueryMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Snapshots => "snapshots",
            Self::Enriched => "enriched",
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "events" => Ok(Self::Events),
            "snapshots" => Ok(Self::Snapshots),
            "enriched" => Ok(Self::Enriched),
            _ => Err(format!("invalid query mode: {s}")),
        }
    }
}

/// The acquisition path and its collaborators.
pub enum Acquisition<'a> {
    Events {
        source: &'a dyn EventSource,
        options: ReconstructOptions,
    },
    Snapshots {
        source: &'a dyn SnapshotSource,
    },
    Enriched {
        source: &'a dyn SnapshotSource,
        lookup: &'a dyn MetadataLookup,
    },
}

impl Acquisition<'_> {
    #[must_use]
    pub const fn mode(&self) -> QueryMode {
        match self {
            Self::Events { .. } => QueryMode::Events,
            Self::Snapshots { .. } => QueryMode::Snapshots,
            Self::Enriched { .. } => QueryMode::Enriched,
        }
    }

    fn supports_usage_query(&self) -> bool {
        match self {
            Self::Events { source, .. } => source.supports_usage_query(),
            Self::Snapshots { source } | Self::Enriched { source, .. } => {
                source.supports_usage_query()
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Events { source, .. } => source.describe(),
            Self::Snapshots { source } | Self::Enriched { source, .. } => source.describe(),
        }
    }
}

/// Query output. Serializes as a plain JSON array in both cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UsageReport {
    Aggregates(Vec<AggregateResult>),
    Enriched(Vec<EnrichedResult>),
}

impl UsageReport {
    pub fn len(&self) -> usize {
        match self {
            Self::Aggregates(results) => results.len(),
            Self::Enriched(results) => results.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of every reported foreground time.
    pub fn total_ms(&self) -> i64 {
        match self {
            Self::Aggregates(results) => total_ms(results),
            Self::Enriched(results) => total_ms(results.iter().map(|e| &e.result)),
        }
    }
}

/// Checks that both ends of the range were supplied.
pub fn validate_range(start: Option<i64>, end: Option<i64>) -> Result<UsageWindow, QueryError> {
    let start = start.ok_or(QueryError::InvalidArgument { field: "start time" })?;
    let end = end.ok_or(QueryError::InvalidArgument { field: "end time" })?;
    Ok(UsageWindow::new(start, end))
}

/// Reports per-application foreground time for `[start, end)`.
pub fn usage_in_range(
    start: Option<i64>,
    end: Option<i64>,
    acquisition: &Acquisition<'_>,
) -> Result<UsageReport, QueryError> {
    let window = validate_range(start, end)?;

    if !acquisition.supports_usage_query() {
        return Err(QueryError::UnsupportedEnvironment(acquisition.describe()));
    }

    tracing::debug!(
        %window,
        mode = %acquisition.mode(),
        source = %acquisition.describe(),
        "querying usage"
    );

    let report = match acquisition {
        Acquisition::Events { source, options } => {
            let events = source.events(window)?;
            UsageReport::Aggregates(build(&reconstruct_with(&events, options)))
        }
        Acquisition::Snapshots { source } => {
            let outcome = merge_records(source.snapshots(window)?);
            UsageReport::Aggregates(build(&outcome.totals))
        }
        Acquisition::Enriched { source, lookup } => {
            let outcome = merge_records(source.snapshots(window)?);
            UsageReport::Enriched(enrich_all(build(&outcome.totals), *lookup))
        }
    };

    tracing::debug!(results = report.len(), "usage query complete");
    Ok(report)
}
