//! Core domain logic for foreground usage reporting.
//!
//! This crate contains the usage-aggregation engine:
//! - Session reconstruction: pairing foreground entries and exits into durations
//! - Snapshot merging: summing pre-aggregated sub-interval totals per key
//! - Result building and package metadata enrichment
//! - The query entry point and the traits its collaborators implement

pub mod aggregate;
pub mod enrich;
pub mod event;
pub mod merge;
pub mod permission;
pub mod query;
pub mod session;
pub mod snapshot;
pub mod source;
pub mod types;
pub mod window;

pub use aggregate::{AggregateResult, UsageTotals, build, total_ms};
pub use enrich::{EnrichedResult, LookupError, MetadataLookup, PackageMetadata, enrich, enrich_all};
pub use event::{UnknownEventKind, UsageEvent, UsageEventKind};
pub use merge::{MergeOutcome, RecordError, merge, merge_records};
pub use permission::{PermissionGate, platform_version};
pub use query::{Acquisition, QueryError, QueryMode, UsageReport, usage_in_range, validate_range};
pub use session::{ReconstructOptions, SessionPolicy, reconstruct, reconstruct_with};
pub use snapshot::UsageSnapshot;
pub use source::{EventSource, SnapshotSource, SourceError, UsageSource};
pub use types::{AppKey, ValidationError};
pub use window::UsageWindow;
