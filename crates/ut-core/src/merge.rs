//! Snapshot merging.
//!
//! Sums reported durations per key across sub-interval snapshots. The
//! accumulation is commutative, so input order never changes the result.

use thiserror::Error;

use crate::aggregate::UsageTotals;
use crate::snapshot::UsageSnapshot;

/// A single snapshot record that could not be read.
#[derive(Debug, Error)]
#[error("record {index}: {reason}")]
pub struct RecordError {
    /// Position of the record in its source (e.g. 1-based line number).
    pub index: usize,
    pub reason: String,
}

impl RecordError {
    pub fn new(index: usize, reason: impl Into<String>) -> Self {
        Self {
            index,
            reason: reason.into(),
        }
    }
}

/// Totals produced from a batch of snapshot records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub totals: UsageTotals,
    /// Records that failed and were skipped.
    pub skipped: usize,
}

/// Merges snapshots into per-key totals.
///
/// Non-positive durations contribute nothing, and a key whose snapshots all
/// report non-positive durations does not appear.
pub fn merge<'a, I>(snapshots: I) -> UsageTotals
where
    I: IntoIterator<Item = &'a UsageSnapshot>,
{
    let mut totals = UsageTotals::new();
    for snapshot in snapshots {
        add_snapshot(&mut totals, snapshot);
    }
    totals
}

/// Merges per-record results, skipping the records that failed.
pub fn merge_records<I>(records: I) -> MergeOutcome
where
    I: IntoIterator<Item = Result<UsageSnapshot, RecordError>>,
{
    let mut outcome = MergeOutcome::default();
    for record in records {
        match record {
            Ok(snapshot) => add_snapshot(&mut outcome.totals, &snapshot),
            Err(err) => {
                outcome.skipped += 1;
                tracing::warn!(error = %err, "skipping unreadable snapshot");
            }
        }
    }
    tracing::debug!(
        keys = outcome.totals.len(),
        skipped = outcome.skipped,
        "merged snapshots"
    );
    outcome
}

fn add_snapshot(totals: &mut UsageTotals, snapshot: &UsageSnapshot) {
    let contribution = snapshot.contribution();
    if contribution == 0 {
        tracing::trace!(
            key = %snapshot.key,
            reported = snapshot.interval_duration_ms,
            "ignoring empty snapshot"
        );
        return;
    }
    let total = totals.entry(snapshot.key.clone()).or_insert(0);
    *total = total.saturating_add(contribution);
}
