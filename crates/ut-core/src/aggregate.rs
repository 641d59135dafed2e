//! Aggregate results, the output contract of both acquisition paths.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::AppKey;

/// Accumulated foreground milliseconds per key.
pub type UsageTotals = HashMap<AppKey, i64>;

/// Total foreground time for one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub key: AppKey,
    pub total_foreground_ms: i64,
}

/// Turns a totals mapping into results, one per entry.
///
/// Keys and durations pass through unchanged; an explicit zero is emitted as
/// zero. Results are ordered by descending duration, then key.
pub fn build(totals: &UsageTotals) -> Vec<AggregateResult> {
    let mut results: Vec<_> = totals
        .iter()
        .map(|(key, &total_foreground_ms)| AggregateResult {
            key: key.clone(),
            total_foreground_ms,
        })
        .collect();
    results.sort_by(|a, b| {
        b.total_foreground_ms
            .cmp(&a.total_foreground_ms)
            .then_with(|| a.key.cmp(&b.key))
    });
    results
}

/// Sum of all results' foreground time.
pub fn total_ms<'a>(results: impl IntoIterator<Item = &'a AggregateResult>) -> i64 {
    results
        .into_iter()
        .fold(0_i64, |acc, r| acc.saturating_add(r.total_foreground_ms))
}
