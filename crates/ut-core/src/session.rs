//! Foreground session reconstruction.
//!
//! Pairs `EnteredForeground` and `LeftForeground` events into sessions and
//! sums their lengths per key.
//!
//! # Algorithm Summary
//!
//! 1. Scan events in arrival order (the source delivers them sorted by timestamp)
//! 2. An entry opens a candidate session, replacing any unmatched candidate
//! 3. An exit for the candidate's key closes it; positive lengths are added
//!
//! Nothing here signals an error. Unpaired or out-of-order events degrade to
//! under-counting.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::UsageTotals;
use crate::event::{UsageEvent, UsageEventKind};
use crate::types::AppKey;

/// How open sessions are tracked while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionPolicy {
    /// One candidate session for the whole stream. Any exit clears it, and
    /// a new entry replaces it ("last resume wins"). This relies on only one
    /// application being in the foreground at a time.
    #[default]
    SingleSlot,
    /// One open session per key. Interleaved sessions of different keys are
    /// each counted. A repeated entry for the same key still replaces the
    /// earlier one.
    PerKey,
}

impl SessionPolicy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SingleSlot => "single-slot",
            Self::PerKey => "per-key",
        }
    }
}

impl std::fmt::Display for SessionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single-slot" => Ok(Self::SingleSlot),
            "per-key" => Ok(Self::PerKey),
            _ => Err(format!("invalid session policy: {s}")),
        }
    }
}

/// Options for session reconstruction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconstructOptions {
    pub policy: SessionPolicy,
}

/// A session that has been entered but not yet left.
#[derive(Debug, Clone)]
struct OpenSession {
    key: AppKey,
    entered_at: i64,
}

/// Reconstructs per-key foreground time using the single-slot policy.
pub fn reconstruct<'a, I>(events: I) -> UsageTotals
where
    I: IntoIterator<Item = &'a UsageEvent>,
{
    reconstruct_with(events, &ReconstructOptions::default())
}

/// Reconstructs per-key foreground time with explicit options.
pub fn reconstruct_with<'a, I>(events: I, options: &ReconstructOptions) -> UsageTotals
where
    I: IntoIterator<Item = &'a UsageEvent>,
{
    let mut totals = UsageTotals::new();
    let mut scanned = 0_usize;
    let mut discarded = 0_usize;

    let mut add_session = |key: &AppKey, entered_at: i64, left_at: i64| {
        let duration_ms = left_at.saturating_sub(entered_at);
        if duration_ms > 0 {
            let total = totals.entry(key.clone()).or_insert(0);
            *total = total.saturating_add(duration_ms);
        } else {
            discarded += 1;
            tracing::trace!(%key, entered_at, left_at, "discarding non-positive session");
        }
    };

    match options.policy {
        SessionPolicy::SingleSlot => {
            let mut candidate: Option<OpenSession> = None;
            for event in events {
                scanned += 1;
                match event.kind {
                    UsageEventKind::EnteredForeground => {
                        if let Some(previous) = candidate.replace(OpenSession {
                            key: event.key.clone(),
                            entered_at: event.timestamp,
                        }) {
                            tracing::trace!(key = %previous.key, "unmatched entry replaced");
                        }
                    }
                    UsageEventKind::LeftForeground => {
                        if let Some(open) = candidate.take() {
                            if open.key == event.key {
                                add_session(&event.key, open.entered_at, event.timestamp);
                            } else {
                                tracing::trace!(
                                    open = %open.key,
                                    left = %event.key,
                                    "exit does not match open session"
                                );
                            }
                        }
                    }
                }
            }
        }
        SessionPolicy::PerKey => {
            let mut open: HashMap<AppKey, i64> = HashMap::new();
            for event in events {
                scanned += 1;
                match event.kind {
                    UsageEventKind::EnteredForeground => {
                        if open.insert(event.key.clone(), event.timestamp).is_some() {
                            tracing::trace!(key = %event.key, "unmatched entry replaced");
                        }
                    }
                    UsageEventKind::LeftForeground => {
                        if let Some(entered_at) = open.remove(&event.key) {
                            add_session(&event.key, entered_at, event.timestamp);
                        }
                    }
                }
            }
        }
    }

    tracing::debug!(
        policy = %options.policy,
        scanned,
        discarded,
        keys = totals.len(),
        "reconstructed foreground sessions"
    );
    totals
}
