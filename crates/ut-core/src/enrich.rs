//! Package metadata enrichment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::AggregateResult;
use crate::types::AppKey;

/// Display metadata for an installed application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Human-readable application label.
    pub display_name: String,
    /// Version string. Some packages do not declare one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,
    #[serde(default)]
    pub version_code: i64,
}

/// Errors returned by a metadata lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The key does not resolve, e.g. the application was uninstalled
    /// after its usage was recorded.
    #[error("package not found")]
    NotFound,
    #[error("metadata unavailable: {0}")]
    Unavailable(String),
}

/// Resolves display metadata for application keys.
pub trait MetadataLookup {
    fn lookup(&self, key: &AppKey) -> Result<PackageMetadata, LookupError>;
}

impl<F> MetadataLookup for F
where
    F: Fn(&AppKey) -> Result<PackageMetadata, LookupError>,
{
    fn lookup(&self, key: &AppKey) -> Result<PackageMetadata, LookupError> {
        self(key)
    }
}

/// An aggregate result carrying its application's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedResult {
    #[serde(flatten)]
    pub result: AggregateResult,
    #[serde(flatten)]
    pub metadata: PackageMetadata,
}

/// Attaches metadata to one result, or drops it if the lookup fails.
pub fn enrich<L>(result: AggregateResult, lookup: &L) -> Option<EnrichedResult>
where
    L: MetadataLookup + ?Sized,
{
    match lookup.lookup(&result.key) {
        Ok(metadata) => Some(EnrichedResult { result, metadata }),
        Err(LookupError::NotFound) => {
            tracing::debug!(key = %result.key, "dropping result without package metadata");
            None
        }
        Err(err) => {
            tracing::warn!(key = %result.key, error = %err, "dropping result, metadata lookup failed");
            None
        }
    }
}

/// Enriches every result, keeping the input order of those that resolve.
pub fn enrich_all<I, L>(results: I, lookup: &L) -> Vec<EnrichedResult>
where
    I: IntoIterator<Item = AggregateResult>,
    L: MetadataLookup + ?Sized,
{
    results
        .into_iter()
        .filter_map(|result| enrich(result, lookup))
        .collect()
}
