//! Package metadata catalog backed by a JSON file.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use ut_core::{AppKey, LookupError, MetadataLookup, PackageMetadata};

/// Installed packages, keyed by application key.
///
/// The file is a single JSON object:
///
/// ```json
/// { "com.example.mail": { "display_name": "Mail", "version_name": "4.2", "version_code": 42 } }
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    packages: HashMap<String, PackageMetadata>,
}

impl JsonCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read package catalog {}", path.display()))?;
        let packages: HashMap<String, PackageMetadata> = serde_json::from_str(&content)
            .with_context(|| format!("invalid package catalog {}", path.display()))?;
        tracing::debug!(path = %path.display(), packages = packages.len(), "loaded package catalog");
        Ok(Self { packages })
    }
}

impl MetadataLookup for JsonCatalog {
    fn lookup(&self, key: &AppKey) -> Result<PackageMetadata, LookupError> {
        self.packages
            .get(key.as_str())
            .cloned()
            .ok_or(LookupError::NotFound)
    }
}
