//! Usage access backed by a marker file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use ut_core::PermissionGate;

/// Grants usage access while a marker file exists.
#[derive(Debug, Clone)]
pub struct MarkerPermission {
    marker: PathBuf,
}

impl MarkerPermission {
    pub fn new(marker: impl Into<PathBuf>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Creates the marker, granting access.
    pub fn grant(&self) -> Result<()> {
        if let Some(parent) = self.marker.parent() {
            std::fs::create_dir_all(parent).context("failed to create state directory")?;
        }
        std::fs::write(&self.marker, format!("granted_at={}\n", Utc::now().to_rfc3339()))
            .with_context(|| format!("failed to write {}", self.marker.display()))?;
        tracing::debug!(marker = %self.marker.display(), "usage access granted");
        Ok(())
    }

    /// Removes the marker. Revoking twice is not an error.
    pub fn revoke(&self) -> Result<()> {
        match std::fs::remove_file(&self.marker) {
            Ok(()) => {
                tracing::debug!(marker = %self.marker.display(), "usage access revoked");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("failed to remove {}", self.marker.display()))
            }
        }
    }
}

impl PermissionGate for MarkerPermission {
    fn has_permission(&self) -> bool {
        self.marker.is_file()
    }

    fn request_permission(&self) {
        // The "settings screen" on this platform is the grant command.
        tracing::info!(marker = %self.marker.display(), "usage access requested");
        eprintln!("Usage access is not granted automatically.");
        eprintln!("To allow ut to read usage data, run: ut permission grant");
        eprintln!("(creates {})", self.marker.display());
    }
}
