//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use ut_core::{QueryMode, SessionPolicy};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSONL file of foreground lifecycle events.
    pub events_path: PathBuf,

    /// JSONL file of daily usage snapshots.
    pub snapshots_path: PathBuf,

    /// JSON catalog of package metadata, keyed by application key.
    pub metadata_path: PathBuf,

    /// Marker file whose presence grants usage access.
    pub permission_marker: PathBuf,

    /// Acquisition path used when `--mode` is not given.
    #[serde(default)]
    pub default_mode: QueryMode,

    /// How open sessions are tracked in events mode.
    #[serde(default)]
    pub session_policy: SessionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let state_dir = dirs_state_path().unwrap_or_else(|| data_dir.clone());
        Self {
            events_path: data_dir.join("events.jsonl"),
            snapshots_path: data_dir.join("snapshots.jsonl"),
            metadata_path: data_dir.join("packages.json"),
            permission_marker: state_dir.join("usage-access"),
            default_mode: QueryMode::default(),
            session_policy: SessionPolicy::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default locations, optionally merging a
    /// specific file on top.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (UT_*)
        figment = figment.merge(Env::prefixed("UT_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for ut.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ut"))
}

/// Returns the platform-specific data directory for ut.
///
/// On Linux: `~/.local/share/ut`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("ut"))
}

/// Returns the platform-specific state directory for ut.
///
/// On Linux: `~/.local/state/ut`
pub fn dirs_state_path() -> Option<PathBuf> {
    dirs::state_dir().map(|p| p.join("ut"))
}
