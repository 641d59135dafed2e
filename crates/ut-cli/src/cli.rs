//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::permission::PermissionAction;
use crate::commands::usage::UsageArgs;

/// Per-application foreground usage reports.
///
/// Pairs foreground lifecycle events into sessions, or sums daily usage
/// snapshots, and reports how long each application was in the foreground.
#[derive(Debug, Parser)]
#[command(name = "ut", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report foreground time per application for a range.
    Usage(UsageArgs),

    /// Inspect or change usage access.
    Permission {
        #[command(subcommand)]
        action: PermissionAction,
    },

    /// Print the platform identifier.
    Platform,
}
