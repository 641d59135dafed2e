//! CLI subcommand implementations.

pub mod permission;
pub mod usage;
pub mod util;
