//! Usage tracker CLI library.
//!
//! This crate provides the CLI interface and the file-backed collaborators
//! (event and snapshot sources, package catalog, permission marker) that the
//! aggregation engine in `ut-core` is queried through.

pub mod catalog;
mod cli;
pub mod commands;
mod config;
pub mod permission;
pub mod sources;

pub use cli::{Cli, Commands};
pub use config::Config;
