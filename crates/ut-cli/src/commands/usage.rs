//! Usage command: per-application foreground time for a range.
//!
//! This module implements `ut usage --start <T> --end <T>` with the three
//! acquisition modes (events, snapshots, enriched) and two output formats
//! (human-readable, JSON).

use std::fmt::Write;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use ut_core::{
    Acquisition, PermissionGate, QueryError, QueryMode, ReconstructOptions, SessionPolicy,
    UsageReport, UsageSource, UsageWindow, usage_in_range, validate_range,
};

use super::util::{format_duration, parse_time_ms};
use crate::Config;
use crate::catalog::JsonCatalog;
use crate::permission::MarkerPermission;
use crate::sources::{JsonlEventSource, JsonlSnapshotSource};

#[derive(Debug, Args)]
pub struct UsageArgs {
    /// Start of the range (inclusive): epoch ms, ISO 8601, 'now' or e.g. '1 day ago'.
    #[arg(long)]
    pub start: Option<String>,

    /// End of the range (exclusive), same formats as --start.
    #[arg(long)]
    pub end: Option<String>,

    /// Acquisition path. Defaults to the configured mode.
    #[arg(long)]
    pub mode: Option<QueryMode>,

    /// Session pairing policy for events mode. Defaults to the configured policy.
    #[arg(long)]
    pub policy: Option<SessionPolicy>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Runs the usage command, printing the report to stdout.
pub fn run(args: &UsageArgs, config: &Config) -> Result<()> {
    let now = Utc::now();
    let start = args
        .start
        .as_deref()
        .map(|s| parse_time_ms(s, now))
        .transpose()
        .context("invalid --start")?;
    let end = args
        .end
        .as_deref()
        .map(|s| parse_time_ms(s, now))
        .transpose()
        .context("invalid --end")?;

    // Missing arguments are reported before anything else is touched.
    let window = validate_range(start, end)?;

    let gate = MarkerPermission::new(&config.permission_marker);
    if !gate.has_permission() {
        anyhow::bail!("usage access not granted; run `ut permission request`");
    }

    let mode = args.mode.unwrap_or(config.default_mode);
    let report = query(window, mode, args.policy.unwrap_or(config.session_policy), config)?;

    let output = if args.json {
        serde_json::to_string_pretty(&report)?
    } else {
        render_report(&report, window)
    };
    println!("{output}");
    Ok(())
}

fn query(
    window: UsageWindow,
    mode: QueryMode,
    policy: SessionPolicy,
    config: &Config,
) -> Result<UsageReport> {
    let (start, end) = (Some(window.start), Some(window.end));
    let report = match mode {
        QueryMode::Events => {
            let source = JsonlEventSource::new(&config.events_path);
            usage_in_range(
                start,
                end,
                &Acquisition::Events {
                    source: &source,
                    options: ReconstructOptions { policy },
                },
            )?
        }
        QueryMode::Snapshots => {
            let source = JsonlSnapshotSource::new(&config.snapshots_path);
            usage_in_range(start, end, &Acquisition::Snapshots { source: &source })?
        }
        QueryMode::Enriched => {
            let source = JsonlSnapshotSource::new(&config.snapshots_path);
            // The catalog is only read once the snapshot store is known to exist.
            if !source.supports_usage_query() {
                return Err(QueryError::UnsupportedEnvironment(source.describe()).into());
            }
            let catalog = JsonCatalog::load(&config.metadata_path)?;
            usage_in_range(
                start,
                end,
                &Acquisition::Enriched {
                    source: &source,
                    lookup: &catalog,
                },
            )?
        }
    };
    Ok(report)
}

/// Renders a report as an aligned text table.
pub fn render_report(report: &UsageReport, window: UsageWindow) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Foreground usage {window}");

    let rows: Vec<(String, i64)> = match report {
        UsageReport::Aggregates(results) => results
            .iter()
            .map(|r| (r.key.to_string(), r.total_foreground_ms))
            .collect(),
        UsageReport::Enriched(results) => results
            .iter()
            .map(|e| {
                let name = &e.metadata.display_name;
                let key = &e.result.key;
                let label = e.metadata.version_name.as_ref().map_or_else(
                    || format!("{name} ({key})"),
                    |version| format!("{name} {version} ({key})"),
                );
                (label, e.result.total_foreground_ms)
            })
            .collect(),
    };

    if rows.is_empty() {
        let _ = writeln!(output, "\nNo foreground usage recorded.");
        return output;
    }

    let total = report.total_ms();
    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0)
        .max("Total".len());

    output.push('\n');
    for (label, ms) in &rows {
        let _ = writeln!(output, "  {label:<width$}  {:>8}", format_duration(*ms));
    }
    let _ = writeln!(output, "  {:<width$}  {:>8}", "Total", format_duration(total));
    output
}
