//! End-to-end tests for the `ut` binary.
//!
//! Each test runs the built binary against an isolated HOME and a config
//! file pointing at data files in a temp directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn ut_binary() -> String {
    env!("CARGO_BIN_EXE_ut").to_string()
}

struct Workspace {
    temp: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        let root = temp.path().display();
        std::fs::write(
            &config,
            format!(
                r#"
events_path = "{root}/events.jsonl"
snapshots_path = "{root}/snapshots.jsonl"
metadata_path = "{root}/packages.json"
permission_marker = "{root}/state/usage-access"
"#
            ),
        )
        .unwrap();
        Self { temp, config }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    fn write(&self, name: &str, lines: &[&str]) {
        std::fs::write(self.path(name), lines.join("\n") + "\n").unwrap();
    }

    fn run(&self, args: &[&str]) -> Output {
        command(self.temp.path())
            .arg("--config")
            .arg(&self.config)
            .args(args)
            .output()
            .expect("failed to run ut")
    }

    fn grant(&self) {
        let output = self.run(&["permission", "grant"]);
        assert!(
            output.status.success(),
            "ut permission grant should succeed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn command(home: &Path) -> Command {
    let mut cmd = Command::new(ut_binary());
    cmd.env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("XDG_STATE_HOME")
        .env_remove("RUST_LOG");
    for var in [
        "UT_EVENTS_PATH",
        "UT_SNAPSHOTS_PATH",
        "UT_METADATA_PATH",
        "UT_PERMISSION_MARKER",
        "UT_DEFAULT_MODE",
        "UT_SESSION_POLICY",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "ut should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const EVENTS: &[&str] = &[
    r#"{"key":"com.example.mail","kind":"entered_foreground","timestamp":0}"#,
    r#"{"key":"com.example.mail","kind":"left_foreground","timestamp":100}"#,
    r#"{"key":"com.example.mail","kind":"entered_foreground","timestamp":200}"#,
    r#"{"key":"com.example.mail","kind":"left_foreground","timestamp":250}"#,
    r#"{"key":"com.example.maps","kind":"entered_foreground","timestamp":300}"#,
    r#"{"key":"com.example.chat","kind":"entered_foreground","timestamp":350}"#,
    r#"{"key":"com.example.chat","kind":"left_foreground","timestamp":400}"#,
];

#[test]
fn test_usage_requires_permission() {
    let ws = Workspace::new();
    ws.write("events.jsonl", EVENTS);

    let output = ws.run(&["usage", "--start", "0", "--end", "1000"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("usage access not granted"),
        "unexpected stderr: {}",
        stderr(&output)
    );
}

#[test]
fn test_missing_start_is_rejected_before_permission_check() {
    let ws = Workspace::new();

    let output = ws.run(&["usage", "--end", "1000"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("missing start time"),
        "unexpected stderr: {}",
        stderr(&output)
    );
}

#[test]
fn test_events_mode_pairs_sessions() {
    let ws = Workspace::new();
    ws.grant();
    ws.write("events.jsonl", EVENTS);

    let output = ws.run(&["usage", "--start", "0", "--end", "1000", "--json"]);
    let json = stdout_json(&output);

    assert_eq!(
        json,
        serde_json::json!([
            {"key": "com.example.mail", "total_foreground_ms": 150},
            {"key": "com.example.chat", "total_foreground_ms": 50},
        ])
    );
}

#[test]
fn test_events_mode_respects_window() {
    let ws = Workspace::new();
    ws.grant();
    ws.write("events.jsonl", EVENTS);

    // The exit at 250 is outside [0, 250), so the second mail session is unpaired.
    let output = ws.run(&["usage", "--start", "0", "--end", "250", "--json"]);
    let json = stdout_json(&output);

    assert_eq!(
        json,
        serde_json::json!([{"key": "com.example.mail", "total_foreground_ms": 100}])
    );
}

#[test]
fn test_per_key_policy_counts_interleaved_sessions() {
    let ws = Workspace::new();
    ws.grant();
    ws.write(
        "events.jsonl",
        &[
            r#"{"key":"a","kind":"entered_foreground","timestamp":0}"#,
            r#"{"key":"b","kind":"entered_foreground","timestamp":10}"#,
            r#"{"key":"b","kind":"left_foreground","timestamp":30}"#,
            r#"{"key":"a","kind":"left_foreground","timestamp":100}"#,
        ],
    );

    let single = stdout_json(&ws.run(&["usage", "--start", "0", "--end", "1000", "--json"]));
    assert_eq!(
        single,
        serde_json::json!([{"key": "b", "total_foreground_ms": 20}])
    );

    let per_key = stdout_json(&ws.run(&[
        "usage", "--start", "0", "--end", "1000", "--policy", "per-key", "--json",
    ]));
    assert_eq!(
        per_key,
        serde_json::json!([
            {"key": "a", "total_foreground_ms": 100},
            {"key": "b", "total_foreground_ms": 20},
        ])
    );
}

#[test]
fn test_snapshot_mode_merges_days_and_skips_bad_lines() {
    let ws = Workspace::new();
    ws.grant();
    ws.write(
        "snapshots.jsonl",
        &[
            r#"{"key":"com.example.mail","interval_duration_ms":50,"interval_start":0,"interval_end":86400000}"#,
            r#"{"key":"com.example.maps","interval_duration_ms":30,"interval_start":0,"interval_end":86400000}"#,
            r#"{"key":"com.example.mail","interval_duration_ms":"#,
            r#"{"key":"com.example.mail","interval_duration_ms":20,"interval_start":86400000,"interval_end":172800000}"#,
            r#"{"key":"com.example.idle","interval_duration_ms":0,"interval_start":0,"interval_end":86400000}"#,
        ],
    );

    let output = ws.run(&[
        "usage",
        "--start",
        "1970-01-01T12:00:00Z",
        "--end",
        "1970-01-02T12:00:00Z",
        "--mode",
        "snapshots",
        "--json",
    ]);
    let json = stdout_json(&output);

    assert_eq!(
        json,
        serde_json::json!([
            {"key": "com.example.mail", "total_foreground_ms": 70},
            {"key": "com.example.maps", "total_foreground_ms": 30},
        ])
    );
}

#[test]
fn test_enriched_mode_drops_unknown_packages() {
    let ws = Workspace::new();
    ws.grant();
    ws.write(
        "snapshots.jsonl",
        &[
            r#"{"key":"com.example.mail","interval_duration_ms":100,"interval_start":0,"interval_end":86400000}"#,
            r#"{"key":"com.example.gone","interval_duration_ms":50,"interval_start":0,"interval_end":86400000}"#,
        ],
    );
    ws.write(
        "packages.json",
        &[r#"{"com.example.mail": {"display_name": "Mail", "version_name": "4.2", "version_code": 42}}"#],
    );

    let output = ws.run(&[
        "usage", "--start", "0", "--end", "86400000", "--mode", "enriched", "--json",
    ]);
    let json = stdout_json(&output);

    assert_eq!(
        json,
        serde_json::json!([{
            "key": "com.example.mail",
            "total_foreground_ms": 100,
            "display_name": "Mail",
            "version_name": "4.2",
            "version_code": 42,
        }])
    );
}

#[test]
fn test_missing_source_is_unsupported() {
    let ws = Workspace::new();
    ws.grant();

    let output = ws.run(&["usage", "--start", "0", "--end", "1000"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("unsupported environment"),
        "unexpected stderr: {}",
        stderr(&output)
    );
}

#[test]
fn test_enriched_mode_without_store_is_unsupported() {
    let ws = Workspace::new();
    ws.grant();

    let output = ws.run(&[
        "usage", "--start", "0", "--end", "1000", "--mode", "enriched",
    ]);
    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(
        stderr.contains("unsupported environment: snapshot store"),
        "unexpected stderr: {stderr}"
    );
    assert!(!stderr.contains("package catalog"), "unexpected stderr: {stderr}");
}

#[test]
fn test_enriched_mode_requires_catalog_when_store_exists() {
    let ws = Workspace::new();
    ws.grant();
    ws.write(
        "snapshots.jsonl",
        &[r#"{"key":"com.example.mail","interval_duration_ms":100,"interval_start":0,"interval_end":86400000}"#],
    );

    let output = ws.run(&[
        "usage", "--start", "0", "--end", "86400000", "--mode", "enriched",
    ]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("failed to read package catalog"),
        "unexpected stderr: {}",
        stderr(&output)
    );
}

#[test]
fn test_human_output_lists_total() {
    let ws = Workspace::new();
    ws.grant();
    ws.write("events.jsonl", EVENTS);

    let output = ws.run(&["usage", "--start", "0", "--end", "1000"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Foreground usage [1970-01-01T00:00:00Z, 1970-01-01T00:00:01Z)"));
    assert!(stdout.contains("com.example.mail"));
    assert!(stdout.contains("Total"));
}

#[test]
fn test_permission_request_does_not_grant() {
    let ws = Workspace::new();

    let request = ws.run(&["permission", "request"]);
    assert!(request.status.success());
    assert!(stderr(&request).contains("ut permission grant"));

    let status = ws.run(&["permission", "status"]);
    assert_eq!(
        String::from_utf8_lossy(&status.stdout).trim(),
        "usage access: not granted"
    );

    ws.grant();
    let status = ws.run(&["permission", "status"]);
    assert_eq!(
        String::from_utf8_lossy(&status.stdout).trim(),
        "usage access: granted"
    );

    let revoke = ws.run(&["permission", "revoke"]);
    assert!(revoke.status.success());
    assert!(!ws.path("state/usage-access").exists());
}

#[test]
fn test_platform_prints_os_and_arch() {
    let output = command(TempDir::new().unwrap().path())
        .arg("platform")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
    );
}
