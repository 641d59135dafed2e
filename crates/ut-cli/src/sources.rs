//! File-backed usage sources.
//!
//! Both sources read JSONL: one JSON object per line, blank lines ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use ut_core::{
    EventSource, RecordError, SnapshotSource, SourceError, UsageEvent, UsageSnapshot, UsageSource,
    UsageWindow,
};

/// Buffer size for `BufReader`.
const BUFFER_SIZE: usize = 64 * 1024;

/// Opens `path` and yields its lines with 1-based line numbers.
fn open_lines(
    path: &Path,
) -> Result<impl Iterator<Item = (usize, std::io::Result<String>)>, SourceError> {
    let file = File::open(path)?;
    Ok(BufReader::with_capacity(BUFFER_SIZE, file)
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line)))
}

/// Lifecycle events recorded one per line.
#[derive(Debug, Clone)]
pub struct JsonlEventSource {
    path: PathBuf,
}

impl JsonlEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UsageSource for JsonlEventSource {
    fn supports_usage_query(&self) -> bool {
        self.path.is_file()
    }

    fn describe(&self) -> String {
        format!("event log {}", self.path.display())
    }
}

impl EventSource for JsonlEventSource {
    fn events(&self, window: UsageWindow) -> Result<Vec<UsageEvent>, SourceError> {
        let mut events = Vec::new();
        let mut malformed = 0_usize;

        for (line_no, line) in open_lines(&self.path)? {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<UsageEvent>(trimmed) {
                Ok(event) if window.contains(event.timestamp) => events.push(event),
                Ok(_) => {}
                Err(err) => {
                    malformed += 1;
                    tracing::warn!(line = line_no, error = %err, "skipping malformed event");
                }
            }
        }

        // Stable, so simultaneous events keep their recorded order.
        events.sort_by_key(|e| e.timestamp);

        tracing::debug!(
            path = %self.path.display(),
            events = events.len(),
            malformed,
            "loaded events"
        );
        Ok(events)
    }
}

/// Daily usage snapshots recorded one per line.
///
/// Like a daily usage bucket store, whole snapshots are returned for every
/// bucket that overlaps the window; they are not clipped.
#[derive(Debug, Clone)]
pub struct JsonlSnapshotSource {
    path: PathBuf,
}

impl JsonlSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UsageSource for JsonlSnapshotSource {
    fn supports_usage_query(&self) -> bool {
        self.path.is_file()
    }

    fn describe(&self) -> String {
        format!("snapshot store {}", self.path.display())
    }
}

impl SnapshotSource for JsonlSnapshotSource {
    fn snapshots(
        &self,
        window: UsageWindow,
    ) -> Result<Vec<Result<UsageSnapshot, RecordError>>, SourceError> {
        let mut records = Vec::new();

        for (line_no, line) in open_lines(&self.path)? {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<UsageSnapshot>(trimmed) {
                Ok(snapshot) if window.overlaps(snapshot.interval_start, snapshot.interval_end) => {
                    records.push(Ok(snapshot));
                }
                Ok(_) => {}
                Err(err) => records.push(Err(RecordError::new(line_no, err.to_string()))),
            }
        }

        tracing::debug!(path = %self.path.display(), records = records.len(), "loaded snapshots");
        Ok(records)
    }
}
