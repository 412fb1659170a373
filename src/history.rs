//! Durable progress history.
//!
//! The history log is the only state carried across cycles: a JSON file
//! holding the most recent cycle summaries in append order, bounded to
//! [`HISTORY_LIMIT`] entries. A missing or corrupt file is never an
//! error; the log restarts empty with the current time as its start
//! date.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::warn;

use crate::error::{Result, TrackerError};
use crate::progress::ProgressSummary;

/// Maximum entries retained after each append.
pub const HISTORY_LIMIT: usize = 100;

/// Temporary file suffix for atomic writes.
const TMP_SUFFIX: &str = ".tmp";

/// One per-cycle snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub progress: ProgressSummary,
    /// Tasks in progress at snapshot time.
    pub active_tasks: usize,
    /// Tasks completed at snapshot time.
    pub completed_tasks: usize,
}

/// The persisted log: entries in chronological append order plus the
/// date tracking began.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressLog {
    pub entries: Vec<LogEntry>,
    pub start_date: DateTime<Utc>,
}

impl ProgressLog {
    /// Create an empty log starting at `now`.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            entries: Vec::new(),
            start_date: now,
        }
    }

    /// Load the log from `path`.
    ///
    /// Missing file: fresh empty log. Unparseable file: logged and
    /// replaced by a fresh empty log on the next save. Neither case is
    /// an error.
    pub fn load(path: &Path, now: DateTime<Utc>) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::empty(now),
        };

        match serde_json::from_str(&content) {
            Ok(log) => log,
            Err(e) => {
                warn!(
                    "Corrupt progress log at {}: {e}. Starting fresh.",
                    path.display()
                );
                Self::empty(now)
            }
        }
    }

    /// Append an entry, then drop the oldest entries beyond
    /// [`HISTORY_LIMIT`].
    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
        if self.entries.len() > HISTORY_LIMIT {
            let excess = self.entries.len() - HISTORY_LIMIT;
            self.entries.drain(..excess);
        }
    }

    /// Persist the full log as formatted JSON.
    ///
    /// Writes to a sibling temp file and renames over the target so a
    /// crash mid-write cannot leave a truncated log.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        let tmp_path = path.with_extension(format!(
            "{}{TMP_SUFFIX}",
            path.extension().and_then(|e| e.to_str()).unwrap_or("json")
        ));

        let write = || -> std::io::Result<()> {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(json.as_bytes())?;
            tmp.sync_all()?;
            fs::rename(&tmp_path, path)
        };

        write().map_err(|e| TrackerError::history(path.to_path_buf(), e.to_string()))
    }
}
