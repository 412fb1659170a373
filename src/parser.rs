//! Checklist parsing.
//!
//! Extracts task records from a markdown checklist. One line grammar is
//! recognized: a list-item marker, a bracketed status character, a
//! period-terminated task number, then the title. Everything else is
//! ignored.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Line grammar: `- [<status>] <number>. <title>`.
///
/// Recognized status characters are space, `x`, and `-`. There is no
/// bracket character for blocked; see [`TaskStatus::Blocked`].
static TASK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- \[([ x-])\] (\d+)\. (.+)").unwrap());

/// Completion state of a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
    /// Not producible by the checklist grammar; carried through the data
    /// model, report, and log for manual or future tooling that sets it.
    Blocked,
}

impl TaskStatus {
    /// Human label used in the rendered report.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Blocked => "Blocked",
        }
    }

    fn from_marker(marker: &str) -> Self {
        match marker {
            "x" => TaskStatus::Completed,
            "-" => TaskStatus::InProgress,
            _ => TaskStatus::NotStarted,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single parsed task record.
///
/// Rebuilt from the checklist on every cycle; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Source-defined task number.
    pub number: u32,
    /// Title with surrounding whitespace trimmed.
    pub title: String,
    pub status: TaskStatus,
    /// The matching source line, verbatim.
    pub raw_line: String,
}

/// Parse checklist text into task records.
///
/// Lines that do not match the grammar contribute nothing; parsing the
/// same content twice yields identical records.
pub fn parse_tasks(content: &str) -> Vec<Task> {
    let mut tasks = Vec::new();

    for line in content.lines() {
        let Some(caps) = TASK_LINE.captures(line) else {
            continue;
        };
        let Ok(number) = caps[2].parse::<u32>() else {
            debug!("Skipping task line with out-of-range number: {line}");
            continue;
        };
        tasks.push(Task {
            number,
            title: caps[3].trim().to_string(),
            status: TaskStatus::from_marker(&caps[1]),
            raw_line: line.to_string(),
        });
    }

    tasks
}

/// Read and parse the checklist file.
///
/// A missing or unreadable checklist degrades to zero tasks: the failure
/// is logged and an empty sequence returned, so one bad read never stops
/// a cycle.
pub fn read_tasks(path: &Path) -> Vec<Task> {
    match fs::read_to_string(path) {
        Ok(content) => parse_tasks(&content),
        Err(e) => {
            warn!("Failed to read checklist {}: {e}", path.display());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_statuses() {
        let content = "- [x] 1. Setup project\n- [-] 2. Build UI\n- [ ] 3. Write docs\n";
        let tasks = parse_tasks(content);
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].status, TaskStatus::Completed);
        assert_eq!(tasks[1].status, TaskStatus::InProgress);
        assert_eq!(tasks[2].status, TaskStatus::NotStarted);
        assert_eq!(tasks[0].number, 1);
        assert_eq!(tasks[0].title, "Setup project");
    }

    #[test]
    fn test_non_matching_lines_ignored() {
        let content = "\
# Tasks

Some prose about the project.
- [x] 1. Setup project
- not a task
* [x] 2. Wrong marker
- [?] 3. Unknown status char
- [x] 4 missing period
  - [x] 5. Indented
";
        let tasks = parse_tasks(content);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].number, 1);
    }

    #[test]
    fn test_title_trimmed_raw_line_verbatim() {
        let line = "- [x] 7. Polish the canvas   ";
        let tasks = parse_tasks(line);
        assert_eq!(tasks[0].title, "Polish the canvas");
        assert_eq!(tasks[0].raw_line, line);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let content = "- [x] 1. Setup project\n- [-] 2. Build UI\n";
        assert_eq!(parse_tasks(content), parse_tasks(content));
    }

    #[test]
    fn test_empty_content() {
        assert!(parse_tasks("").is_empty());
    }

    #[test]
    fn test_out_of_range_number_skipped() {
        let tasks = parse_tasks("- [x] 99999999999999999999. Impossible\n- [x] 2. Fine\n");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].number, 2);
    }

    #[test]
    fn test_read_missing_file_yields_empty() {
        let tasks = read_tasks(Path::new("/nonexistent/tasks.md"));
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(TaskStatus::NotStarted.label(), "Not Started");
        assert_eq!(TaskStatus::Blocked.to_string(), "Blocked");
    }
}
