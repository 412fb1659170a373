//! Status report rendering.
//!
//! Formats one cycle's parsed tasks, summary, and milestone rollup into
//! the markdown status document and overwrites the report file with it.
//! Rendering is deterministic given its inputs; the generation instant
//! is a parameter, not read from the clock, so tests can pin it.

use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::parser::{Task, TaskStatus};
use crate::progress::{MilestoneProgress, MilestoneStatus, ProgressSummary};

/// Shortlist length for the active / recently-completed / upcoming
/// sections.
const SHORTLIST_LEN: usize = 3;

/// Characters of a task title shown in the detailed table.
const TABLE_TITLE_LEN: usize = 20;

/// Timestamp format used throughout the report.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// One cycle's worth of data, ready to render.
#[derive(Debug, Clone)]
pub struct StatusReport<'a> {
    pub config: &'a TrackerConfig,
    pub tasks: &'a [Task],
    pub summary: &'a ProgressSummary,
    pub milestones: &'a [MilestoneProgress],
    /// Instant the report is generated at; also anchors the
    /// next-update footer.
    pub generated_at: DateTime<Utc>,
}

impl StatusReport<'_> {
    /// Render the full document.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_header(&mut out);
        self.render_summary(&mut out);
        self.render_sprint(&mut out);
        self.render_shortlists(&mut out);
        self.render_milestones(&mut out);
        self.render_task_table(&mut out);
        self.render_time_tracking(&mut out);
        self.render_blockers(&mut out);
        self.render_notes(&mut out);
        self.render_footer(&mut out);
        out
    }

    /// Render and overwrite the report file at `path`.
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())
            .map_err(|e| TrackerError::report(path.to_path_buf(), e.to_string()))
    }

    fn timestamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// The milestone shown as the current sprint: the first one in
    /// progress, else the first overall.
    fn current_sprint(&self) -> Option<&MilestoneProgress> {
        self.milestones
            .iter()
            .find(|m| m.status == MilestoneStatus::InProgress)
            .or_else(|| self.milestones.first())
    }

    fn render_header(&self, out: &mut String) {
        let _ = writeln!(out, "# {} - Progress Tracker", self.config.project_name);
        let _ = writeln!(out);
        let _ = writeln!(out, "## Project Overview");
        let _ = writeln!(out, "**Project Name**: {}  ", self.config.project_name);
        let _ = writeln!(out, "**Start Date**: {}  ", self.config.start_date);
        let _ = writeln!(out, "**Target Completion**: TBD  ");
        let _ = writeln!(out, "**Last Updated**: {}  ", self.timestamp());
        let _ = writeln!(out);
    }

    fn render_summary(&self, out: &mut String) {
        let s = self.summary;
        let _ = writeln!(out, "## Progress Summary");
        let _ = writeln!(out, "- **Total Tasks**: {}", s.total);
        let _ = writeln!(
            out,
            "- **Completed**: {} ({}%)",
            s.completed, s.completed_percent
        );
        let _ = writeln!(
            out,
            "- **In Progress**: {} ({}%)",
            s.in_progress, s.in_progress_percent
        );
        let _ = writeln!(
            out,
            "- **Not Started**: {} ({}%)",
            s.not_started, s.not_started_percent
        );
        let _ = writeln!(out, "- **Blocked**: {} ({}%)", s.blocked, s.blocked_percent);
        let _ = writeln!(out);
    }

    fn render_sprint(&self, out: &mut String) {
        let _ = writeln!(out, "## Current Sprint Status");
        match self.current_sprint() {
            Some(sprint) => {
                let _ = writeln!(out, "**Sprint**: {}  ", sprint.milestone.name);
                let _ = writeln!(
                    out,
                    "**Sprint Goal**: {}  ",
                    self.config.sprint_goal_for(&sprint.milestone.name)
                );
                let _ = writeln!(
                    out,
                    "**Sprint Progress**: {}/{} tasks completed  ",
                    sprint.completed, sprint.total
                );
            }
            None => {
                let _ = writeln!(out, "**Sprint**: No milestones defined  ");
            }
        }
        let _ = writeln!(out);
    }

    fn render_shortlists(&self, out: &mut String) {
        let active: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::InProgress)
            .take(SHORTLIST_LEN)
            .collect();
        let completed: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .collect();
        let recently_completed =
            &completed[completed.len().saturating_sub(SHORTLIST_LEN)..];
        let upcoming: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::NotStarted)
            .take(SHORTLIST_LEN)
            .collect();

        let _ = writeln!(out, "### Active Tasks");
        if active.is_empty() {
            let _ = writeln!(out, "- None currently active");
        }
        for task in &active {
            let _ = writeln!(out, "- {}. {}", task.number, task.title);
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "### Recently Completed");
        if recently_completed.is_empty() {
            let _ = writeln!(out, "- None yet");
        }
        for task in recently_completed {
            let _ = writeln!(out, "- {}. {}", task.number, task.title);
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "### Upcoming Tasks (Next {SHORTLIST_LEN})");
        for task in &upcoming {
            let _ = writeln!(out, "- {}. {}", task.number, task.title);
        }
        let _ = writeln!(out);
    }

    fn render_milestones(&self, out: &mut String) {
        let _ = writeln!(out, "## Milestone Progress");
        let _ = writeln!(out);
        for (index, m) in self.milestones.iter().enumerate() {
            let first = m.milestone.tasks.first().copied().unwrap_or(0);
            let last = m.milestone.tasks.last().copied().unwrap_or(0);
            let _ = writeln!(
                out,
                "### Milestone {}: {} (Tasks {first}-{last})",
                index + 1,
                m.milestone.name
            );
            let _ = writeln!(out, "- **Progress**: {}/{} ({}%)", m.completed, m.total, m.percent);
            let _ = writeln!(out, "- **Target Date**: {}", m.milestone.target);
            let _ = writeln!(out, "- **Status**: {}", m.status.label());
            let _ = writeln!(out);
        }
    }

    fn render_task_table(&self, out: &mut String) {
        let _ = writeln!(out, "## Detailed Task Status");
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "| Task | Status | Progress | Estimated Hours | Actual Hours | Assignee | Notes |"
        );
        let _ = writeln!(
            out,
            "|------|--------|----------|----------------|--------------|----------|-------|"
        );
        for task in self.tasks {
            // Fixed per-status figure, independent of milestone math.
            let progress = match task.status {
                TaskStatus::Completed => "100%",
                TaskStatus::InProgress => "50%",
                _ => "0%",
            };
            let short_title: String = task.title.chars().take(TABLE_TITLE_LEN).collect();
            let _ = writeln!(
                out,
                "| {}. {}... | {} | {} | {} | 0 | - | - |",
                task.number,
                short_title,
                task.status.label(),
                progress,
                self.config.estimate_for(task.number)
            );
        }
        let _ = writeln!(out);
    }

    fn render_time_tracking(&self, out: &mut String) {
        let total = self.config.total_estimated_hours;
        let _ = writeln!(out, "## Time Tracking");
        let _ = writeln!(out, "- **Total Estimated Hours**: {total}");
        let _ = writeln!(out, "- **Total Actual Hours**: 0");
        let _ = writeln!(out, "- **Remaining Hours**: {total}");
        let _ = writeln!(out, "- **Average Hours per Day**: 0");
        let _ = writeln!(out, "- **Projected Completion**: TBD");
        let _ = writeln!(out);
    }

    fn render_blockers(&self, out: &mut String) {
        let blocked: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Blocked)
            .collect();

        let _ = writeln!(out, "## Blockers & Issues");
        if blocked.is_empty() {
            let _ = writeln!(out, "- None currently identified");
        }
        for task in &blocked {
            let _ = writeln!(out, "- Task {}: {}", task.number, task.title);
        }
        let _ = writeln!(out);
    }

    fn render_notes(&self, out: &mut String) {
        if self.config.notes.is_empty() {
            return;
        }
        let _ = writeln!(out, "## Notes & Updates");
        for note in &self.config.notes {
            let _ = writeln!(out, "- {note}");
        }
        let _ = writeln!(out);
    }

    fn render_footer(&self, out: &mut String) {
        let next = self.generated_at
            + chrono::Duration::from_std(self.config.update_interval())
                .unwrap_or_else(|_| chrono::Duration::seconds(300));
        let _ = writeln!(out, "---");
        let _ = writeln!(out, "*Last auto-update: {}*  ", self.timestamp());
        let _ = writeln!(out, "*Next update: {}*", next.format(TIMESTAMP_FORMAT));
    }
}
