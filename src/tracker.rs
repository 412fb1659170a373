//! Cycle orchestration.
//!
//! One cycle reads the checklist, aggregates progress, rewrites the
//! status report, and appends to the history log. The tracker owns no
//! state between cycles; everything derived is rebuilt from the
//! checklist each time.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::TrackerConfig;
use crate::error::Result;
use crate::history::{LogEntry, ProgressLog};
use crate::parser::{self, TaskStatus};
use crate::progress::{self, ProgressSummary};
use crate::report::StatusReport;

/// Outcome of one completed cycle, for caller display.
#[derive(Debug, Clone, Copy)]
pub struct CycleReport {
    pub summary: ProgressSummary,
    pub generated_at: DateTime<Utc>,
}

/// Runs parse -> calculate -> render -> log cycles against one project.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    config: TrackerConfig,
}

impl ProgressTracker {
    /// Create a tracker over a validated configuration.
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    /// The tracker's configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Run one full cycle.
    ///
    /// An unreadable checklist degrades to zero tasks inside the parse
    /// step; failures writing the report or the log propagate to the
    /// caller, which is the scheduler's catch point.
    pub fn run_cycle(&self) -> Result<CycleReport> {
        let now = Utc::now();
        debug!("Updating progress tracker");

        let tasks = parser::read_tasks(&self.config.tasks_path());
        let summary = progress::summarize(&tasks);
        let milestones = progress::milestone_progress(&tasks, &self.config.milestones);

        StatusReport {
            config: &self.config,
            tasks: &tasks,
            summary: &summary,
            milestones: &milestones,
            generated_at: now,
        }
        .write(&self.config.report_path())?;

        let log_path = self.config.log_path();
        let mut log = ProgressLog::load(&log_path, now);
        log.append(LogEntry {
            timestamp: now,
            progress: summary,
            active_tasks: tasks
                .iter()
                .filter(|t| t.status == TaskStatus::InProgress)
                .count(),
            completed_tasks: tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count(),
        });
        log.save(&log_path)?;

        info!(
            "Progress updated: {}/{} tasks completed ({}%)",
            summary.completed, summary.total, summary.completed_percent
        );

        Ok(CycleReport {
            summary,
            generated_at: now,
        })
    }
}
