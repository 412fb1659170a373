//! Progress aggregation.
//!
//! Pure functions over the parsed task sequence: an overall summary plus
//! a per-milestone rollup. Percentages are whole numbers, rounded half-up
//! on the underlying ratio; because each percentage is rounded
//! independently the four figures may sum to 99 or 101.

use serde::{Deserialize, Serialize};

use crate::config::Milestone;
use crate::parser::{Task, TaskStatus};

/// Counts and whole-percent figures across the whole task set.
///
/// Serialized camelCase because this struct is embedded verbatim in the
/// JSON history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub blocked: usize,
    pub completed_percent: u32,
    pub in_progress_percent: u32,
    pub not_started_percent: u32,
    pub blocked_percent: u32,
}

/// Rollup state of a single milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilestoneStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl MilestoneStatus {
    /// Human label used in the rendered report.
    pub fn label(self) -> &'static str {
        match self {
            MilestoneStatus::NotStarted => "Not Started",
            MilestoneStatus::InProgress => "In Progress",
            MilestoneStatus::Completed => "Completed",
        }
    }
}

/// Per-cycle progress of one milestone definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneProgress {
    pub milestone: Milestone,
    pub completed: usize,
    pub total: usize,
    pub percent: u32,
    pub status: MilestoneStatus,
}

/// Whole percent of `count` over `total`, 0 when `total` is 0.
fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

/// Aggregate the task sequence into a [`ProgressSummary`].
pub fn summarize(tasks: &[Task]) -> ProgressSummary {
    let total = tasks.len();
    let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();

    let completed = count(TaskStatus::Completed);
    let in_progress = count(TaskStatus::InProgress);
    let not_started = count(TaskStatus::NotStarted);
    let blocked = count(TaskStatus::Blocked);

    ProgressSummary {
        total,
        completed,
        in_progress,
        not_started,
        blocked,
        completed_percent: percent(completed, total),
        in_progress_percent: percent(in_progress, total),
        not_started_percent: percent(not_started, total),
        blocked_percent: percent(blocked, total),
    }
}

/// Roll the task sequence up into one [`MilestoneProgress`] per definition.
///
/// A milestone's total counts only tasks actually present in the input,
/// so a definition referencing task numbers missing from the checklist
/// does not inflate its denominator.
pub fn milestone_progress(tasks: &[Task], milestones: &[Milestone]) -> Vec<MilestoneProgress> {
    milestones
        .iter()
        .map(|milestone| {
            let covered: Vec<&Task> = tasks
                .iter()
                .filter(|t| milestone.tasks.contains(&t.number))
                .collect();
            let total = covered.len();
            let completed = covered
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count();
            let percent = percent(completed, total);

            let status = if percent == 100 {
                MilestoneStatus::Completed
            } else if percent > 0 {
                MilestoneStatus::InProgress
            } else {
                MilestoneStatus::NotStarted
            };

            MilestoneProgress {
                milestone: milestone.clone(),
                completed,
                total,
                percent,
                status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(number: u32, status: TaskStatus) -> Task {
        Task {
            number,
            title: format!("Task {number}"),
            status,
            raw_line: String::new(),
        }
    }

    #[test]
    fn test_counts_sum_to_total() {
        let tasks = vec![
            task(1, TaskStatus::Completed),
            task(2, TaskStatus::InProgress),
            task(3, TaskStatus::NotStarted),
            task(4, TaskStatus::Blocked),
            task(5, TaskStatus::Completed),
        ];
        let summary = summarize(&tasks);
        assert_eq!(
            summary.completed + summary.in_progress + summary.not_started + summary.blocked,
            summary.total
        );
    }

    #[test]
    fn test_two_task_scenario() {
        let tasks = vec![task(1, TaskStatus::Completed), task(2, TaskStatus::NotStarted)];
        let summary = summarize(&tasks);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.in_progress, 0);
        assert_eq!(summary.not_started, 1);
        assert_eq!(summary.blocked, 0);
        assert_eq!(summary.completed_percent, 50);
        assert_eq!(summary.not_started_percent, 50);
    }

    #[test]
    fn test_empty_input_has_zero_percents() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.completed_percent, 0);
        assert_eq!(summary.in_progress_percent, 0);
        assert_eq!(summary.not_started_percent, 0);
        assert_eq!(summary.blocked_percent, 0);
    }

    #[test]
    fn test_percent_rounds_half_up() {
        // 1/8 = 12.5% -> 13
        let mut tasks = vec![task(1, TaskStatus::Completed)];
        tasks.extend((2..=8).map(|n| task(n, TaskStatus::NotStarted)));
        let summary = summarize(&tasks);
        assert_eq!(summary.completed_percent, 13);
        assert_eq!(summary.not_started_percent, 88);
    }

    #[test]
    fn test_milestone_boundaries() {
        let milestones = vec![
            Milestone::new("Done", vec![1, 2], "Week 1"),
            Milestone::new("Untouched", vec![3, 4], "Week 2"),
            Milestone::new("Partial", vec![5, 6], "Week 3"),
        ];
        let tasks = vec![
            task(1, TaskStatus::Completed),
            task(2, TaskStatus::Completed),
            task(3, TaskStatus::NotStarted),
            task(4, TaskStatus::InProgress),
            task(5, TaskStatus::Completed),
            task(6, TaskStatus::NotStarted),
        ];
        let rollup = milestone_progress(&tasks, &milestones);

        assert_eq!(rollup[0].percent, 100);
        assert_eq!(rollup[0].status, MilestoneStatus::Completed);

        // An in-progress task alone does not move milestone percent.
        assert_eq!(rollup[1].percent, 0);
        assert_eq!(rollup[1].status, MilestoneStatus::NotStarted);

        assert_eq!(rollup[2].completed, 1);
        assert_eq!(rollup[2].total, 2);
        assert_eq!(rollup[2].percent, 50);
        assert_eq!(rollup[2].status, MilestoneStatus::InProgress);
    }

    #[test]
    fn test_milestone_with_absent_tasks() {
        let milestones = vec![Milestone::new("Future", vec![10, 11, 12], "Week 9")];
        let tasks = vec![task(10, TaskStatus::Completed)];
        let rollup = milestone_progress(&tasks, &milestones);
        assert_eq!(rollup[0].total, 1);
        assert_eq!(rollup[0].completed, 1);
        assert_eq!(rollup[0].percent, 100);
    }

    #[test]
    fn test_milestone_empty_task_set() {
        let milestones = vec![Milestone::new("Anything", vec![1], "Week 1")];
        let rollup = milestone_progress(&[], &milestones);
        assert_eq!(rollup[0].total, 0);
        assert_eq!(rollup[0].percent, 0);
        assert_eq!(rollup[0].status, MilestoneStatus::NotStarted);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = summarize(&[task(1, TaskStatus::Completed)]);
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["completedPercent"], 100);
        assert_eq!(json["inProgress"], 0);
        assert_eq!(json["notStartedPercent"], 0);
    }
}
