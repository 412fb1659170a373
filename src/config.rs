//! Configuration for the progress tracker.
//!
//! All paths, tables, and timings the tracker uses are fields of
//! [`TrackerConfig`] so tests can inject temp directories and small
//! fixtures instead of patching globals. A `taskpulse.toml` in the
//! project directory overrides the defaults; a missing file is not an
//! error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, TrackerError};

/// Config file name looked up in the project directory.
pub const CONFIG_FILE: &str = "taskpulse.toml";

/// A named, fixed grouping of task numbers with a target label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Display name, also the key into the sprint-goal table.
    pub name: String,
    /// Task numbers this milestone covers, in order.
    pub tasks: Vec<u32>,
    /// Target label shown in the report (e.g. "Week 2").
    pub target: String,
}

impl Milestone {
    /// Create a milestone definition.
    pub fn new(name: impl Into<String>, tasks: Vec<u32>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks,
            target: target.into(),
        }
    }
}

/// Estimated effort for a single task number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourEstimate {
    pub task: u32,
    pub hours: u32,
}

/// Tracker configuration.
///
/// Defaults reproduce the built-in tables of the stock tracker so a bare
/// `taskpulse` run in a project with only a `tasks.md` produces a full
/// report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Project directory all relative paths resolve against.
    #[serde(skip)]
    pub project_dir: PathBuf,

    /// Project name shown in the report header.
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Project start date shown in the report header, verbatim.
    #[serde(default = "default_start_date")]
    pub start_date: String,

    /// Checklist file to parse.
    #[serde(default = "default_tasks_file")]
    pub tasks_file: PathBuf,

    /// Status report file, fully overwritten each cycle.
    #[serde(default = "default_report_file")]
    pub report_file: PathBuf,

    /// JSON history log file.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Seconds between scheduled cycles.
    #[serde(default = "default_interval_secs")]
    pub update_interval_secs: u64,

    /// Milestone definitions, fixed for the process lifetime.
    #[serde(default = "default_milestones")]
    pub milestones: Vec<Milestone>,

    /// Milestone name -> sprint goal sentence.
    #[serde(default = "default_sprint_goals")]
    pub sprint_goals: BTreeMap<String, String>,

    /// Per-task effort estimates.
    #[serde(default = "default_hour_estimates")]
    pub hour_estimates: Vec<HourEstimate>,

    /// Estimate used for task numbers missing from `hour_estimates`.
    #[serde(default = "default_estimate_hours")]
    pub default_estimate: u32,

    /// Total estimated hours shown in the time-tracking section.
    #[serde(default = "default_total_hours")]
    pub total_estimated_hours: u32,

    /// Free-text bullets for the notes section; omitted when empty.
    #[serde(default)]
    pub notes: Vec<String>,
}

fn default_project_name() -> String {
    "Untitled Project".to_string()
}

fn default_start_date() -> String {
    "2025-01-08".to_string()
}

fn default_tasks_file() -> PathBuf {
    PathBuf::from("tasks.md")
}

fn default_report_file() -> PathBuf {
    PathBuf::from("progress-tracker.md")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("progress-log.json")
}

fn default_interval_secs() -> u64 {
    300
}

fn default_estimate_hours() -> u32 {
    8
}

fn default_total_hours() -> u32 {
    424
}

fn default_milestones() -> Vec<Milestone> {
    vec![
        Milestone::new("Foundation & Core Engine", vec![1, 2, 3, 4, 5, 6], "Week 2"),
        Milestone::new("Component System & UI", vec![7, 8, 9, 10, 11, 12], "Week 4"),
        Milestone::new(
            "AI Integration & Templates",
            vec![13, 14, 15, 16, 17, 18],
            "Week 6",
        ),
        Milestone::new("Advanced Features", vec![19, 20, 21, 22, 23, 24], "Week 8"),
        Milestone::new("Character System & ML", vec![25, 26, 27, 28], "Week 10"),
        Milestone::new("Testing & Deployment", vec![29, 30, 31, 32], "Week 12"),
    ]
}

fn default_sprint_goals() -> BTreeMap<String, String> {
    [
        (
            "Foundation & Core Engine",
            "Establish project foundation and core canvas functionality",
        ),
        (
            "Component System & UI",
            "Build component library and user interface",
        ),
        (
            "AI Integration & Templates",
            "Integrate AI assistance and template system",
        ),
        (
            "Advanced Features",
            "Implement advanced design and collaboration features",
        ),
        (
            "Character System & ML",
            "Add character design and machine learning capabilities",
        ),
        (
            "Testing & Deployment",
            "Complete testing and prepare for deployment",
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_hour_estimates() -> Vec<HourEstimate> {
    const HOURS: &[(u32, u32)] = &[
        (1, 8),
        (2, 12),
        (3, 16),
        (4, 10),
        (5, 12),
        (6, 14),
        (7, 10),
        (8, 8),
        (9, 12),
        (10, 10),
        (11, 16),
        (12, 12),
        (13, 14),
        (14, 18),
        (15, 12),
        (16, 10),
        (17, 20),
        (18, 8),
        (19, 16),
        (20, 14),
        (21, 12),
        (22, 10),
        (23, 12),
        (24, 10),
        (25, 14),
        (26, 16),
        (27, 18),
        (28, 12),
        (29, 20),
        (30, 12),
        (31, 10),
        (32, 16),
    ];
    HOURS
        .iter()
        .map(|&(task, hours)| HourEstimate { task, hours })
        .collect()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            project_name: default_project_name(),
            start_date: default_start_date(),
            tasks_file: default_tasks_file(),
            report_file: default_report_file(),
            log_file: default_log_file(),
            update_interval_secs: default_interval_secs(),
            milestones: default_milestones(),
            sprint_goals: default_sprint_goals(),
            hour_estimates: default_hour_estimates(),
            default_estimate: default_estimate_hours(),
            total_estimated_hours: default_total_hours(),
            notes: Vec::new(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration for a project directory.
    ///
    /// Reads `taskpulse.toml` when present; a missing file yields the
    /// defaults. A present-but-invalid file is a configuration error:
    /// silently ignoring a typo'd config would be worse than refusing
    /// to start.
    pub fn load(project_dir: impl AsRef<Path>) -> Result<Self> {
        let project_dir = project_dir.as_ref().to_path_buf();
        let config_path = project_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).map_err(|e| {
                TrackerError::config_with_path(e.to_string(), config_path.clone())
            })?;
            toml::from_str::<TrackerConfig>(&content)
                .map_err(|e| TrackerError::config_with_path(e.to_string(), config_path.clone()))?
        } else {
            TrackerConfig::default()
        };

        config.project_dir = project_dir;
        config.validate()?;
        Ok(config)
    }

    /// Validate invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.update_interval_secs == 0 {
            return Err(TrackerError::config(
                "update_interval_secs must be greater than zero",
            ));
        }
        for milestone in &self.milestones {
            if milestone.tasks.is_empty() {
                return Err(TrackerError::config(format!(
                    "milestone '{}' covers no tasks",
                    milestone.name
                )));
            }
        }
        Ok(())
    }

    /// Interval between scheduled cycles.
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }

    /// Absolute path of the checklist file.
    pub fn tasks_path(&self) -> PathBuf {
        self.project_dir.join(&self.tasks_file)
    }

    /// Absolute path of the status report file.
    pub fn report_path(&self) -> PathBuf {
        self.project_dir.join(&self.report_file)
    }

    /// Absolute path of the history log file.
    pub fn log_path(&self) -> PathBuf {
        self.project_dir.join(&self.log_file)
    }

    /// Effort estimate for a task number, falling back to the default.
    pub fn estimate_for(&self, task_number: u32) -> u32 {
        self.hour_estimates
            .iter()
            .find(|e| e.task == task_number)
            .map(|e| e.hours)
            .unwrap_or(self.default_estimate)
    }

    /// Sprint goal for a milestone name, falling back to a generic goal.
    pub fn sprint_goal_for(&self, milestone_name: &str) -> &str {
        self.sprint_goals
            .get(milestone_name)
            .map(String::as_str)
            .unwrap_or("Complete assigned tasks")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_cover_original_tables() {
        let config = TrackerConfig::default();
        assert_eq!(config.milestones.len(), 6);
        assert_eq!(config.update_interval_secs, 300);
        assert_eq!(config.estimate_for(3), 16);
        assert_eq!(config.estimate_for(999), 8);
        assert_eq!(config.total_estimated_hours, 424);
        assert_eq!(
            config.sprint_goal_for("Advanced Features"),
            "Implement advanced design and collaboration features"
        );
        assert_eq!(config.sprint_goal_for("Unmapped"), "Complete assigned tasks");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = TrackerConfig::load(temp.path()).unwrap();
        assert_eq!(config.project_name, "Untitled Project");
        assert_eq!(config.tasks_path(), temp.path().join("tasks.md"));
    }

    #[test]
    fn test_load_overrides_from_toml() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            r#"
project_name = "Widget Factory"
update_interval_secs = 60

[[milestones]]
name = "Prototype"
tasks = [1, 2]
target = "Week 1"

[sprint_goals]
Prototype = "Ship the prototype"

[[hour_estimates]]
task = 1
hours = 4
"#,
        )
        .unwrap();

        let config = TrackerConfig::load(temp.path()).unwrap();
        assert_eq!(config.project_name, "Widget Factory");
        assert_eq!(config.update_interval(), Duration::from_secs(60));
        assert_eq!(config.milestones.len(), 1);
        assert_eq!(config.estimate_for(1), 4);
        assert_eq!(config.estimate_for(2), 8);
        assert_eq!(config.sprint_goal_for("Prototype"), "Ship the prototype");
        // Untouched fields keep their defaults
        assert_eq!(config.report_file, PathBuf::from("progress-tracker.md"));
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "project_name = [broken").unwrap();
        let err = TrackerConfig::load(temp.path()).unwrap_err();
        assert!(matches!(err, TrackerError::Config { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = TrackerConfig {
            update_interval_secs: 0,
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_milestone() {
        let config = TrackerConfig {
            milestones: vec![Milestone::new("Empty", vec![], "Week 1")],
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
