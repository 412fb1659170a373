//! Custom error types for taskpulse.
//!
//! This module provides structured error types that enable better
//! error handling and reporting throughout the tracker.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Failed to load or validate configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Failed to write the rendered status report
    #[error("Report write failed: {path}: {message}")]
    Report { path: PathBuf, message: String },

    /// Failed to persist the progress history log
    #[error("History log write failed: {path}: {message}")]
    History { path: PathBuf, message: String },

    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TrackerError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path
    pub fn config_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path),
        }
    }

    /// Create a report write error
    pub fn report(path: PathBuf, message: impl Into<String>) -> Self {
        Self::Report {
            path,
            message: message.into(),
        }
    }

    /// Create a history log write error
    pub fn history(path: PathBuf, message: impl Into<String>) -> Self {
        Self::History {
            path,
            message: message.into(),
        }
    }

    /// Check if this error is recoverable by the scheduler.
    ///
    /// Recoverable errors are caught by the cycle runner and logged; the
    /// next scheduled tick is the implicit retry. Only configuration
    /// problems surfaced before the loop starts are considered fatal.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config { .. })
    }
}

/// Type alias for tracker results
pub type Result<T> = std::result::Result<T, TrackerError>;
