//! # Error Module
//!
//! Errors surfaced by the reviewer runner and the CLI commands.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors from running the reviewer process.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The reviewer program could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// I/O with the running process failed.
    #[error("reviewer I/O error: {0}")]
    Io(#[from] io::Error),

    /// The reviewer did not finish in time.
    #[error("reviewer timed out after {:?}", .0)]
    Timeout(Duration),

    /// The reviewer exited unsuccessfully.
    #[error("reviewer exited with {}: {stderr}", exit_label(.code))]
    ProcessFailed { code: Option<i32>, stderr: String },

    /// The reviewer answered but the verdict could not be recovered.
    #[error(transparent)]
    Response(#[from] taskgrade_core::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The diff is missing or contains only whitespace.
    #[error("diff file is empty or missing: {}", .0.display())]
    EmptyDiff(PathBuf),

    /// Reading or writing a file failed.
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rubric or verdict error.
    #[error(transparent)]
    Core(#[from] taskgrade_core::Error),
}

impl CliError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}
