//! # Runner Module
//!
//! Sends the prompt to the reviewer process and collects its answer.
//!
//! The default backend is the `claude` CLI in print mode:
//!
//! ```text
//! prompt ──stdin──► claude --print --output-format json ──stdout──► envelope JSON
//! ```
//!
//! The child is killed if the timeout fires or the future is dropped.

use crate::error::RunnerError;
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// Default reviewer program.
pub const DEFAULT_PROGRAM: &str = "claude";

/// Default reviewer arguments.
pub const DEFAULT_ARGS: [&str; 3] = ["--print", "--output-format", "json"];

/// Default timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Anything that can turn a prompt into raw reviewer output.
pub trait ReviewBackend {
    /// Send `prompt` and return the reviewer's raw stdout.
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, RunnerError>> + Send;
}

/// The reviewer as an external CLI process.
#[derive(Debug, Clone)]
pub struct ClaudeCli {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Default for ClaudeCli {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: DEFAULT_ARGS.iter().map(|s| (*s).to_string()).collect(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClaudeCli {
    /// Create a runner with the default program, arguments and timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different program (path or name on PATH).
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Replace the argument list.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the overall timeout for one review.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl ReviewBackend for ClaudeCli {
    async fn complete(&self, prompt: &str) -> Result<String, RunnerError> {
        info!(
            program = %self.program,
            timeout = ?self.timeout,
            prompt_bytes = prompt.len(),
            "starting reviewer"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin concurrently so a chatty child cannot deadlock on a full
        // stdout pipe while we are still writing.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = prompt.as_bytes().to_vec();
            tokio::spawn(async move {
                if let Err(err) = stdin.write_all(&input).await {
                    debug!(error = %err, "reviewer closed stdin early");
                    return;
                }
                if let Err(err) = stdin.shutdown().await {
                    debug!(error = %err, "failed to close reviewer stdin");
                }
            })
        });

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RunnerError::Timeout(self.timeout))??;

        if let Some(writer) = writer {
            if let Err(err) = writer.await {
                debug!(error = %err, "stdin writer task failed");
            }
        }

        if !output.status.success() {
            return Err(RunnerError::ProcessFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(stdout_bytes = output.stdout.len(), "reviewer finished");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

// =============================================================================
// TESTS
// =============================================================================
