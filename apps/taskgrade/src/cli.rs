//! # CLI Module
//!
//! Command-line interface for grading take-home submissions.
//!
//! Commands:
//! - `review`: grade a submission and write the verdict JSON
//! - `prompt`: print the reviewer prompt without calling the reviewer
//! - `show`: print a stored verdict
//! - `rubric`: list the known problems and score bands
//!
//! Each command is a public `cmd_*` function returning an [`Outcome`] so the
//! integration tests can drive them without spawning the binary.

use crate::error::CliError;
use crate::review::{run_review, ReviewRequest};
use crate::runner::{ClaudeCli, ReviewBackend, DEFAULT_PROGRAM, DEFAULT_TIMEOUT_SECS};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use taskgrade_core::prompt::DEFAULT_SUMMARY_LANGUAGE;
use taskgrade_core::{ReviewResult, TaskType, SCORE_BANDS};
use tracing::{debug, info, warn};

/// Environment variable holding the reviewer's OAuth token.
pub const TOKEN_ENV: &str = "CLAUDE_CODE_OAUTH_TOKEN";

// =============================================================================
// ARGUMENTS
// =============================================================================

/// AI-assisted grading for take-home review exercises.
#[derive(Debug, Parser)]
#[command(name = "taskgrade", version, about)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Grade a submission and write the verdict JSON.
    Review(ReviewArgs),
    /// Print the reviewer prompt without calling the reviewer.
    Prompt(PromptArgs),
    /// Print a stored verdict.
    Show {
        /// Verdict JSON written by `review`.
        path: PathBuf,
    },
    /// List the known problems and score bands.
    Rubric {
        #[arg(long, default_value = "fullstack")]
        task_type: TaskType,
    },
}

/// Inputs shared by `review` and `prompt`.
#[derive(Debug, Clone, Args)]
pub struct SubmissionArgs {
    /// Path to the candidate's diff.
    #[arg(long)]
    pub diff: PathBuf,

    /// Path to the candidate's REVIEW.md.
    #[arg(long)]
    pub review: PathBuf,

    /// Which half of the exercise is graded (backend, frontend, fullstack).
    #[arg(long, default_value = "fullstack")]
    pub task_type: TaskType,

    /// Language for summary, strengths and improvements.
    #[arg(long, env = "TASKGRADE_LANGUAGE", default_value = DEFAULT_SUMMARY_LANGUAGE)]
    pub language: String,
}

#[derive(Debug, Clone, Args)]
pub struct ReviewArgs {
    #[command(flatten)]
    pub submission: SubmissionArgs,

    /// Where to write the verdict JSON.
    #[arg(long)]
    pub output: PathBuf,

    /// Reviewer timeout in seconds.
    #[arg(long, env = "TASKGRADE_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Reviewer program.
    #[arg(long, env = "TASKGRADE_CLAUDE_BIN", default_value = DEFAULT_PROGRAM)]
    pub claude_bin: String,
}

#[derive(Debug, Clone, Args)]
pub struct PromptArgs {
    #[command(flatten)]
    pub submission: SubmissionArgs,
}

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything worked.
    Success,
    /// The command ran but the verdict records a failed review.
    ReviewFailed,
}

impl Outcome {
    /// Process exit code for this outcome.
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::ReviewFailed => 1,
        }
    }

    fn from_result(result: &ReviewResult) -> Self {
        if result.is_error() {
            Outcome::ReviewFailed
        } else {
            Outcome::Success
        }
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Run the parsed command line.
pub async fn run(cli: Cli) -> Result<Outcome, CliError> {
    match cli.command {
        Commands::Review(args) => cmd_review(&args, cli.json).await,
        Commands::Prompt(args) => cmd_prompt(&args),
        Commands::Show { path } => cmd_show(&path, cli.json),
        Commands::Rubric { task_type } => cmd_rubric(task_type, cli.json),
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Grade a submission with the configured reviewer program.
pub async fn cmd_review(args: &ReviewArgs, json: bool) -> Result<Outcome, CliError> {
    let backend = ClaudeCli::new()
        .with_program(args.claude_bin.as_str())
        .with_timeout(Duration::from_secs(args.timeout));
    cmd_review_with(&backend, args, json).await
}

/// Grade a submission with an explicit backend.
pub async fn cmd_review_with<B: ReviewBackend>(
    backend: &B,
    args: &ReviewArgs,
    json: bool,
) -> Result<Outcome, CliError> {
    if oauth_token_missing() {
        warn!("{} is not set; the reviewer may fail to authenticate", TOKEN_ENV);
    }

    let request = load_submission(&args.submission)?;
    let result = run_review(backend, &request).await;

    write_result(&args.output, &result)?;
    info!(path = %args.output.display(), "verdict written");

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Score: {}/100", result.score);
        println!("Recommendation: {}", result.recommendation);
    }

    Ok(Outcome::from_result(&result))
}

/// Whether the reviewer's OAuth token is unset or blank.
pub fn oauth_token_missing() -> bool {
    std::env::var(TOKEN_ENV).map_or(true, |token| token.trim().is_empty())
}

/// Print the reviewer prompt for a submission.
pub fn cmd_prompt(args: &PromptArgs) -> Result<Outcome, CliError> {
    let request = load_submission(&args.submission)?;
    println!("{}", request.prompt().render());
    Ok(Outcome::Success)
}

/// Print a stored verdict.
pub fn cmd_show(path: &Path, json: bool) -> Result<Outcome, CliError> {
    let result = read_result(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", result.to_text());
    }

    Ok(Outcome::from_result(&result))
}

/// List the known problems and score bands.
pub fn cmd_rubric(task_type: TaskType, json: bool) -> Result<Outcome, CliError> {
    let problems = task_type.problems();

    if json {
        let output = json!({
            "task_type": task_type,
            "problems": problems,
            "bands": SCORE_BANDS,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(Outcome::Success);
    }

    println!("Task type: {}", task_type);
    println!();
    println!("Known problems:");
    for (index, problem) in problems.iter().enumerate() {
        println!(
            "  {}. [{}] {} ({}, {})",
            index + 1,
            problem.slug,
            problem.title,
            problem.area.title(),
            problem.impact
        );
    }
    println!();
    println!("Score bands:");
    for band in &SCORE_BANDS {
        println!("  {:<9} 0-{:<3} {}", band.name, band.max, band.description);
    }

    Ok(Outcome::Success)
}

// =============================================================================
// FILE HELPERS
// =============================================================================

/// Read the diff and REVIEW.md into a review request.
///
/// A missing REVIEW.md reads as empty. A missing or blank diff is an error.
pub fn load_submission(args: &SubmissionArgs) -> Result<ReviewRequest, CliError> {
    let diff = read_optional(&args.diff)?;
    if diff.trim().is_empty() {
        return Err(CliError::EmptyDiff(args.diff.clone()));
    }
    let review = read_optional(&args.review)?;
    debug!(
        diff_bytes = diff.len(),
        review_bytes = review.len(),
        task = %args.task_type,
        "submission loaded"
    );

    let mut request = ReviewRequest::new(args.task_type, review, diff);
    request.summary_language = args.language.clone();
    Ok(request)
}

/// Read a file, treating a missing file as empty.
///
/// Invalid UTF-8 is replaced rather than rejected so an oddly encoded diff
/// still gets a verdict.
pub fn read_optional(path: &Path) -> Result<String, CliError> {
    match std::fs::read(path) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(content) => Ok(content),
            Err(err) => {
                warn!(path = %path.display(), "file is not valid UTF-8, decoding lossily");
                Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
            }
        },
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "file not found, treating as empty");
            Ok(String::new())
        }
        Err(err) => Err(CliError::file(path, err)),
    }
}

/// Write a verdict as pretty JSON, creating parent directories.
pub fn write_result(path: &Path, result: &ReviewResult) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| CliError::file(parent, err))?;
        }
    }
    let mut content = serde_json::to_string_pretty(result)?;
    content.push('\n');
    std::fs::write(path, content).map_err(|err| CliError::file(path, err))
}

/// Read a verdict written by [`write_result`] or edited by hand.
pub fn read_result(path: &Path) -> Result<ReviewResult, CliError> {
    let content = std::fs::read_to_string(path).map_err(|err| CliError::file(path, err))?;
    let map: Map<String, Value> = serde_json::from_str(&content)?;
    Ok(ReviewResult::from_stored(&map))
}

// =============================================================================
// TESTS
// =============================================================================
