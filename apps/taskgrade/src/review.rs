//! # Review Module
//!
//! One grading pass: prompt, reviewer call, verdict recovery.
//!
//! A review never fails outright. Every failure becomes a verdict that routes
//! the candidate to manual review, so the grading pipeline always has a
//! result file to act on.

use crate::error::RunnerError;
use crate::runner::ReviewBackend;
use taskgrade_core::prompt::DEFAULT_SUMMARY_LANGUAGE;
use taskgrade_core::{extract_review, ReviewPrompt, ReviewResult, TaskType};
use tracing::{error, info, warn};

/// Inputs for one review.
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub task_type: TaskType,
    /// Contents of the candidate's REVIEW.md (may be empty).
    pub review: String,
    /// The candidate's diff against the exercise baseline.
    pub diff: String,
    pub summary_language: String,
}

impl ReviewRequest {
    /// Create a request with the default summary language.
    #[must_use]
    pub fn new(task_type: TaskType, review: impl Into<String>, diff: impl Into<String>) -> Self {
        Self {
            task_type,
            review: review.into(),
            diff: diff.into(),
            summary_language: DEFAULT_SUMMARY_LANGUAGE.to_string(),
        }
    }

    /// Build the reviewer prompt for this request.
    #[must_use]
    pub fn prompt(&self) -> ReviewPrompt {
        ReviewPrompt::new(self.task_type)
            .review(self.review.as_str())
            .diff(self.diff.as_str())
            .summary_language(self.summary_language.as_str())
    }
}

/// Run one review against `backend`.
pub async fn run_review<B: ReviewBackend>(backend: &B, request: &ReviewRequest) -> ReviewResult {
    let prompt = request.prompt().render();

    match review_once(backend, &prompt, request.task_type).await {
        Ok(result) => {
            info!(
                score = result.score,
                recommendation = %result.recommendation,
                "review complete"
            );
            result
        }
        Err(RunnerError::Timeout(limit)) => {
            warn!(timeout = ?limit, "reviewer timed out, manual review required");
            ReviewResult::timed_out()
        }
        Err(err) => {
            error!(error = %err, "automatic review failed");
            ReviewResult::failed(err.to_string())
        }
    }
}

async fn review_once<B: ReviewBackend>(
    backend: &B,
    prompt: &str,
    task_type: TaskType,
) -> Result<ReviewResult, RunnerError> {
    let stdout = backend.complete(prompt).await?;
    let verdict = extract_review(&stdout)?;
    Ok(ReviewResult::from_value(&verdict, task_type))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;
    use taskgrade_core::Recommendation;

    /// Backend that replays a canned answer and records the prompt it saw.
    struct Canned {
        answer: fn() -> Result<String, RunnerError>,
        seen: Mutex<Option<String>>,
    }

    impl Canned {
        fn new(answer: fn() -> Result<String, RunnerError>) -> Self {
            Self {
                answer,
                seen: Mutex::new(None),
            }
        }
    }

    impl ReviewBackend for Canned {
        async fn complete(&self, prompt: &str) -> Result<String, RunnerError> {
            *self.seen.lock().unwrap() = Some(prompt.to_string());
            (self.answer)()
        }
    }

    fn request() -> ReviewRequest {
        ReviewRequest::new(TaskType::Fullstack, "Found SQL injection", "+ parametrized query")
    }

    #[tokio::test]
    async fn successful_review() {
        let backend = Canned::new(|| {
            Ok(r#"{"result": "{\"score\": 66, \"problems_found\": [\"sql_injection\"], \"recommendation\": \"pass\"}"}"#.to_string())
        });

        let result = run_review(&backend, &request()).await;

        assert_eq!(result.score, 66);
        assert_eq!(result.problems_found, vec!["sql_injection"]);
        assert_eq!(result.recommendation, Recommendation::Pass);
        assert!(!result.is_error());

        let prompt = backend.seen.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Found SQL injection"));
        assert!(prompt.contains("+ parametrized query"));
    }

    #[tokio::test]
    async fn timeout_routes_to_manual_review() {
        let backend = Canned::new(|| Err(RunnerError::Timeout(Duration::from_secs(180))));
        let result = run_review(&backend, &request()).await;
        assert_eq!(result, ReviewResult::timed_out());
    }

    #[test]
    fn timeout_message_keeps_sub_second_limits() {
        let err = RunnerError::Timeout(Duration::from_millis(200));
        assert_eq!(err.to_string(), "reviewer timed out after 200ms");

        let err = RunnerError::Timeout(Duration::from_secs(180));
        assert_eq!(err.to_string(), "reviewer timed out after 180s");
    }

    #[tokio::test]
    async fn process_failure_becomes_error_verdict() {
        let backend = Canned::new(|| {
            Err(RunnerError::ProcessFailed {
                code: Some(1),
                stderr: "not logged in".to_string(),
            })
        });
        let result = run_review(&backend, &request()).await;

        assert!(result.is_error());
        assert_eq!(result.score, 0);
        assert_eq!(result.recommendation, Recommendation::Review);
        assert!(result.error.as_deref().unwrap().contains("not logged in"));
    }

    #[tokio::test]
    async fn unparsable_answer_becomes_error_verdict() {
        let backend = Canned::new(|| Ok("I refuse to answer in JSON".to_string()));
        let result = run_review(&backend, &request()).await;

        assert!(result.is_error());
        assert!(result.summary.contains("I refuse to answer in JSON"));
    }

    #[test]
    fn request_prompt_uses_language() {
        let mut request = request();
        request.summary_language = "English".to_string();
        assert!(request.prompt().render().contains("2-3 sentences in English"));
    }
}
