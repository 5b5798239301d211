//! # Prompt Module
//!
//! Builds the reviewer prompt from the rubric and the candidate's submission.
//!
//! Candidate text is appended verbatim. Nothing in REVIEW.md or the diff is
//! treated as template syntax, so stray braces cannot break rendering.

use crate::rubric::{TaskType, PASS_THRESHOLD, REVIEW_THRESHOLD, SCORE_BANDS};

/// Placeholder used when REVIEW.md is missing or blank.
pub const EMPTY_REVIEW_PLACEHOLDER: &str = "(REVIEW.md is empty)";

/// Default language for the free-text parts of the verdict.
pub const DEFAULT_SUMMARY_LANGUAGE: &str = "Russian";

/// Builder for the reviewer prompt.
#[derive(Debug, Clone)]
pub struct ReviewPrompt {
    task_type: TaskType,
    review: String,
    diff: String,
    summary_language: String,
}

impl ReviewPrompt {
    /// Start a prompt for the given task.
    #[must_use]
    pub fn new(task_type: TaskType) -> Self {
        Self {
            task_type,
            review: String::new(),
            diff: String::new(),
            summary_language: DEFAULT_SUMMARY_LANGUAGE.to_string(),
        }
    }

    /// Set the candidate's REVIEW.md content.
    #[must_use]
    pub fn review(mut self, review: impl Into<String>) -> Self {
        self.review = review.into();
        self
    }

    /// Set the candidate's diff.
    #[must_use]
    pub fn diff(mut self, diff: impl Into<String>) -> Self {
        self.diff = diff.into();
        self
    }

    /// Set the language for summary, strengths and improvements.
    #[must_use]
    pub fn summary_language(mut self, language: impl Into<String>) -> Self {
        self.summary_language = language.into();
        self
    }

    /// The task this prompt grades.
    #[must_use]
    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Render the full prompt text.
    #[must_use]
    pub fn render(&self) -> String {
        let task = self.task_type;
        let problems = task.problems();
        let mut out = String::new();

        out.push_str(&format!(
            "You are a senior {} developer reviewing a take-home assignment.\n\n",
            task.as_str()
        ));

        out.push_str("ASSIGNMENT:\n");
        out.push_str(&format!(
            "The candidate had to find the problems in the code ({}), describe them in REVIEW.md, fix them and write tests.\n\n",
            task.scope_description()
        ));

        out.push_str("KNOWN PROBLEMS IN THE ORIGINAL CODE:\n");
        let mut number = 0usize;
        for area in task.areas() {
            out.push_str(&format!("\n{} ({}):\n", area.title(), area.stack()));
            for problem in problems.iter().filter(|p| p.area == area) {
                number += 1;
                out.push_str(&format!(
                    "{}. {} ({}) [{}]\n",
                    number, problem.title, problem.impact, problem.slug
                ));
            }
        }

        out.push_str("\nCANDIDATE'S REVIEW.md:\n");
        if self.review.trim().is_empty() {
            out.push_str(EMPTY_REVIEW_PLACEHOLDER);
        } else {
            out.push_str(&self.review);
        }
        out.push_str("\n\nDIFF (candidate's changes):\n");
        out.push_str(&self.diff);

        out.push_str("\n\nGRADING CRITERIA:\n");
        for band in &SCORE_BANDS {
            let description = if band.name == "problems" {
                format!(
                    "Problems found: how many of the {} problems REVIEW.md describes",
                    problems.len()
                )
            } else {
                band.description.to_string()
            };
            out.push_str(&format!("- {} (0-{} points)\n", description, band.max));
        }

        let slugs = problems
            .iter()
            .map(|p| format!("\"{}\"", p.slug))
            .collect::<Vec<_>>()
            .join(", ");
        let first_slug = problems.first().map(|p| p.slug).unwrap_or("slug");

        out.push_str("\nANSWER STRICTLY IN JSON FORMAT:\n");
        out.push_str("{\n");
        out.push_str("  \"score\": <total score 0-100>,\n");
        out.push_str(&format!("  \"problems_found\": [{}],\n", slugs));
        out.push_str(&format!("  \"problems_fixed\": [\"{}\", ...],\n", first_slug));
        out.push_str("  \"breakdown\": {\n");
        let bands = SCORE_BANDS
            .iter()
            .map(|band| format!("    \"{}\": <0-{}>", band.name, band.max))
            .collect::<Vec<_>>()
            .join(",\n");
        out.push_str(&bands);
        out.push_str("\n  },\n");
        out.push_str(&format!(
            "  \"summary\": \"<2-3 sentences in {} about the candidate's work>\",\n",
            self.summary_language
        ));
        out.push_str("  \"strengths\": [\"strength 1\", \"strength 2\"],\n");
        out.push_str("  \"improvements\": [\"improvement 1\", \"improvement 2\"],\n");
        out.push_str("  \"recommendation\": \"pass|review|reject\"\n");
        out.push_str("}\n\n");

        out.push_str("Where recommendation is:\n");
        out.push_str(&format!(
            "- \"pass\" - score >= {}, passes automatically\n",
            PASS_THRESHOLD
        ));
        out.push_str(&format!(
            "- \"review\" - score {}-{}, needs manual review by a recruiter\n",
            REVIEW_THRESHOLD,
            PASS_THRESHOLD - 1
        ));
        out.push_str(&format!(
            "- \"reject\" - score < {}, rejected automatically\n\n",
            REVIEW_THRESHOLD
        ));
        out.push_str(&format!(
            "Write summary, strengths and improvements in {}.\n",
            self.summary_language
        ));
        out.push_str("IMPORTANT: Reply with valid JSON ONLY, no markdown, no comments.");

        out
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fullstack_prompt_lists_all_problems() {
        let prompt = ReviewPrompt::new(TaskType::Fullstack)
            .review("Found SQL injection")
            .diff("+ fixed")
            .render();

        assert!(prompt.contains("senior fullstack developer"));
        assert!(prompt.contains("Backend (Python/FastAPI):"));
        assert!(prompt.contains("Frontend (React/TypeScript):"));
        assert!(prompt.contains("1. SQL injection"));
        assert!(prompt.contains("8. Wrong key"));
        assert!(prompt.contains("how many of the 8 problems"));
        assert!(prompt.contains("Found SQL injection"));
        assert!(prompt.contains("+ fixed"));
    }

    #[test]
    fn backend_prompt_excludes_frontend() {
        let prompt = ReviewPrompt::new(TaskType::Backend).diff("d").render();

        assert!(prompt.contains("sql_injection"));
        assert!(!prompt.contains("\"xss\""));
        assert!(!prompt.contains("Frontend (React/TypeScript):"));
        assert!(prompt.contains("how many of the 4 problems"));
    }

    #[test]
    fn frontend_prompt_numbers_from_one() {
        let prompt = ReviewPrompt::new(TaskType::Frontend).diff("d").render();
        assert!(prompt.contains("1. Memory leak"));
        assert!(prompt.contains("\"problems_fixed\": [\"memory_leak\", ...]"));
    }

    #[test]
    fn empty_review_uses_placeholder() {
        let prompt = ReviewPrompt::new(TaskType::Fullstack)
            .review("  \n ")
            .diff("d")
            .render();
        assert!(prompt.contains(EMPTY_REVIEW_PLACEHOLDER));
    }

    #[test]
    fn braces_in_candidate_text_are_verbatim() {
        let prompt = ReviewPrompt::new(TaskType::Fullstack)
            .review("uses {review_content} literally")
            .diff("fn main() { let x = {}; }")
            .render();
        assert!(prompt.contains("uses {review_content} literally"));
        assert!(prompt.contains("fn main() { let x = {}; }"));
    }

    #[test]
    fn summary_language_is_configurable() {
        let prompt = ReviewPrompt::new(TaskType::Fullstack)
            .summary_language("English")
            .diff("d")
            .render();
        assert!(prompt.contains("2-3 sentences in English"));
        assert!(prompt.contains("improvements in English"));
    }

    #[test]
    fn prompt_states_thresholds_and_bands() {
        let prompt = ReviewPrompt::new(TaskType::Fullstack).diff("d").render();
        assert!(prompt.contains("score >= 60"));
        assert!(prompt.contains("score 40-59"));
        assert!(prompt.contains("score < 40"));
        assert!(prompt.contains("\"fixes\": <0-35>"));
        assert!(prompt.ends_with("no markdown, no comments."));
    }
}
