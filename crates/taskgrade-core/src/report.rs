//! # Report Module
//!
//! Plain-text rendering of a verdict for recruiters reading a terminal.
//!
//! Problem slugs are expanded to their rubric titles; slugs that are not in
//! the catalogue are printed as-is.

use crate::rubric::{band_max, find_problem};
use crate::verdict::ReviewResult;

impl ReviewResult {
    /// Format as plain text with the standard template.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("┌─────────────────────────────────────┐\n");
        output.push_str(&format!(
            "│ SCORE: {}/100  RECOMMENDATION: {}\n",
            self.score,
            self.recommendation.as_str().to_uppercase()
        ));

        output.push_str("├─────────────────────────────────────┤\n");
        output.push_str("│ BREAKDOWN                           │\n");
        for (name, points) in self.breakdown.entries() {
            let max = band_max(name).unwrap_or(0);
            output.push_str(&format!("│ - {:<9} {:>2}/{}\n", name, points, max));
        }

        push_section(&mut output, "PROBLEMS FOUND", &problem_lines(&self.problems_found));
        push_section(&mut output, "PROBLEMS FIXED", &problem_lines(&self.problems_fixed));
        push_section(&mut output, "STRENGTHS", &self.strengths);
        push_section(&mut output, "IMPROVEMENTS", &self.improvements);

        if !self.summary.is_empty() {
            output.push_str("├─────────────────────────────────────┤\n");
            output.push_str("│ SUMMARY                             │\n");
            output.push_str(&format!("│ {}\n", self.summary));
        }

        if let Some(error) = &self.error {
            output.push_str("├─────────────────────────────────────┤\n");
            output.push_str("│ ERROR (automatic review failed)     │\n");
            output.push_str(&format!("│ {}\n", error));
        }

        output.push_str("└─────────────────────────────────────┘\n");

        output
    }
}

fn problem_lines(slugs: &[String]) -> Vec<String> {
    slugs
        .iter()
        .map(|slug| match find_problem(slug) {
            Some(problem) => format!("{} [{}]", problem.title, slug),
            None => slug.clone(),
        })
        .collect()
}

fn push_section(output: &mut String, title: &str, lines: &[String]) {
    output.push_str("├─────────────────────────────────────┤\n");
    output.push_str(&format!("│ {:<36}│\n", title));
    if lines.is_empty() {
        output.push_str("│ - (none)                            │\n");
    } else {
        for line in lines {
            output.push_str(&format!("│ - {}\n", line));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::verdict::{Breakdown, Recommendation, ReviewResult};

    #[test]
    fn to_text_format() {
        let result = ReviewResult {
            score: 72,
            problems_found: vec!["sql_injection".into(), "xss".into()],
            problems_fixed: vec!["sql_injection".into()],
            breakdown: Breakdown { problems: 20, fixes: 30, review: 10, tests: 12 },
            summary: "Solid work.".into(),
            strengths: vec!["clear write-up".into()],
            improvements: vec![],
            recommendation: Recommendation::Pass,
            error: None,
        };

        let text = result.to_text();

        assert!(text.contains("SCORE: 72/100"));
        assert!(text.contains("RECOMMENDATION: PASS"));
        assert!(text.contains("fixes     30/35"));
        assert!(text.contains("SQL injection"));
        assert!(text.contains("[xss]"));
        assert!(text.contains("clear write-up"));
        assert!(text.contains("(none)"));
        assert!(text.contains("Solid work."));
        assert!(!text.contains("ERROR"));
    }

    #[test]
    fn to_text_shows_error() {
        let text = ReviewResult::failed("claude not found").to_text();
        assert!(text.contains("ERROR (automatic review failed)"));
        assert!(text.contains("claude not found"));
    }

    #[test]
    fn unknown_slug_printed_verbatim() {
        let result = ReviewResult {
            problems_found: vec!["legacy_slug".into()],
            ..ReviewResult::default()
        };
        assert!(result.to_text().contains("- legacy_slug"));
    }
}
