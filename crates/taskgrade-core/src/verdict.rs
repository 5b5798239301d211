//! # Verdict Module
//!
//! The review result written to disk and the rules that keep it honest.
//!
//! Reviewer output is untrusted: numbers may arrive as floats or strings,
//! bands may exceed their maxima, slugs may be invented. `from_value` decodes
//! leniently and then normalises so every stored verdict satisfies:
//! - `score` is within 0..=100
//! - each breakdown band is within its maximum
//! - reported slugs are known for the task, lowercase, without duplicates
//! - every fixed problem is also listed as found

use crate::rubric::{band_max, TaskType, MAX_SCORE, PASS_THRESHOLD, REVIEW_THRESHOLD};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

// =============================================================================
// RECOMMENDATION
// =============================================================================

/// What happens to the candidate next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    /// Passes automatically.
    Pass,
    /// A recruiter looks at it by hand.
    #[default]
    Review,
    /// Rejected automatically.
    Reject,
}

impl Recommendation {
    /// Derive the recommendation from a score.
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        if score >= PASS_THRESHOLD {
            Recommendation::Pass
        } else if score >= REVIEW_THRESHOLD {
            Recommendation::Review
        } else {
            Recommendation::Reject
        }
    }

    /// Lowercase name as stored in JSON.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::Pass => "pass",
            Recommendation::Review => "review",
            Recommendation::Reject => "reject",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recommendation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass" => Ok(Recommendation::Pass),
            "review" => Ok(Recommendation::Review),
            "reject" => Ok(Recommendation::Reject),
            _ => Err(()),
        }
    }
}

// =============================================================================
// BREAKDOWN
// =============================================================================

/// Points per score band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakdown {
    pub problems: u32,
    pub fixes: u32,
    pub review: u32,
    pub tests: u32,
}

impl Breakdown {
    /// Sum of all bands.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.problems
            .saturating_add(self.fixes)
            .saturating_add(self.review)
            .saturating_add(self.tests)
    }

    /// Bands as (name, points) pairs in rubric order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, u32); 4] {
        [
            ("problems", self.problems),
            ("fixes", self.fixes),
            ("review", self.review),
            ("tests", self.tests),
        ]
    }

    fn clamp_to_bands(&mut self) {
        let clamp = |name: &str, value: u32| value.min(band_max(name).unwrap_or(MAX_SCORE));
        self.problems = clamp("problems", self.problems);
        self.fixes = clamp("fixes", self.fixes);
        self.review = clamp("review", self.review);
        self.tests = clamp("tests", self.tests);
    }

    fn from_value(value: Option<&Value>) -> Self {
        let Some(Value::Object(map)) = value else {
            return Self::default();
        };
        Self {
            problems: lenient_u32(map.get("problems")),
            fixes: lenient_u32(map.get("fixes")),
            review: lenient_u32(map.get("review")),
            tests: lenient_u32(map.get("tests")),
        }
    }
}

// =============================================================================
// REVIEW RESULT
// =============================================================================

/// The grading verdict for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewResult {
    /// Total score, 0-100.
    pub score: u32,
    /// Slugs of known problems described in REVIEW.md.
    pub problems_found: Vec<String>,
    /// Slugs of known problems fixed in the diff.
    pub problems_fixed: Vec<String>,
    /// Points per band.
    pub breakdown: Breakdown,
    /// Short free-text summary.
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub recommendation: Recommendation,
    /// Set when the automatic review itself failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReviewResult {
    /// Decode the reviewer's JSON object and normalise it for `task_type`.
    #[must_use]
    pub fn from_value(map: &Map<String, Value>, task_type: TaskType) -> Self {
        let mut result = Self::decode(map);
        result.normalize(task_type);
        result.recommendation =
            recommendation(map).unwrap_or_else(|| Recommendation::from_score(result.score));
        result
    }

    /// Decode a verdict file, tolerating hand edits and older writers.
    ///
    /// Numbers are read leniently and clamped like `from_value`, but problem
    /// slugs are kept as stored and `error` is preserved.
    #[must_use]
    pub fn from_stored(map: &Map<String, Value>) -> Self {
        let mut result = Self::decode(map);
        result.score = result.score.min(MAX_SCORE);
        result.breakdown.clamp_to_bands();
        result.recommendation =
            recommendation(map).unwrap_or_else(|| Recommendation::from_score(result.score));
        result.error = match map.get("error") {
            Some(Value::Null) | None => None,
            other => Some(text(other)),
        };
        result
    }

    fn decode(map: &Map<String, Value>) -> Self {
        Self {
            score: lenient_u32(map.get("score")),
            problems_found: string_list(map.get("problems_found")),
            problems_fixed: string_list(map.get("problems_fixed")),
            breakdown: Breakdown::from_value(map.get("breakdown")),
            summary: text(map.get("summary")),
            strengths: string_list(map.get("strengths")),
            improvements: string_list(map.get("improvements")),
            recommendation: Recommendation::default(),
            error: None,
        }
    }

    /// Verdict used when the reviewer did not answer in time.
    #[must_use]
    pub fn timed_out() -> Self {
        Self {
            score: 50,
            recommendation: Recommendation::Review,
            summary: "AI review did not finish in the allotted time. Manual review required."
                .to_string(),
            improvements: vec!["Automatic review could not be completed".to_string()],
            ..Self::default()
        }
    }

    /// Verdict used when the review could not be performed at all.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            score: 0,
            recommendation: Recommendation::Review,
            summary: format!("AI review error: {}. Manual review required.", message),
            error: Some(message),
            ..Self::default()
        }
    }

    /// Whether the automatic review failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Enforce score bounds and problem-list consistency for `task_type`.
    pub fn normalize(&mut self, task_type: TaskType) {
        self.score = self.score.min(MAX_SCORE);
        self.breakdown.clamp_to_bands();
        self.problems_found = known_slugs(&self.problems_found, task_type, "problems_found");
        self.problems_fixed = known_slugs(&self.problems_fixed, task_type, "problems_fixed");

        for slug in &self.problems_fixed {
            if !self.problems_found.contains(slug) {
                self.problems_found.push(slug.clone());
            }
        }
    }
}

// =============================================================================
// LENIENT DECODING
// =============================================================================

fn recommendation(map: &Map<String, Value>) -> Option<Recommendation> {
    map.get("recommendation")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Recommendation>().ok())
}

fn lenient_u32(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => number_to_u32(n),
        Some(Value::String(s)) => s
            .trim()
            .parse::<serde_json::Number>()
            .map(|n| number_to_u32(&n))
            .unwrap_or(0),
        _ => 0,
    }
}

fn number_to_u32(n: &serde_json::Number) -> u32 {
    if let Some(u) = n.as_u64() {
        return u32::try_from(u).unwrap_or(u32::MAX);
    }
    if n.as_i64().is_some() {
        // Negative integer.
        return 0;
    }
    match n.as_f64() {
        // `as` saturates and truncates toward zero.
        Some(f) if f.is_finite() && f > 0.0 => f as u32,
        _ => 0,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn known_slugs(slugs: &[String], task_type: TaskType, field: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(slugs.len());
    for raw in slugs {
        let slug = raw.trim().to_ascii_lowercase();
        if !task_type.has_problem(&slug) {
            warn!(field, slug = %raw, task = %task_type, "dropping unknown problem slug");
            continue;
        }
        if !out.contains(&slug) {
            out.push(slug);
        }
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
