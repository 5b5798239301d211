//! # Rubric Module
//!
//! The planted defects a candidate is expected to find and the point bands
//! the reviewer scores against.
//!
//! The catalogue order is stable: prompts number problems in this order and
//! `TaskType::problems` preserves it.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// TASK TYPE
// =============================================================================

/// Which half of the exercise is being graded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Backend,
    Frontend,
    #[default]
    Fullstack,
}

impl TaskType {
    /// All task types, in CLI order.
    pub const ALL: [TaskType; 3] = [TaskType::Backend, TaskType::Frontend, TaskType::Fullstack];

    /// Lowercase name used on the command line and in JSON.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Backend => "backend",
            TaskType::Frontend => "frontend",
            TaskType::Fullstack => "fullstack",
        }
    }

    /// Whether problems in `area` are graded for this task.
    #[must_use]
    pub fn covers(self, area: Area) -> bool {
        match self {
            TaskType::Backend => area == Area::Backend,
            TaskType::Frontend => area == Area::Frontend,
            TaskType::Fullstack => true,
        }
    }

    /// Areas graded for this task, in catalogue order.
    #[must_use]
    pub fn areas(self) -> Vec<Area> {
        [Area::Backend, Area::Frontend]
            .into_iter()
            .filter(|area| self.covers(*area))
            .collect()
    }

    /// Known problems graded for this task, in catalogue order.
    #[must_use]
    pub fn problems(self) -> Vec<&'static KnownProblem> {
        KNOWN_PROBLEMS
            .iter()
            .filter(|problem| self.covers(problem.area))
            .collect()
    }

    /// Whether `slug` names a problem graded for this task.
    #[must_use]
    pub fn has_problem(self, slug: &str) -> bool {
        find_problem(slug).is_some_and(|problem| self.covers(problem.area))
    }

    /// Human-readable part of the codebase under review.
    #[must_use]
    pub fn scope_description(self) -> &'static str {
        match self {
            TaskType::Backend => "backend",
            TaskType::Frontend => "frontend",
            TaskType::Fullstack => "backend + frontend",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backend" => Ok(TaskType::Backend),
            "frontend" => Ok(TaskType::Frontend),
            "fullstack" => Ok(TaskType::Fullstack),
            _ => Err(Error::UnknownTaskType(s.to_string())),
        }
    }
}

// =============================================================================
// KNOWN PROBLEMS
// =============================================================================

/// Part of the items application a problem lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Backend,
    Frontend,
}

impl Area {
    /// Section title used in prompts and reports.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Area::Backend => "Backend",
            Area::Frontend => "Frontend",
        }
    }

    /// Stack the area is written in.
    #[must_use]
    pub fn stack(self) -> &'static str {
        match self {
            Area::Backend => "Python/FastAPI",
            Area::Frontend => "React/TypeScript",
        }
    }
}

/// A defect planted in the exercise code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnownProblem {
    /// Stable identifier the reviewer reports back.
    pub slug: &'static str,
    /// Where the defect lives.
    pub area: Area,
    /// Short description of the defect.
    pub title: &'static str,
    /// What the defect costs (security, reliability, ...).
    pub impact: &'static str,
}

/// The full catalogue of planted defects.
pub static KNOWN_PROBLEMS: [KnownProblem; 8] = [
    KnownProblem {
        slug: "sql_injection",
        area: Area::Backend,
        title: "SQL injection: raw query built with an f-string",
        impact: "critical vulnerability",
    },
    KnownProblem {
        slug: "no_validation",
        area: Area::Backend,
        title: "No validation: request body taken as a dict instead of a Pydantic schema",
        impact: "reliability",
    },
    KnownProblem {
        slug: "no_error_handling",
        area: Area::Backend,
        title: "No error handling: database work without try/except",
        impact: "reliability",
    },
    KnownProblem {
        slug: "hardcoded_secrets",
        area: Area::Backend,
        title: "Hardcoded secrets: SECRET_KEY committed in the code",
        impact: "security",
    },
    KnownProblem {
        slug: "memory_leak",
        area: Area::Frontend,
        title: "Memory leak: useEffect without cleanup",
        impact: "memory leak",
    },
    KnownProblem {
        slug: "xss",
        area: Area::Frontend,
        title: "XSS: dangerouslySetInnerHTML without sanitizing",
        impact: "security",
    },
    KnownProblem {
        slug: "any_types",
        area: Area::Frontend,
        title: "`any` types: missing TypeScript typing",
        impact: "typing",
    },
    KnownProblem {
        slug: "wrong_key",
        area: Area::Frontend,
        title: "Wrong key: index instead of id in map",
        impact: "React rendering",
    },
];

/// Look up a known problem by slug.
#[must_use]
pub fn find_problem(slug: &str) -> Option<&'static KnownProblem> {
    KNOWN_PROBLEMS.iter().find(|problem| problem.slug == slug)
}

// =============================================================================
// SCORE BANDS
// =============================================================================

/// A slice of the 100-point score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBand {
    /// Key used in the `breakdown` object.
    pub name: &'static str,
    /// Maximum points for the band.
    pub max: u32,
    /// What the band rewards.
    pub description: &'static str,
}

/// Score bands. Maxima sum to 100.
pub static SCORE_BANDS: [ScoreBand; 4] = [
    ScoreBand {
        name: "problems",
        max: 30,
        description: "Problems found: how many of the known problems REVIEW.md describes",
    },
    ScoreBand {
        name: "fixes",
        max: 35,
        description: "Quality of fixes: correctness and cleanliness of the code",
    },
    ScoreBand {
        name: "review",
        max: 15,
        description: "Quality of review: clarity of the write-up, best practices",
    },
    ScoreBand {
        name: "tests",
        max: 20,
        description: "Quality of tests: coverage of the critical cases",
    },
];

/// Maximum score.
pub const MAX_SCORE: u32 = 100;

/// Score at or above which a submission passes automatically.
pub const PASS_THRESHOLD: u32 = 60;

/// Score at or above which a submission goes to manual review.
pub const REVIEW_THRESHOLD: u32 = 40;

/// Look up a band maximum by name.
#[must_use]
pub fn band_max(name: &str) -> Option<u32> {
    SCORE_BANDS
        .iter()
        .find(|band| band.name == name)
        .map(|band| band.max)
}

// =============================================================================
// TESTS
// =============================================================================
