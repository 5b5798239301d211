//! # Taskgrade Core
//!
//! Grading logic for the take-home review exercise.
//!
//! The candidate receives a small "items" application with eight planted
//! defects, describes them in `REVIEW.md`, fixes them and adds tests. This
//! crate turns that submission into a reviewer prompt and turns the
//! reviewer's answer back into a normalised [`ReviewResult`].
//!
//! ```text
//! REVIEW.md + diff ──► prompt ──► (reviewer process) ──► extract ──► verdict
//! ```
//!
//! Spawning the reviewer lives in the app layer (apps/taskgrade). Everything
//! here is pure and deterministic.

pub mod error;
pub mod extract;
pub mod prompt;
pub mod report;
pub mod rubric;
pub mod verdict;

pub use error::{Error, Result};
pub use extract::{extract_response_text, extract_review, parse_review_json};
pub use prompt::ReviewPrompt;
pub use rubric::{find_problem, Area, KnownProblem, ScoreBand, TaskType, KNOWN_PROBLEMS, SCORE_BANDS};
pub use verdict::{Breakdown, Recommendation, ReviewResult};
