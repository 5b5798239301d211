//! # Error Module
//!
//! Errors raised by the rubric, prompt and verdict logic.

use thiserror::Error;

/// Errors from taskgrade-core.
#[derive(Debug, Error)]
pub enum Error {
    /// Task type string is not one of backend, frontend, fullstack.
    #[error("unknown task type '{0}' (expected backend, frontend or fullstack)")]
    UnknownTaskType(String),

    /// Reviewer output did not contain a JSON object.
    #[error("could not parse JSON from reviewer response: {0}")]
    UnparsableResponse(String),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for taskgrade-core operations.
pub type Result<T> = std::result::Result<T, Error>;
