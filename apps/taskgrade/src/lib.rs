//! # Taskgrade Library
//!
//! This library exposes the taskgrade modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod cli;
pub mod error;
pub mod review;
pub mod runner;

// Re-export taskgrade_core for convenience
pub use taskgrade_core;
