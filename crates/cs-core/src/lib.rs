//! # cs-core
//!
//! Core types shared across the cohortstat workspace: the error type and the
//! common test-result struct consumed by every statistical procedure.

#![warn(missing_docs)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::TestOutcome;

/// Version string reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
