//! # Error Types
//!
//! Failures shared by every crate in the workspace: exhausted search budgets
//! and malformed tree serializations.

use std::time::Duration;
use thiserror::Error;

/// Core errors for tree handling and bounded search.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// A search ran past its step or time allowance.
    #[error("Search budget exceeded after {steps} steps ({elapsed:?})")]
    BudgetExceeded { steps: u64, elapsed: Duration },

    /// A bracketed tree string could not be parsed.
    #[error("Invalid tree: {reason}")]
    InvalidTree { reason: String },
}
