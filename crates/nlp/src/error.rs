//! Error types for parsing and evaluation.

use montague_core::CoreError;
use std::time::Duration;
use thiserror::Error;

use crate::semantics::Value;

/// Errors that can occur while building grammars, parsing, or evaluating.
#[derive(Debug, Clone, Error)]
pub enum NlpError {
    /// Single-category rules loop back on themselves.
    #[error("Grammar cycle: percolating '{label}' never reaches a category without a unary rule")]
    GrammarCycle { label: String },

    /// Two rules share a left-hand side.
    #[error("Duplicate rule key: '{key}'")]
    DuplicateRuleKey { key: String },

    /// A rule with no left-hand side.
    #[error("Rule producing '{output}' has an empty left-hand side")]
    EmptyRule { output: String },

    /// A rule output that is not a single category label.
    #[error("Rule '{key}' produces '{output}', which is not a single category label")]
    InvalidOutput { key: String, output: String },

    /// A rule whose left-hand side is wider than the parser can match.
    #[error("Rule '{key}' has {width} labels (maximum is {max})")]
    RuleTooWide { key: String, width: usize, max: usize },

    /// The sentence has no derivation under the grammar.
    #[error("No derivation for '{sentence}'")]
    NoDerivation { sentence: String },

    /// A leaf has no interpretation.
    #[error("Unknown symbol: '{label}'")]
    UnknownSymbol { label: String },

    /// Neither child can be applied to the other.
    #[error("Cannot compose '{label}': {left} and {right} are incompatible in either order")]
    Composition {
        label: String,
        left: Value,
        right: Value,
    },

    /// A node with more than two children.
    #[error("Unsupported arity at '{label}': {arity} children (at most 2)")]
    UnsupportedArity { label: String, arity: usize },

    /// The enumerator ran past its budget.
    #[error("Search budget exceeded after {steps} steps ({elapsed:?})")]
    SearchBudgetExceeded { steps: u64, elapsed: Duration },

    /// A model refers to something outside its domain.
    #[error("Invalid model: {reason}")]
    InvalidModel { reason: String },

    /// Configuration could not be read.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A core failure with no more specific mapping.
    #[error(transparent)]
    Core(CoreError),
}

impl From<CoreError> for NlpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::BudgetExceeded { steps, elapsed } => {
                NlpError::SearchBudgetExceeded { steps, elapsed }
            }
            other => NlpError::Core(other),
        }
    }
}

impl From<serde_json::Error> for NlpError {
    fn from(err: serde_json::Error) -> Self {
        NlpError::Config {
            message: err.to_string(),
        }
    }
}
