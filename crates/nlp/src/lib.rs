//! # NLP - Exhaustive Parsing and Montague Semantics
//!
//! This crate parses sentences under an ambiguous phrase-structure grammar by
//! enumerating every derivation, then evaluates a derivation compositionally
//! against a finite model.
//!
//! ## Core Concepts
//!
//! - **Rule tables**: `X Y → Z` rewrite rules of width 1 to 3, lexicon included
//! - **Percolation**: tokens climb their chain of unary rules before search
//! - **Enumeration**: backtracking search over bracketings, with exhausted
//!   states memoized and duplicate trees dropped
//! - **Composition**: binary nodes apply one child's meaning to the other's
//!
//! ## Example: "jane admired mike"
//!
//! ```rust
//! use std::sync::Arc;
//! use montague_nlp::{evaluate, Enumerator, Model, RuleTable, Value};
//!
//! let grammar = Arc::new(RuleTable::english().unwrap());
//! let enumerator = Enumerator::new(grammar);
//! let model = Model::toy().unwrap();
//!
//! assert_eq!(evaluate("jane admired mike", &enumerator, &model).unwrap(), Value::Boolean(true));
//! assert_eq!(evaluate("mike admired jane", &enumerator, &model).unwrap(), Value::Boolean(false));
//! ```

pub mod compose;
mod error;
pub mod grammar;
pub mod model;
pub mod parse;
pub mod semantics;
pub mod state;

pub use compose::Evaluator;
pub use error::NlpError;
pub use grammar::{tokenize, GrammarBuilder, RuleTable, COORDINATABLE, MAX_RULE_WIDTH};
pub use model::{default_quantifiers, Interpretation, Model, ModelConfig};
pub use parse::{Enumerator, Forest, SearchStats};
pub use semantics::{ApplyError, Entity, Extension, Quantifier, Relation, Value};
pub use state::{Span, State};

pub use montague_core::{Node, SearchBudget};

/// Parse a sentence and evaluate its first derivation.
///
/// Fails with `NoDerivation` if the grammar admits no tree.
pub fn evaluate<I: Interpretation>(
    sentence: &str,
    enumerator: &Enumerator,
    interpretation: I,
) -> Result<Value, NlpError> {
    let forest = enumerator.parse(sentence)?;
    let root = forest.first().ok_or_else(|| NlpError::NoDerivation {
        sentence: sentence.to_string(),
    })?;
    Evaluator::new(interpretation).evaluate(root)
}
