//! Compositional Evaluation of Derivations
//!
//! The evaluator walks a parse tree bottom-up:
//!
//! - a leaf is looked up in the interpretation;
//! - a unary node passes its child's value through (category projection);
//! - a binary node applies one child to the other, left-to-right first and
//!   right-to-left if that does not type-check;
//! - wider nodes are rejected.
//!
//! Trying both orders lets a grammar put the functor on either side
//! (`Q N'` vs. `NP VP`). With the value types of `semantics` at most one
//! order ever type-checks, so the fallback cannot pick between two readings.
//!
//! # Example
//!
//! ```rust
//! use montague_core::Node;
//! use montague_nlp::compose::Evaluator;
//! use montague_nlp::model::Model;
//! use montague_nlp::semantics::Value;
//!
//! let mut model = Model::new(["j", "m"]);
//! model.add_individual("jane", "j").unwrap();
//! model.add_individual("mike", "m").unwrap();
//! model.add_relation("admired", [("j", "m")]).unwrap();
//!
//! let tree = Node::branch("S", vec![
//!     Node::leaf("jane").wrap("PN").wrap("NP"),
//!     Node::branch("VP", vec![
//!         Node::leaf("admired").wrap("V_T"),
//!         Node::leaf("mike").wrap("PN").wrap("NP"),
//!     ]),
//! ]);
//!
//! let value = Evaluator::new(&model).evaluate(&tree).unwrap();
//! assert_eq!(value, Value::Boolean(true));
//! ```

use montague_core::Node;

use crate::model::Interpretation;
use crate::parse::Forest;
use crate::semantics::Value;
use crate::NlpError;

/// Evaluates parse trees against an interpretation.
#[derive(Debug, Clone)]
pub struct Evaluator<I> {
    interpretation: I,
}

impl<I: Interpretation> Evaluator<I> {
    pub fn new(interpretation: I) -> Self {
        Self { interpretation }
    }

    pub fn interpretation(&self) -> &I {
        &self.interpretation
    }

    /// Compute the value of a tree.
    pub fn evaluate(&self, tree: &Node) -> Result<Value, NlpError> {
        match tree.children() {
            [] => self
                .interpretation
                .lookup(tree.label())
                .ok_or_else(|| NlpError::UnknownSymbol {
                    label: tree.label().to_string(),
                }),
            [only] => self.evaluate(only),
            [left, right] => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.compose(tree.label(), left, right)
            }
            children => Err(NlpError::UnsupportedArity {
                label: tree.label().to_string(),
                arity: children.len(),
            }),
        }
    }

    /// Evaluate every root of a forest, in order.
    pub fn evaluate_forest(&self, forest: &Forest) -> Vec<Result<Value, NlpError>> {
        forest.iter().map(|root| self.evaluate(root)).collect()
    }

    fn compose(&self, label: &str, left: Value, right: Value) -> Result<Value, NlpError> {
        let forward = match left.apply(&right) {
            Ok(value) => {
                tracing::trace!(node = label, result = %value, "left(right)");
                return Ok(value);
            }
            Err(err) => err,
        };
        match right.apply(&left) {
            Ok(value) => {
                tracing::trace!(node = label, result = %value, "right(left)");
                Ok(value)
            }
            Err(backward) => {
                tracing::debug!(
                    node = label,
                    forward = %forward,
                    backward = %backward,
                    "composition failed"
                );
                Err(NlpError::Composition {
                    label: label.to_string(),
                    left,
                    right,
                })
            }
        }
    }
}
