//! Exhaustive Derivation Enumeration
//!
//! The enumerator finds every way to collapse a sentence into a single root
//! by repeatedly rewriting one applicable span. The search is a depth-first
//! walk over `State`s driven by an explicit stack:
//!
//! ```text
//! top frame has an untried span  → push the collapsed child, keep the parent
//! top state is complete          → record its root (once), pop
//! otherwise                      → remember the state as exhausted, pop
//! ```
//!
//! Two sets live for the duration of one call: exhausted states (so the same
//! bracketing reached along a different path is not expanded again) and the
//! roots already recorded (so structurally equal trees are reported once).
//!
//! An empty forest is the normal way of saying "no derivation".
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use montague_nlp::grammar::GrammarBuilder;
//! use montague_nlp::parse::Enumerator;
//!
//! let rules = GrammarBuilder::new()
//!     .rule("NP VP", "S")
//!     .rule("PN", "NP")
//!     .rule("V_I", "VP")
//!     .words("PN", ["jane"])
//!     .words("V_I", ["ran"])
//!     .build()
//!     .unwrap();
//!
//! let forest = Enumerator::new(Arc::new(rules)).enumerate("jane ran").unwrap();
//! assert_eq!(forest.len(), 1);
//! assert_eq!(
//!     forest.roots()[0].compact(),
//!     "S[ NP[ PN[ jane ] ] VP[ V_I[ ran ] ] ]"
//! );
//! ```

use montague_core::{Node, SearchBudget};
use std::collections::HashSet;
use std::sync::Arc;

use crate::grammar::RuleTable;
use crate::state::{Span, State};
use crate::NlpError;

/// Counters collected during one enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Loop iterations.
    pub steps: u64,
    /// Child states pushed.
    pub states_pushed: u64,
    /// Distinct exhausted states remembered.
    pub dead_ends: usize,
    /// Completed roots discarded as duplicates.
    pub duplicates: u64,
    /// Deepest the stack got.
    pub max_stack_depth: usize,
}

/// The deduplicated set of derivations of one sentence, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    roots: Vec<Node>,
    stats: SearchStats,
}

impl Forest {
    /// All roots.
    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Take ownership of the roots.
    pub fn into_roots(self) -> Vec<Node> {
        self.roots
    }

    /// Number of derivations.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// True when the sentence has no derivation.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Iterate the roots.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.roots.iter()
    }

    /// The first root found.
    pub fn first(&self) -> Option<&Node> {
        self.roots.first()
    }

    /// True if a structurally equal tree is in the forest.
    pub fn contains(&self, tree: &Node) -> bool {
        self.roots.contains(tree)
    }

    /// Roots whose label is `label` (e.g. only full sentences, `S`).
    pub fn with_root<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.roots.iter().filter(move |root| root.label() == label)
    }

    /// Search counters.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Turn an empty forest into `NoDerivation`.
    pub fn require(self, sentence: &str) -> Result<Forest, NlpError> {
        if self.roots.is_empty() {
            Err(NlpError::NoDerivation {
                sentence: sentence.to_string(),
            })
        } else {
            Ok(self)
        }
    }
}

impl IntoIterator for Forest {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.roots.into_iter()
    }
}

impl<'a> IntoIterator for &'a Forest {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.roots.iter()
    }
}

/// A stack slot: a state and the spans not yet tried from it.
struct Frame {
    state: State,
    untried: Vec<Span>,
}

impl Frame {
    fn new(state: State) -> Self {
        let untried = state.applicable_spans().to_vec();
        Self { state, untried }
    }
}

/// Enumerates every derivation of a sentence under a fixed rule table.
#[derive(Debug, Clone)]
pub struct Enumerator {
    rules: Arc<RuleTable>,
    budget: SearchBudget,
}

impl Enumerator {
    /// Create an enumerator with no search budget.
    pub fn new(rules: Arc<RuleTable>) -> Self {
        Self {
            rules,
            budget: SearchBudget::unlimited(),
        }
    }

    /// Abort searches that run past `budget`.
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// The rule table.
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// The search budget.
    pub fn budget(&self) -> &SearchBudget {
        &self.budget
    }

    /// Tokenize, percolate, and enumerate.
    pub fn enumerate(&self, sentence: &str) -> Result<Forest, NlpError> {
        let tokens = self.rules.percolate_sentence(sentence)?;
        self.enumerate_tokens(tokens)
    }

    /// Enumerate, failing with `NoDerivation` if the forest is empty.
    pub fn parse(&self, sentence: &str) -> Result<Forest, NlpError> {
        self.enumerate(sentence)?.require(sentence)
    }

    /// Enumerate derivations of already-percolated constituents.
    ///
    /// A root that is a bare token (no rule was ever applied) is not a
    /// derivation and is not reported.
    pub fn enumerate_tokens(&self, tokens: Vec<Node>) -> Result<Forest, NlpError> {
        let rules = self.rules.as_ref();
        let mut meter = self.budget.start();
        let mut stats = SearchStats::default();

        let mut dead_ends: HashSet<State> = HashSet::new();
        let mut found: HashSet<Node> = HashSet::new();
        let mut roots = Vec::new();

        tracing::debug!(tokens = tokens.len(), "enumerating derivations");

        let mut stack = vec![Frame::new(State::new(tokens, rules))];
        while let Some(top) = stack.last_mut() {
            meter.charge()?;
            stats.steps += 1;

            if !dead_ends.contains(&top.state) {
                if let Some(span) = top.untried.pop() {
                    if let Some(child) = top.state.collapse(span, rules) {
                        tracing::trace!(span = %span, state = %child, "collapse");
                        stack.push(Frame::new(child));
                        stats.states_pushed += 1;
                        stats.max_stack_depth = stats.max_stack_depth.max(stack.len());
                    }
                    continue;
                }
            }

            let Some(frame) = stack.pop() else { break };
            let accepted = frame
                .state
                .root()
                .filter(|root| frame.state.is_complete() && !root.is_leaf())
                .cloned();
            match accepted {
                Some(root) => {
                    if found.insert(root.clone()) {
                        roots.push(root);
                    } else {
                        stats.duplicates += 1;
                    }
                }
                None => {
                    dead_ends.insert(frame.state);
                }
            }
        }

        stats.dead_ends = dead_ends.len();
        tracing::debug!(
            roots = roots.len(),
            steps = stats.steps,
            dead_ends = stats.dead_ends,
            duplicates = stats.duplicates,
            "enumeration finished"
        );

        Ok(Forest { roots, stats })
    }
}
