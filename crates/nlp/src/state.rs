//! Search States and Span Matching
//!
//! A `State` is one bracketing of the sentence: an ordered sequence of
//! constituents, each already collapsed into a single labelled node. The
//! spans a rule can rewrite are derived from the constituents when the state
//! is built and never edited afterwards.
//!
//! ```text
//! NP  V_T  NP          spans: [1, 3) "V_T NP" → VP
//! NP  VP               spans: [0, 2) "NP VP"  → S
//! S                    complete
//! ```

use montague_core::Node;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::grammar::{RuleTable, MAX_RULE_WIDTH};

/// A half-open range `[start, end)` of constituent indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of constituents covered.
    pub fn width(&self) -> usize {
        self.end - self.start
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// One bracketing of a sentence.
///
/// Equality and hashing look only at the constituents; the applicable spans
/// are a function of them.
#[derive(Debug, Clone)]
pub struct State {
    constituents: Vec<Node>,
    spans: Vec<Span>,
}

impl State {
    /// Build a state, matching its spans against the rule table.
    pub fn new(constituents: Vec<Node>, rules: &RuleTable) -> Self {
        let spans = applicable_spans(&constituents, rules);
        Self {
            constituents,
            spans,
        }
    }

    /// The constituents, left to right.
    pub fn constituents(&self) -> &[Node] {
        &self.constituents
    }

    /// Every span whose labels form a rule key, in discovery order
    /// (by start index, then by width).
    pub fn applicable_spans(&self) -> &[Span] {
        &self.spans
    }

    /// Number of constituents.
    pub fn len(&self) -> usize {
        self.constituents.len()
    }

    /// True for the (degenerate) empty sentence.
    pub fn is_empty(&self) -> bool {
        self.constituents.is_empty()
    }

    /// Labels of the constituents.
    pub fn labels(&self) -> Vec<&str> {
        self.constituents.iter().map(Node::label).collect()
    }

    /// A single constituent remains.
    pub fn is_accepting(&self) -> bool {
        self.constituents.len() == 1
    }

    /// A single constituent remains and no rule applies to it.
    pub fn is_complete(&self) -> bool {
        self.is_accepting() && self.spans.is_empty()
    }

    /// More than one constituent and nothing left to rewrite.
    pub fn is_dead_end(&self) -> bool {
        self.constituents.len() > 1 && self.spans.is_empty()
    }

    /// The root node of an accepting state.
    pub fn root(&self) -> Option<&Node> {
        match self.constituents.as_slice() {
            [root] => Some(root),
            _ => None,
        }
    }

    /// Collapse a span into one node labelled by the matching rule.
    ///
    /// Returns `None` if no rule matches the span. The new node takes the
    /// spanned constituents as its children; every other constituent is
    /// shared with this state.
    pub fn collapse(&self, span: Span, rules: &RuleTable) -> Option<State> {
        if span.width() == 0 || span.end > self.constituents.len() {
            return None;
        }
        let covered = &self.constituents[span.start..span.end];
        let output = rules.get(&join_labels(covered))?;

        let mut next = Vec::with_capacity(self.constituents.len() - span.width() + 1);
        next.extend_from_slice(&self.constituents[..span.start]);
        next.push(Node::branch(output, covered.to_vec()));
        next.extend_from_slice(&self.constituents[span.end..]);

        Some(State::new(next, rules))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.constituents == other.constituents
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.constituents.hash(state);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels().join(" "))
    }
}

/// Scan every start index and every width up to `MAX_RULE_WIDTH`, keeping the
/// spans whose joined labels are a rule key.
pub fn applicable_spans(constituents: &[Node], rules: &RuleTable) -> Vec<Span> {
    let mut spans = Vec::new();
    for start in 0..constituents.len() {
        let widest = MAX_RULE_WIDTH.min(constituents.len() - start);
        for width in 1..=widest {
            let end = start + width;
            if rules.contains_key(&join_labels(&constituents[start..end])) {
                spans.push(Span::new(start, end));
            }
        }
    }
    spans
}

fn join_labels(nodes: &[Node]) -> String {
    nodes.iter().map(Node::label).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;
    use pretty_assertions::assert_eq;

    fn rules() -> RuleTable {
        GrammarBuilder::new()
            .rule("NP VP", "S")
            .rule("V_T NP", "VP")
            .rule("NP coord NP", "NP")
            .build()
            .unwrap()
    }

    fn leaves(labels: &[&str]) -> Vec<Node> {
        labels.iter().map(|l| Node::leaf(*l)).collect()
    }

    #[test]
    fn test_spans_of_each_width() {
        let state = State::new(leaves(&["NP", "coord", "NP", "V_T", "NP"]), &rules());
        assert_eq!(
            state.applicable_spans(),
            &[Span::new(0, 3), Span::new(3, 5)]
        );
    }

    #[test]
    fn test_spans_clipped_at_end() {
        let state = State::new(leaves(&["NP", "coord"]), &rules());
        assert!(state.applicable_spans().is_empty());
        assert!(state.is_dead_end());
    }

    #[test]
    fn test_collapse_replaces_span() {
        let table = rules();
        let state = State::new(leaves(&["NP", "V_T", "NP"]), &table);
        let next = state.collapse(Span::new(1, 3), &table).unwrap();
        assert_eq!(next.labels(), vec!["NP", "VP"]);
        assert_eq!(next.constituents()[1].compact(), "VP[ V_T NP ]");
        assert_eq!(next.applicable_spans(), &[Span::new(0, 2)]);

        // untouched constituents are shared, not copied
        assert!(next.constituents()[0].ptr_eq(&state.constituents()[0]));
        assert!(next.constituents()[1].children()[0].ptr_eq(&state.constituents()[1]));
    }

    #[test]
    fn test_collapse_to_complete() {
        let table = rules();
        let state = State::new(leaves(&["NP", "VP"]), &table);
        let done = state.collapse(Span::new(0, 2), &table).unwrap();
        assert!(done.is_accepting());
        assert!(done.is_complete());
        assert_eq!(done.root().unwrap().label(), "S");
    }

    #[test]
    fn test_collapse_rejects_unmatched_span() {
        let table = rules();
        let state = State::new(leaves(&["NP", "VP"]), &table);
        assert!(state.collapse(Span::new(0, 1), &table).is_none());
        assert!(state.collapse(Span::new(1, 3), &table).is_none());
        assert!(state.collapse(Span::new(1, 1), &table).is_none());
    }

    #[test]
    fn test_state_equality_is_structural() {
        let table = rules();
        let a = State::new(leaves(&["NP", "VP"]), &table);
        let b = State::new(leaves(&["NP", "VP"]), &table);
        let c = State::new(leaves(&["VP", "NP"]), &table);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_display() {
        let state = State::new(leaves(&["NP", "V_T", "NP"]), &rules());
        assert_eq!(state.to_string(), "NP V_T NP");
    }
}
