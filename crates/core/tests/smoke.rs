//! Smoke tests for the core crate.
//!
//! These tests verify that the basic infrastructure works:
//! - Trees can be built, compared, hashed and serialized
//! - Bracketed strings parse back into the trees they came from
//! - Search budgets run out when they should

use montague_core::{CoreError, Node, SearchBudget};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

// ============================================================================
// Tree Tests
// ============================================================================

fn coordination(left_first: bool) -> Node {
    let np = |name: &str| Node::leaf(name).wrap("PN").wrap("NP");
    let and = || Node::leaf("and").wrap("coord");
    if left_first {
        Node::branch(
            "NP",
            vec![Node::branch("NP", vec![np("a"), and(), np("b")]), and(), np("c")],
        )
    } else {
        Node::branch(
            "NP",
            vec![np("a"), and(), Node::branch("NP", vec![np("b"), and(), np("c")])],
        )
    }
}

#[test]
fn smoke_tree_bracketing() {
    let tree = Node::branch(
        "S",
        vec![
            Node::leaf("jane").wrap("PN").wrap("NP"),
            Node::leaf("ran").wrap("V_I").wrap("VP"),
        ],
    );
    assert_eq!(
        tree.bracketed(),
        "[ S [ NP [ PN [ jane ] ] ] [ VP [ V_I [ ran ] ] ] ]"
    );
    assert_eq!(format!("{}", tree), tree.bracketed());
}

#[test]
fn smoke_distinct_bracketings_differ() {
    let a = coordination(true);
    let b = coordination(false);
    assert_ne!(a, b);
    assert_eq!(a.leaves(), b.leaves());

    let set: HashSet<Node> = [a.clone(), b, a].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn smoke_tree_json() {
    let tree = coordination(true);
    let json = serde_json::to_string(&tree).unwrap();
    assert!(json.starts_with(r#"{"label":"NP","children":["#));

    let back: Node = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tree);
    assert_eq!(back.fingerprint(), tree.fingerprint());
}

#[test]
fn smoke_tree_json_leaf_without_children() {
    let leaf: Node = serde_json::from_str(r#"{"label":"jane"}"#).unwrap();
    assert!(leaf.is_leaf());
    assert_eq!(serde_json::to_string(&leaf).unwrap(), r#"{"label":"jane"}"#);
}

#[test]
fn smoke_invalid_bracketing() {
    match Node::parse_bracketed("[ S [ NP ] ") {
        Err(CoreError::InvalidTree { reason }) => assert!(reason.contains("unclosed")),
        other => panic!("expected invalid tree, got {:?}", other),
    }
}

// ============================================================================
// Budget Tests
// ============================================================================

#[test]
fn smoke_budget_steps() {
    let mut meter = SearchBudget::unlimited().with_max_steps(10).start();
    let charged = (0..100).take_while(|_| meter.charge().is_ok()).count();
    assert_eq!(charged, 10);
}

#[test]
fn smoke_budget_duration_roundtrip() {
    let budget = SearchBudget::unlimited().with_max_duration(Duration::from_millis(250));
    assert_eq!(budget.max_duration(), Some(Duration::from_millis(250)));
}

// ============================================================================
// Properties
// ============================================================================

fn arb_tree() -> impl Strategy<Value = Node> {
    let leaf = prop::sample::select(vec!["a", "b", "jane", "ran"]).prop_map(|label| Node::leaf(label));
    leaf.prop_recursive(4, 32, 3, |inner| {
        (
            prop::sample::select(vec!["S", "NP", "VP", "N'"]),
            prop::collection::vec(inner, 1..=3),
        )
            .prop_map(|(label, children)| Node::branch(label, children))
    })
}

proptest! {
    #[test]
    fn prop_bracketing_roundtrips(tree in arb_tree()) {
        let parsed = Node::parse_bracketed(&tree.bracketed()).unwrap();
        prop_assert_eq!(parsed.fingerprint(), tree.fingerprint());
        prop_assert_eq!(parsed, tree);
    }

    #[test]
    fn prop_equal_trees_share_fingerprints(a in arb_tree(), b in arb_tree()) {
        if a == b {
            prop_assert_eq!(a.fingerprint(), b.fingerprint());
        }
        prop_assert_eq!(a == b, a.bracketed() == b.bracketed());
    }

    #[test]
    fn prop_size_counts_every_node(tree in arb_tree()) {
        let opening = tree.bracketed().matches('[').count();
        prop_assert_eq!(tree.size(), opening);
    }
}
