//! # Parse Trees - Immutable Labelled Nodes
//!
//! A derivation is a tree of labelled nodes: leaves carry the tokens of the
//! sentence, inner nodes carry the category a rewrite rule produced.
//!
//! ## Sharing
//!
//! A `Node` is a cheap handle onto an `Arc`-shared body. Collapsing a span of
//! constituents into a new parent clones handles, never subtrees, so states in
//! a backtracking search share everything except the wrapper they add.
//!
//! ## Structural Identity
//!
//! Two nodes are equal when they have the same label and pairwise-equal
//! children in order. Every node carries a 64-bit fingerprint computed once,
//! bottom-up, from its label and its children's fingerprints. `Hash` only
//! writes the fingerprint, so hashing a tree is O(1) regardless of depth.
//!
//! ```rust
//! use montague_core::tree::Node;
//!
//! let tree = Node::branch("S", vec![
//!     Node::leaf("jane").wrap("PN").wrap("NP"),
//!     Node::leaf("ran").wrap("V_I").wrap("VP"),
//! ]);
//!
//! assert_eq!(tree.compact(), "S[ NP[ PN[ jane ] ] VP[ V_I[ ran ] ] ]");
//! assert_eq!(tree.to_string(), "[ S [ NP [ PN [ jane ] ] ] [ VP [ V_I [ ran ] ] ] ]");
//! assert_eq!(Node::parse_bracketed(&tree.bracketed()).unwrap(), tree);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::CoreError;

/// An immutable node in a parse tree.
///
/// An empty child list marks a terminal (a token of the sentence).
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "TreeRepr", into = "TreeRepr")]
pub struct Node(Arc<NodeBody>);

struct NodeBody {
    label: String,
    children: Vec<Node>,
    fingerprint: u64,
}

impl Node {
    /// Create a terminal node.
    pub fn leaf(label: impl Into<String>) -> Self {
        Self::branch(label, Vec::new())
    }

    /// Create a node over the given children (in order).
    pub fn branch(label: impl Into<String>, children: Vec<Node>) -> Self {
        let label = label.into();
        let fingerprint = fingerprint_of(&label, &children);
        Node(Arc::new(NodeBody {
            label,
            children,
            fingerprint,
        }))
    }

    /// Wrap this node as the only child of a new parent.
    pub fn wrap(self, label: impl Into<String>) -> Self {
        Self::branch(label, vec![self])
    }

    /// The category (or token) carried by this node.
    pub fn label(&self) -> &str {
        &self.0.label
    }

    /// Children, left to right.
    pub fn children(&self) -> &[Node] {
        &self.0.children
    }

    /// True for terminals.
    pub fn is_leaf(&self) -> bool {
        self.0.children.is_empty()
    }

    /// Number of children.
    pub fn arity(&self) -> usize {
        self.0.children.len()
    }

    /// Structural fingerprint; equal trees always have equal fingerprints.
    pub fn fingerprint(&self) -> u64 {
        self.0.fingerprint
    }

    /// True when both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Height of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Total number of nodes.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(Node::size).sum::<usize>()
    }

    /// Terminal labels, left to right. For a derivation this is the sentence.
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        if self.is_leaf() {
            out.push(self.label());
        } else {
            for child in self.children() {
                child.collect_leaves(out);
            }
        }
    }

    /// Canonical bracket serialization: `[ Label child1 child2 ... ]`.
    ///
    /// This is the exchange format for external renderers.
    pub fn bracketed(&self) -> String {
        let mut out = String::new();
        self.write_bracketed(&mut out);
        out
    }

    fn write_bracketed(&self, out: &mut String) {
        out.push_str("[ ");
        out.push_str(self.label());
        for child in self.children() {
            out.push(' ');
            child.write_bracketed(out);
        }
        out.push_str(" ]");
    }

    /// Compact form with labels outside the brackets: `S[ NP[ jane ] VP[ ran ] ]`.
    pub fn compact(&self) -> String {
        if self.is_leaf() {
            return self.label().to_string();
        }
        let parts: Vec<String> = self.children().iter().map(Node::compact).collect();
        format!("{}[ {} ]", self.label(), parts.join(" "))
    }

    /// Label-free shape of the tree, e.g. `[[[]][[]]]`.
    pub fn shape(&self) -> String {
        let inner: String = self.children().iter().map(Node::shape).collect();
        format!("[{}]", inner)
    }

    /// Indented one-node-per-line outline.
    pub fn outline(&self) -> String {
        self.outline_indent(0)
    }

    fn outline_indent(&self, indent: usize) -> String {
        let mut out = format!("{}{}\n", "  ".repeat(indent), self.label());
        for child in self.children() {
            out.push_str(&child.outline_indent(indent + 1));
        }
        out
    }

    /// Parse the canonical bracket serialization back into a tree.
    pub fn parse_bracketed(input: &str) -> Result<Node, CoreError> {
        let mut tokens = input.split_whitespace().peekable();
        let node = parse_node(&mut tokens)?;
        match tokens.next() {
            None => Ok(node),
            Some(extra) => Err(CoreError::InvalidTree {
                reason: format!("trailing input starting at '{}'", extra),
            }),
        }
    }
}

fn parse_node<'a, I>(tokens: &mut std::iter::Peekable<I>) -> Result<Node, CoreError>
where
    I: Iterator<Item = &'a str>,
{
    match tokens.next() {
        Some("[") => {}
        Some(other) => {
            return Err(CoreError::InvalidTree {
                reason: format!("expected '[', found '{}'", other),
            })
        }
        None => {
            return Err(CoreError::InvalidTree {
                reason: "unexpected end of input".to_string(),
            })
        }
    }

    let label = match tokens.next() {
        Some("[") | Some("]") | None => {
            return Err(CoreError::InvalidTree {
                reason: "missing node label".to_string(),
            })
        }
        Some(label) => label,
    };

    let mut children = Vec::new();
    loop {
        match tokens.peek() {
            Some(&"]") => {
                tokens.next();
                return Ok(Node::branch(label, children));
            }
            Some(&"[") => children.push(parse_node(tokens)?),
            Some(other) => {
                return Err(CoreError::InvalidTree {
                    reason: format!("unbracketed token '{}' under '{}'", other, label),
                })
            }
            None => {
                return Err(CoreError::InvalidTree {
                    reason: format!("unclosed node '{}'", label),
                })
            }
        }
    }
}

fn fingerprint_of(label: &str, children: &[Node]) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write_usize(label.len());
    hasher.write(label.as_bytes());
    hasher.write_usize(children.len());
    for child in children {
        hasher.write_u64(child.fingerprint());
    }
    hasher.finish()
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.fingerprint() == other.fingerprint()
                && self.label() == other.label()
                && self.children() == other.children())
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.fingerprint());
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bracketed())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.compact())
    }
}

/// Plain recursive form used for (de)serialization.
#[derive(Serialize, Deserialize)]
struct TreeRepr {
    label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeRepr>,
}

impl From<Node> for TreeRepr {
    fn from(node: Node) -> Self {
        TreeRepr {
            label: node.label().to_string(),
            children: node.children().iter().cloned().map(TreeRepr::from).collect(),
        }
    }
}

impl From<TreeRepr> for Node {
    fn from(repr: TreeRepr) -> Self {
        Node::branch(
            repr.label,
            repr.children.into_iter().map(Node::from).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn jane_ran() -> Node {
        Node::branch(
            "S",
            vec![
                Node::leaf("jane").wrap("PN").wrap("NP"),
                Node::leaf("ran").wrap("V_I").wrap("VP"),
            ],
        )
    }

    #[test]
    fn test_leaf_has_no_children() {
        let leaf = Node::leaf("jane");
        assert!(leaf.is_leaf());
        assert_eq!(leaf.arity(), 0);
        assert_eq!(leaf.depth(), 1);
        assert_eq!(leaf.bracketed(), "[ jane ]");
    }

    #[test]
    fn test_bracketed_serialization() {
        assert_eq!(
            jane_ran().bracketed(),
            "[ S [ NP [ PN [ jane ] ] ] [ VP [ V_I [ ran ] ] ] ]"
        );
    }

    #[test]
    fn test_compact_form() {
        assert_eq!(jane_ran().compact(), "S[ NP[ PN[ jane ] ] VP[ V_I[ ran ] ] ]");
    }

    #[test]
    fn test_structural_equality_across_allocations() {
        let a = jane_ran();
        let b = jane_ran();
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_label_difference_breaks_equality() {
        let a = Node::leaf("x").wrap("NP");
        let b = Node::leaf("x").wrap("VP");
        assert_ne!(a, b);
    }

    #[test]
    fn test_bracketing_difference_breaks_equality() {
        let a = Node::branch(
            "NP",
            vec![
                Node::branch("NP", vec![Node::leaf("a"), Node::leaf("b")]),
                Node::leaf("c"),
            ],
        );
        let b = Node::branch(
            "NP",
            vec![
                Node::leaf("a"),
                Node::branch("NP", vec![Node::leaf("b"), Node::leaf("c")]),
            ],
        );
        assert_ne!(a, b);
        assert_eq!(a.leaves(), b.leaves());
        assert_ne!(a.shape(), b.shape());
    }

    #[test]
    fn test_hash_set_deduplicates_structurally() {
        let mut set = HashSet::new();
        set.insert(jane_ran());
        set.insert(jane_ran());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_size_depth_leaves() {
        let tree = jane_ran();
        assert_eq!(tree.size(), 7);
        assert_eq!(tree.depth(), 4);
        assert_eq!(tree.leaves(), vec!["jane", "ran"]);
    }

    #[test]
    fn test_shape() {
        assert_eq!(jane_ran().shape(), "[[[[]]][[[]]]]");
    }

    #[test]
    fn test_outline() {
        let tree = Node::leaf("ran").wrap("V_I");
        assert_eq!(tree.outline(), "V_I\n  ran\n");
    }

    #[test]
    fn test_parse_bracketed_roundtrip() {
        let tree = jane_ran();
        let parsed = Node::parse_bracketed(&tree.bracketed()).unwrap();
        assert_eq!(parsed, tree);
    }

    #[test]
    fn test_parse_bracketed_rejects_garbage() {
        assert!(Node::parse_bracketed("").is_err());
        assert!(Node::parse_bracketed("S").is_err());
        assert!(Node::parse_bracketed("[ S [ NP ]").is_err());
        assert!(Node::parse_bracketed("[ S ] ]").is_err());
        assert!(Node::parse_bracketed("[ S jane ]").is_err());
        assert!(Node::parse_bracketed("[ ]").is_err());
    }
}
