//! Rewrite-Rule Grammars and Percolation
//!
//! A grammar is a table of rewrite rules, each mapping an ordered sequence of
//! one to three category labels onto a single output category:
//!
//! ```text
//! NP VP      → S
//! V_T NP     → VP
//! NP coord NP → NP
//! PN         → NP
//! jane       → PN
//! ```
//!
//! Lexical entries are ordinary length-1 rules whose left-hand side is a word.
//!
//! # Percolation
//!
//! Before search, every token is rewritten through the chain of length-1
//! rules until it reaches a category with no further unary rule
//! (`jane → PN → NP`). A cyclic chain of length-1 rules is a `GrammarCycle`
//! error when the table is built, since the search could otherwise rewrite a
//! single constituent forever.
//!
//! # Example
//!
//! ```rust
//! use montague_nlp::grammar::GrammarBuilder;
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
//! assert_eq!(rules.rewrite(&["NP", "VP"]), Some("S"));
//! let tokens = rules.percolate_sentence("jane ran").unwrap();
//! assert_eq!(tokens[0].compact(), "NP[ PN[ jane ] ]");
//! ```

use montague_core::Node;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::NlpError;

/// Widest left-hand side a rule may have.
///
/// Span matching only looks at windows of 1 to `MAX_RULE_WIDTH` constituents,
/// so wider rules are rejected when the table is built.
pub const MAX_RULE_WIDTH: usize = 3;

/// Categories that take part in `X coord X → X` coordination in the default
/// English grammar.
pub const COORDINATABLE: [&str; 9] = ["S", "XP", "NP", "VP", "Adj", "N", "V_I", "V_T", "N'"];

/// An immutable rule table.
///
/// Keys are the single-space join of the left-hand side labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: BTreeMap<String, String>,
    #[serde(skip)]
    label_count: usize,
}

impl RuleTable {
    /// Start building a table.
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    /// The default English grammar with coordination.
    pub fn english() -> Result<Self, NlpError> {
        GrammarBuilder::english().build()
    }

    /// Read a table from a JSON object such as `{"NP VP": "S", "PN": "NP"}`.
    ///
    /// Repeated keys in the object are reported as `DuplicateRuleKey`.
    pub fn from_json(json: &str) -> Result<Self, NlpError> {
        let RuleList(rules) = serde_json::from_str(json)?;
        GrammarBuilder::from_rules(rules).build()
    }

    /// Serialize the table as a JSON object, keys in sorted order.
    pub fn to_json(&self) -> Result<String, NlpError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Output category for an already-joined key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.rules.get(key).map(String::as_str)
    }

    /// Output category for a sequence of labels.
    pub fn rewrite(&self, labels: &[&str]) -> Option<&str> {
        self.get(&labels.join(" "))
    }

    /// True if some rule has exactly this key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.rules.contains_key(key)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules as `(key, output)` pairs in key order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of distinct labels appearing anywhere in the table.
    pub fn label_count(&self) -> usize {
        self.label_count
    }

    /// Rewrite a node through the chain of length-1 rules.
    ///
    /// Each step wraps the current node in a parent labelled by the rule's
    /// output. Built tables have no unary cycles, but the walk is still
    /// bounded by the number of distinct labels and reports `GrammarCycle`
    /// past it.
    pub fn percolate(&self, node: Node) -> Result<Node, NlpError> {
        let start = node.label().to_string();
        let mut current = node;
        let mut steps = 0;
        while let Some(parent) = self.get(current.label()) {
            if steps >= self.label_count {
                return Err(NlpError::GrammarCycle { label: start });
            }
            tracing::trace!(from = current.label(), to = parent, "percolate");
            current = current.wrap(parent);
            steps += 1;
        }
        Ok(current)
    }

    /// Split a sentence on single spaces and percolate every token.
    ///
    /// Tokens are taken as-is: no case folding, no punctuation stripping.
    pub fn percolate_sentence(&self, sentence: &str) -> Result<Vec<Node>, NlpError> {
        tokenize(sentence)
            .map(|token| self.percolate(Node::leaf(token)))
            .collect()
    }
}

/// Split a sentence into tokens on single-space boundaries.
pub fn tokenize(sentence: &str) -> impl Iterator<Item = &str> {
    sentence.split(' ')
}

/// Builds a `RuleTable`.
///
/// The builder is a plain value: methods consume and return it, and nothing
/// is shared between grammars built from clones.
#[derive(Debug, Clone, Default)]
pub struct GrammarBuilder {
    rules: Vec<(Vec<String>, String)>,
}

impl GrammarBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from `(left-hand side, output)` pairs.
    pub fn from_rules<K, V, I>(rules: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        rules
            .into_iter()
            .fold(Self::new(), |builder, (lhs, output)| {
                builder.rule(lhs.as_ref(), output)
            })
    }

    /// Add a rule. The left-hand side is a whitespace-separated label list.
    pub fn rule(mut self, lhs: &str, output: impl Into<String>) -> Self {
        let labels = lhs.split_whitespace().map(str::to_string).collect();
        self.rules.push((labels, output.into()));
        self
    }

    /// Add a lexical rule `word → category` for each word.
    pub fn words<I, W>(self, category: &str, words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        words
            .into_iter()
            .fold(self, |builder, word| builder.rule(word.as_ref(), category))
    }

    /// Add `X coord X → X` for each category, where `coord` is the
    /// coordinator category.
    pub fn with_coordination<I, C>(self, coordinator: &str, categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        categories.into_iter().fold(self, |builder, category| {
            let category = category.as_ref();
            builder.rule(
                &format!("{} {} {}", category, coordinator, category),
                category,
            )
        })
    }

    /// Number of rules added so far.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules have been added.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The default English phrase-structure grammar, with coordination over
    /// `COORDINATABLE`.
    pub fn english() -> Self {
        Self::new()
            .rule("NP VP", "S")
            .rule("V_I", "VP")
            .rule("V_T NP", "VP")
            .rule("Q N'", "NP")
            .rule("PN", "NP")
            .rule("Adj N'", "N'")
            .rule("N", "N'")
            .rule("S XP", "S")
            .rule("XP S", "S")
            .rule("subord S", "XP")
            .words(
                "PN",
                ["albert", "betty", "carol", "steve", "oscar", "mike", "jane", "john"],
            )
            .words("N", ["alligator", "dog", "people", "person", "boy", "cat"])
            .words("Adj", ["anxious", "big", "caring"])
            .words("V_I", ["ran", "run", "swam", "cried"])
            .words("V_T", ["admired", "kissed", "insulted", "scratched"])
            .words("subord", ["if"])
            .words("coord", ["and", "or"])
            .words(
                "Q",
                [
                    "every", "all", "some", "no", "most", "an", "a", "one", "two", "three",
                ],
            )
            .with_coordination("coord", COORDINATABLE)
    }

    /// Validate and freeze the table.
    pub fn build(self) -> Result<RuleTable, NlpError> {
        let mut rules = BTreeMap::new();
        let mut labels = BTreeSet::new();

        for (lhs, output) in self.rules {
            if lhs.is_empty() {
                return Err(NlpError::EmptyRule { output });
            }
            let key = lhs.join(" ");
            if lhs.len() > MAX_RULE_WIDTH {
                return Err(NlpError::RuleTooWide {
                    key,
                    width: lhs.len(),
                    max: MAX_RULE_WIDTH,
                });
            }
            if output.is_empty() || output.contains(char::is_whitespace) {
                return Err(NlpError::InvalidOutput { key, output });
            }
            if rules.contains_key(&key) {
                return Err(NlpError::DuplicateRuleKey { key });
            }
            labels.extend(lhs);
            labels.insert(output.clone());
            rules.insert(key, output);
        }

        check_unary_chains(&rules, labels.len())?;

        tracing::debug!(rules = rules.len(), labels = labels.len(), "built rule table");

        Ok(RuleTable {
            rules,
            label_count: labels.len(),
        })
    }
}

/// Follow the length-1 rules from every label that has one.
///
/// Width-1 collapses do not shrink a search state, so a cycle among them
/// would never terminate; such tables are rejected outright.
fn check_unary_chains(rules: &BTreeMap<String, String>, label_count: usize) -> Result<(), NlpError> {
    for start in rules.keys().filter(|key| !key.contains(' ')) {
        let mut current = start.as_str();
        let mut steps = 0;
        while let Some(next) = rules.get(current) {
            if steps >= label_count {
                return Err(NlpError::GrammarCycle {
                    label: start.clone(),
                });
            }
            current = next.as_str();
            steps += 1;
        }
    }
    Ok(())
}

/// Rule pairs in document order, keeping repeated keys so they can be
/// reported instead of silently overwritten.
struct RuleList(Vec<(String, String)>);

impl<'de> Deserialize<'de> for RuleList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RuleListVisitor;

        impl<'de> Visitor<'de> for RuleListVisitor {
            type Value = RuleList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "an object mapping rule left-hand sides to categories")
            }

            fn visit_map<A>(self, mut map: A) -> Result<RuleList, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut rules = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((lhs, output)) = map.next_entry::<String, String>()? {
                    rules.push((lhs, output));
                }
                Ok(RuleList(rules))
            }
        }

        deserializer.deserialize_map(RuleListVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tiny() -> RuleTable {
        GrammarBuilder::new()
            .rule("NP VP", "S")
            .rule("PN", "NP")
            .rule("V_I", "VP")
            .rule("jane", "PN")
            .rule("ran", "V_I")
            .build()
            .unwrap()
    }

    #[test]
    fn test_rewrite_lookup() {
        let table = tiny();
        assert_eq!(table.rewrite(&["NP", "VP"]), Some("S"));
        assert_eq!(table.get("jane"), Some("PN"));
        assert_eq!(table.rewrite(&["VP", "NP"]), None);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_lhs_whitespace_normalized() {
        let table = GrammarBuilder::new().rule("  NP   VP ", "S").build().unwrap();
        assert!(table.contains_key("NP VP"));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = GrammarBuilder::new()
            .rule("NP VP", "S")
            .rule("NP VP", "X")
            .build()
            .unwrap_err();
        assert!(matches!(err, NlpError::DuplicateRuleKey { key } if key == "NP VP"));
    }

    #[test]
    fn test_wide_rule_rejected() {
        let err = GrammarBuilder::new()
            .rule("A B C D", "E")
            .build()
            .unwrap_err();
        assert!(matches!(err, NlpError::RuleTooWide { width: 4, max: 3, .. }));
    }

    #[test]
    fn test_empty_rule_rejected() {
        let err = GrammarBuilder::new().rule("   ", "S").build().unwrap_err();
        assert!(matches!(err, NlpError::EmptyRule { output } if output == "S"));
    }

    #[test]
    fn test_label_count() {
        // NP VP S PN V_I jane ran
        assert_eq!(tiny().label_count(), 7);
    }

    #[test]
    fn test_percolate_chain() {
        let node = tiny().percolate(Node::leaf("jane")).unwrap();
        assert_eq!(node.compact(), "NP[ PN[ jane ] ]");
    }

    #[test]
    fn test_percolate_unknown_token_stays_leaf() {
        let node = tiny().percolate(Node::leaf("zorp")).unwrap();
        assert!(node.is_leaf());
        assert_eq!(node.label(), "zorp");
    }

    #[test]
    fn test_unary_cycle_rejected_at_build() {
        let err = GrammarBuilder::new()
            .rule("A", "B")
            .rule("B", "A")
            .rule("x", "A")
            .build()
            .unwrap_err();
        assert!(matches!(err, NlpError::GrammarCycle { label } if label == "A"));
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let err = GrammarBuilder::new().rule("A", "A").build().unwrap_err();
        assert!(matches!(err, NlpError::GrammarCycle { .. }));
    }

    #[test]
    fn test_cycle_reachable_only_after_collapse() {
        // No token percolates into the cycle; only the collapsed `x y` does.
        let err = GrammarBuilder::new()
            .rule("x y", "A")
            .rule("A", "B")
            .rule("B", "A")
            .build()
            .unwrap_err();
        assert!(matches!(err, NlpError::GrammarCycle { .. }));
    }

    #[test]
    fn test_long_acyclic_chain_accepted() {
        let table = GrammarBuilder::new()
            .rule("a", "B")
            .rule("B", "C")
            .rule("C", "D")
            .rule("D", "E")
            .build()
            .unwrap();
        assert_eq!(
            table.percolate(Node::leaf("a")).unwrap().compact(),
            "E[ D[ C[ B[ a ] ] ] ]"
        );
    }

    #[test]
    fn test_output_must_be_one_label() {
        let err = GrammarBuilder::new().rule("x", "NP VP").build().unwrap_err();
        assert!(matches!(
            err,
            NlpError::InvalidOutput { key, output } if key == "x" && output == "NP VP"
        ));

        let err = GrammarBuilder::new().rule("x", "").build().unwrap_err();
        assert!(matches!(err, NlpError::InvalidOutput { .. }));

        let err = RuleTable::from_json(r#"{"PN": " NP"}"#).unwrap_err();
        assert!(matches!(err, NlpError::InvalidOutput { .. }));
    }

    #[test]
    fn test_percolate_sentence_splits_on_single_space() {
        let nodes = tiny().percolate_sentence("jane ran").unwrap();
        let labels: Vec<&str> = nodes.iter().map(Node::label).collect();
        assert_eq!(labels, vec!["NP", "VP"]);

        let doubled = tiny().percolate_sentence("jane  ran").unwrap();
        assert_eq!(doubled.len(), 3);
        assert_eq!(doubled[1].label(), "");
    }

    #[test]
    fn test_coordination_rules() {
        let table = GrammarBuilder::new()
            .with_coordination("coord", ["NP", "VP"])
            .build()
            .unwrap();
        assert_eq!(table.get("NP coord NP"), Some("NP"));
        assert_eq!(table.get("VP coord VP"), Some("VP"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_english_grammar() {
        let table = RuleTable::english().unwrap();
        assert_eq!(table.get("Q N'"), Some("NP"));
        assert_eq!(table.get("N' coord N'"), Some("N'"));
        assert_eq!(table.get("admired"), Some("V_T"));
        assert_eq!(table.get("three"), Some("Q"));
    }

    #[test]
    fn test_from_json() {
        let table = RuleTable::from_json(r#"{"NP VP": "S", "PN": "NP", "jane": "PN"}"#).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("NP VP"), Some("S"));
    }

    #[test]
    fn test_from_json_duplicate_key() {
        let err = RuleTable::from_json(r#"{"PN": "NP", "PN": "N"}"#).unwrap_err();
        assert!(matches!(err, NlpError::DuplicateRuleKey { .. }));
    }

    #[test]
    fn test_from_json_malformed() {
        let err = RuleTable::from_json(r#"["NP VP", "S"]"#).unwrap_err();
        assert!(matches!(err, NlpError::Config { .. }));
    }

    #[test]
    fn test_to_json_roundtrip() {
        let table = tiny();
        let json = table.to_json().unwrap();
        assert_eq!(RuleTable::from_json(&json).unwrap(), table);
    }
}
