//! Models: Finite Domains and Interpretation Functions
//!
//! A model fixes a finite set of entities and assigns every word a `Value`
//! over that set. The evaluator only needs the `Interpretation` trait, so any
//! label → value lookup works; `Model` is the standard one, checking that
//! every extension stays inside its domain.
//!
//! Models can be built in code or read from JSON:
//!
//! ```json
//! {
//!   "domain": ["j", "m"],
//!   "individuals": { "jane": "j", "mike": "m" },
//!   "predicates": { "ran": ["j"] },
//!   "relations": { "admired": [["j", "m"]] },
//!   "quantifiers": { "three": { "at_least": 3 } }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::semantics::{Entity, Extension, Quantifier, Relation, Value};
use crate::NlpError;

/// Looks up the meaning of a leaf label.
pub trait Interpretation {
    /// The value of `label`, or `None` if it has no interpretation.
    fn lookup(&self, label: &str) -> Option<Value>;
}

impl<T: Interpretation + ?Sized> Interpretation for &T {
    fn lookup(&self, label: &str) -> Option<Value> {
        (**self).lookup(label)
    }
}

impl Interpretation for HashMap<String, Value> {
    fn lookup(&self, label: &str) -> Option<Value> {
        self.get(label).cloned()
    }
}

impl Interpretation for BTreeMap<String, Value> {
    fn lookup(&self, label: &str) -> Option<Value> {
        self.get(label).cloned()
    }
}

/// Serializable description of a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    pub domain: Vec<String>,
    pub individuals: BTreeMap<String, String>,
    pub predicates: BTreeMap<String, Vec<String>>,
    pub relations: BTreeMap<String, Vec<(String, String)>>,
    pub modifiers: BTreeMap<String, Vec<String>>,
    pub quantifiers: BTreeMap<String, Quantifier>,
    /// Also install the standard English determiners.
    pub default_quantifiers: bool,
}

/// A finite model: a domain of entities and a lexicon over it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    domain: BTreeSet<Entity>,
    lexicon: BTreeMap<String, Value>,
}

impl Model {
    /// Create a model over the given domain with an empty lexicon.
    pub fn new<I, E>(domain: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Entity>,
    {
        Self {
            domain: domain.into_iter().map(Into::into).collect(),
            lexicon: BTreeMap::new(),
        }
    }

    /// The model used by the demo: six people and who admired whom.
    pub fn toy() -> Result<Self, NlpError> {
        let mut model = Model::new(["a", "b", "c", "s", "j", "m"]);
        for (word, entity) in [
            ("albert", "a"),
            ("betty", "b"),
            ("carol", "c"),
            ("steve", "s"),
            ("jane", "j"),
            ("mike", "m"),
        ] {
            model.add_individual(word, entity)?;
        }
        model.add_relation("admired", [("j", "m"), ("s", "m"), ("a", "b"), ("b", "c")])?;
        model.add_relation("kissed", [("b", "a")])?;
        model.add_predicate("person", ["a", "b", "c", "s", "j", "m"])?;
        model.add_predicate("people", ["a", "b", "c", "s", "j", "m"])?;
        model.add_predicate("ran", ["a", "j"])?;
        model.add_predicate("swam", ["b"])?;
        model.add_predicate("cried", Vec::<&str>::new())?;
        model.add_modifier("anxious", ["c", "s"])?;
        model.add_default_quantifiers()?;
        Ok(model)
    }

    /// Build a model from its serializable description.
    pub fn from_config(config: ModelConfig) -> Result<Self, NlpError> {
        let mut model = Model::new(config.domain);
        for (word, entity) in config.individuals {
            model.add_individual(&word, entity)?;
        }
        for (word, members) in config.predicates {
            model.add_predicate(&word, members)?;
        }
        for (word, pairs) in config.relations {
            model.add_relation(&word, pairs)?;
        }
        for (word, members) in config.modifiers {
            model.add_modifier(&word, members)?;
        }
        for (word, quantifier) in config.quantifiers {
            model.add_quantifier(&word, quantifier)?;
        }
        if config.default_quantifiers {
            model.add_default_quantifiers()?;
        }
        tracing::debug!(
            entities = model.domain.len(),
            words = model.lexicon.len(),
            "built model"
        );
        Ok(model)
    }

    /// Read a model from JSON (see `ModelConfig`).
    pub fn from_json(json: &str) -> Result<Self, NlpError> {
        let config: ModelConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }

    /// The entities of the model.
    pub fn domain(&self) -> &BTreeSet<Entity> {
        &self.domain
    }

    /// The domain as a predicate extension.
    pub fn universe(&self) -> Extension {
        Extension::new(self.domain.clone())
    }

    /// Number of interpreted words.
    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    /// True when no word is interpreted.
    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    /// Interpret `word` as an entity of the domain.
    pub fn add_individual(
        &mut self,
        word: &str,
        entity: impl Into<Entity>,
    ) -> Result<(), NlpError> {
        let entity = self.member(word, entity.into())?;
        self.insert(word, Value::Individual(entity))
    }

    /// Interpret `word` as a one-place predicate.
    pub fn add_predicate<I, E>(&mut self, word: &str, members: I) -> Result<(), NlpError>
    where
        I: IntoIterator<Item = E>,
        E: Into<Entity>,
    {
        let extension = self.extension(word, members)?;
        self.insert(word, Value::Predicate(extension))
    }

    /// Interpret `word` as a two-place relation over `(subject, object)` pairs.
    pub fn add_relation<I, S, O>(&mut self, word: &str, pairs: I) -> Result<(), NlpError>
    where
        I: IntoIterator<Item = (S, O)>,
        S: Into<Entity>,
        O: Into<Entity>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(s, o)| Ok((self.member(word, s.into())?, self.member(word, o.into())?)))
            .collect::<Result<BTreeSet<_>, NlpError>>()?;
        self.insert(word, Value::Relation(Relation::new(pairs)))
    }

    /// Interpret `word` as an intersective modifier.
    pub fn add_modifier<I, E>(&mut self, word: &str, members: I) -> Result<(), NlpError>
    where
        I: IntoIterator<Item = E>,
        E: Into<Entity>,
    {
        let extension = self.extension(word, members)?;
        self.insert(word, Value::Modifier(extension))
    }

    /// Interpret `word` as a determiner.
    pub fn add_quantifier(&mut self, word: &str, quantifier: Quantifier) -> Result<(), NlpError> {
        self.insert(word, Value::Quantifier(quantifier))
    }

    /// Install the standard English determiners that are not yet defined.
    pub fn add_default_quantifiers(&mut self) -> Result<(), NlpError> {
        for (word, quantifier) in default_quantifiers() {
            if !self.lexicon.contains_key(word) {
                self.add_quantifier(word, quantifier)?;
            }
        }
        Ok(())
    }

    fn member(&self, word: &str, entity: Entity) -> Result<Entity, NlpError> {
        if self.domain.contains(&entity) {
            Ok(entity)
        } else {
            Err(NlpError::InvalidModel {
                reason: format!("'{}' refers to '{}', which is not in the domain", word, entity),
            })
        }
    }

    fn extension<I, E>(&self, word: &str, members: I) -> Result<Extension, NlpError>
    where
        I: IntoIterator<Item = E>,
        E: Into<Entity>,
    {
        let members = members
            .into_iter()
            .map(|e| self.member(word, e.into()))
            .collect::<Result<BTreeSet<_>, NlpError>>()?;
        Ok(Extension::new(members))
    }

    fn insert(&mut self, word: &str, value: Value) -> Result<(), NlpError> {
        if self.lexicon.contains_key(word) {
            return Err(NlpError::InvalidModel {
                reason: format!("'{}' is interpreted twice", word),
            });
        }
        self.lexicon.insert(word.to_string(), value);
        Ok(())
    }
}

impl Interpretation for Model {
    fn lookup(&self, label: &str) -> Option<Value> {
        self.lexicon.get(label).cloned()
    }
}

/// The determiners of the default English grammar.
pub fn default_quantifiers() -> [(&'static str, Quantifier); 10] {
    [
        ("every", Quantifier::Every),
        ("all", Quantifier::Every),
        ("some", Quantifier::Some),
        ("a", Quantifier::Some),
        ("an", Quantifier::Some),
        ("one", Quantifier::AtLeast(1)),
        ("no", Quantifier::No),
        ("most", Quantifier::Most),
        ("two", Quantifier::AtLeast(2)),
        ("three", Quantifier::AtLeast(3)),
    ]
}
