//! Set-Theoretic Semantic Values
//!
//! Meanings are extensional and curried. Every word denotes a `Value`, and a
//! binary node combines its children by applying one value to the other:
//!
//! ```text
//! ⟦jane⟧          = j                                   Individual
//! ⟦ran⟧           = {a}                                 Predicate   e → t
//! ⟦admired⟧       = {(j, m)}                            Relation    e → e → t
//! ⟦admired mike⟧  = {x | (x, m) ∈ ⟦admired⟧}            Predicate
//! ⟦big⟧           = {b}                                 Modifier    (e→t) → (e→t)
//! ⟦every⟧         = every                               Quantifier  (e→t) → (e→t) → t
//! ⟦every person⟧  = every{a, b, c}                      QuantifiedPhrase
//! ⟦every person ran⟧ = {a, b, c} ⊆ {a}                  Boolean
//! ```
//!
//! A relation takes its object first, so `⟦admired⟧(m)(j)` is `(j, m) ∈ R`.
//!
//! # Example
//!
//! ```rust
//! use montague_nlp::semantics::{Entity, Extension, Quantifier, Value};
//!
//! let person = Value::Predicate(Extension::from_iter(["a", "b", "c"]));
//! let ran = Value::Predicate(Extension::from_iter(["a"]));
//!
//! let some_person = Value::Quantifier(Quantifier::Some).apply(&person).unwrap();
//! assert_eq!(some_person.apply(&ran).unwrap(), Value::Boolean(true));
//!
//! let three = Value::Quantifier(Quantifier::AtLeast(3)).apply(&person).unwrap();
//! assert_eq!(three.apply(&ran).unwrap(), Value::Boolean(false));
//!
//! let a = Value::Individual(Entity::new("a"));
//! assert_eq!(ran.apply(&a).unwrap(), Value::Boolean(true));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// An individual of the domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(String);

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Entity(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Entity {
    fn from(name: &str) -> Self {
        Entity::new(name)
    }
}

impl From<String> for Entity {
    fn from(name: String) -> Self {
        Entity(name)
    }
}

/// The extension of a one-place predicate: a finite set of entities.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extension(Arc<BTreeSet<Entity>>);

impl Extension {
    pub fn new(members: BTreeSet<Entity>) -> Self {
        Extension(Arc::new(members))
    }

    pub fn contains(&self, entity: &Entity) -> bool {
        self.0.contains(entity)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.0.iter()
    }

    /// `self ∩ other`
    pub fn intersection(&self, other: &Extension) -> Extension {
        Extension::new(self.0.intersection(&other.0).cloned().collect())
    }

    /// `|self ∩ other|`
    pub fn intersection_len(&self, other: &Extension) -> usize {
        self.0.intersection(&other.0).count()
    }

    /// `|self ∖ other|`
    pub fn difference_len(&self, other: &Extension) -> usize {
        self.0.difference(&other.0).count()
    }

    /// `self ⊆ other`
    pub fn is_subset(&self, other: &Extension) -> bool {
        self.0.is_subset(&other.0)
    }
}

impl<E: Into<Entity>> FromIterator<E> for Extension {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Extension::new(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Entity::name).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// The extension of a two-place relation: a finite set of ordered pairs
/// `(subject, object)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Relation(Arc<BTreeSet<(Entity, Entity)>>);

impl Relation {
    pub fn new(pairs: BTreeSet<(Entity, Entity)>) -> Self {
        Relation(Arc::new(pairs))
    }

    pub fn contains(&self, subject: &Entity, object: &Entity) -> bool {
        self.0.contains(&(subject.clone(), object.clone()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Entity, Entity)> {
        self.0.iter()
    }

    /// Saturate the object position: `{x | (x, object) ∈ R}`.
    pub fn with_object(&self, object: &Entity) -> Extension {
        Extension::new(
            self.0
                .iter()
                .filter(|(_, o)| o == object)
                .map(|(s, _)| s.clone())
                .collect(),
        )
    }
}

impl<S: Into<Entity>, O: Into<Entity>> FromIterator<(S, O)> for Relation {
    fn from_iter<I: IntoIterator<Item = (S, O)>>(iter: I) -> Self {
        Relation::new(
            iter.into_iter()
                .map(|(s, o)| (s.into(), o.into()))
                .collect(),
        )
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .0
            .iter()
            .map(|(s, o)| format!("({}, {})", s, o))
            .collect();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}

/// Generalized quantifiers over finite extensions.
///
/// `holds(A, B)` relates the restrictor `A` (the noun) to the scope `B`
/// (the verb phrase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantifier {
    /// `A ⊆ B`
    Every,
    /// `|A ∩ B| ≥ 1`
    Some,
    /// `|A ∩ B| = 0`
    No,
    /// `|A ∩ B| ≥ n`
    AtLeast(usize),
    /// `|A ∩ B| = n`
    Exactly(usize),
    /// `|A ∩ B| > |A ∖ B|`
    Most,
}

impl Quantifier {
    /// Evaluate the quantifier on a restrictor and a scope.
    pub fn holds(&self, restrictor: &Extension, scope: &Extension) -> bool {
        match self {
            Quantifier::Every => restrictor.is_subset(scope),
            Quantifier::Some => restrictor.intersection_len(scope) >= 1,
            Quantifier::No => restrictor.intersection_len(scope) == 0,
            Quantifier::AtLeast(n) => restrictor.intersection_len(scope) >= *n,
            Quantifier::Exactly(n) => restrictor.intersection_len(scope) == *n,
            Quantifier::Most => {
                restrictor.intersection_len(scope) > restrictor.difference_len(scope)
            }
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantifier::Every => write!(f, "every"),
            Quantifier::Some => write!(f, "some"),
            Quantifier::No => write!(f, "no"),
            Quantifier::AtLeast(n) => write!(f, "at least {}", n),
            Quantifier::Exactly(n) => write!(f, "exactly {}", n),
            Quantifier::Most => write!(f, "most"),
        }
    }
}

/// Why one value could not be applied to another.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// The would-be functor takes no arguments.
    #[error("{functor} is not a function")]
    NotAFunction { functor: String },

    /// The functor takes a different kind of argument.
    #[error("{functor} expects {expected}, got {got}")]
    TypeMismatch {
        functor: String,
        expected: &'static str,
        got: String,
    },
}

/// A semantic value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// An entity of the domain (type e).
    Individual(Entity),
    /// A truth value (type t).
    Boolean(bool),
    /// A one-place predicate (e → t).
    Predicate(Extension),
    /// A curried two-place relation (e → e → t), object first.
    Relation(Relation),
    /// An intersective modifier ((e → t) → (e → t)).
    Modifier(Extension),
    /// A determiner ((e → t) → (e → t) → t).
    Quantifier(Quantifier),
    /// A determiner applied to its restrictor ((e → t) → t).
    QuantifiedPhrase {
        quantifier: Quantifier,
        restrictor: Extension,
    },
}

impl Value {
    /// Name of this value's semantic type, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Individual(_) => "individual",
            Value::Boolean(_) => "boolean",
            Value::Predicate(_) => "predicate",
            Value::Relation(_) => "relation",
            Value::Modifier(_) => "modifier",
            Value::Quantifier(_) => "quantifier",
            Value::QuantifiedPhrase { .. } => "quantified phrase",
        }
    }

    /// True for values that take an argument.
    pub fn is_function(&self) -> bool {
        !matches!(self, Value::Individual(_) | Value::Boolean(_))
    }

    /// The truth value, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The entity, if this is one.
    pub fn as_individual(&self) -> Option<&Entity> {
        match self {
            Value::Individual(e) => Some(e),
            _ => None,
        }
    }

    /// The extension of a predicate.
    pub fn as_predicate(&self) -> Option<&Extension> {
        match self {
            Value::Predicate(p) => Some(p),
            _ => None,
        }
    }

    /// Apply this value, as a function, to `argument`.
    pub fn apply(&self, argument: &Value) -> Result<Value, ApplyError> {
        match (self, argument) {
            (Value::Predicate(p), Value::Individual(x)) => Ok(Value::Boolean(p.contains(x))),
            (Value::Relation(r), Value::Individual(y)) => Ok(Value::Predicate(r.with_object(y))),
            (Value::Modifier(m), Value::Predicate(p)) => Ok(Value::Predicate(m.intersection(p))),
            (Value::Quantifier(q), Value::Predicate(a)) => Ok(Value::QuantifiedPhrase {
                quantifier: *q,
                restrictor: a.clone(),
            }),
            (
                Value::QuantifiedPhrase {
                    quantifier,
                    restrictor,
                },
                Value::Predicate(b),
            ) => Ok(Value::Boolean(quantifier.holds(restrictor, b))),
            (Value::Individual(_), _) | (Value::Boolean(_), _) => Err(ApplyError::NotAFunction {
                functor: self.to_string(),
            }),
            (functor, got) => Err(ApplyError::TypeMismatch {
                functor: functor.to_string(),
                expected: functor.argument_kind(),
                got: got.kind().to_string(),
            }),
        }
    }

    fn argument_kind(&self) -> &'static str {
        match self {
            Value::Predicate(_) | Value::Relation(_) => "individual",
            Value::Modifier(_) | Value::Quantifier(_) | Value::QuantifiedPhrase { .. } => {
                "predicate"
            }
            Value::Individual(_) | Value::Boolean(_) => "nothing",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Individual(e) => write!(f, "{}", e),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Predicate(p) => write!(f, "λx.x ∈ {}", p),
            Value::Relation(r) => write!(f, "λy.λx.(x, y) ∈ {}", r),
            Value::Modifier(m) => write!(f, "λP.P ∩ {}", m),
            Value::Quantifier(q) => write!(f, "{}", q),
            Value::QuantifiedPhrase {
                quantifier,
                restrictor,
            } => write!(f, "{}({})", quantifier, restrictor),
        }
    }
}
