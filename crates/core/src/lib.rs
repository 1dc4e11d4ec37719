//! # Core - Parse Trees and Bounded Search
//!
//! Foundations shared by the parsing and semantics crates:
//!
//! - **Trees**: immutable, structurally shared, fingerprinted parse nodes
//! - **Budgets**: step/time limits for exhaustive searches
//! - **Errors**: failures common to both
//!
//! ## Design Philosophy
//!
//! Trees are values. Equality is structural, hashing is O(1) via bottom-up
//! fingerprints, and cloning a tree never copies it. Search code can freely
//! put trees (and sequences of trees) in hash sets.

pub mod budget;
pub mod error;
pub mod tree;

pub use budget::{BudgetMeter, SearchBudget};
pub use error::CoreError;
pub use tree::Node;
