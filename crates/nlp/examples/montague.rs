//! Exhaustive Parsing and Truth in a Model
//!
//! Run with: cargo run -p montague-nlp --example montague
//!
//! This example demonstrates:
//! - Percolating tokens up their unary rule chains
//! - Enumerating every derivation of an ambiguous sentence
//! - Evaluating a derivation against a small model
//! - Loading a grammar and a model from JSON
//!
//! Key insight: the tree decides the order of application, the types decide
//! which child is the function.

use std::sync::Arc;

use montague_nlp::{
    evaluate, Enumerator, Evaluator, Model, RuleTable, SearchBudget, Value,
};

fn main() {
    println!("=== Exhaustive Parsing and Montague Semantics ===\n");

    let grammar = Arc::new(RuleTable::english().unwrap());
    let enumerator = Enumerator::new(Arc::clone(&grammar))
        .with_budget(SearchBudget::unlimited().with_max_steps(1_000_000));

    // -------------------------------------------------------------------------
    // 1. Percolation
    // -------------------------------------------------------------------------
    println!("1. Percolation");
    println!("--------------\n");

    for token in grammar.percolate_sentence("jane admired an anxious alligator").unwrap() {
        println!("  {}", token.compact());
    }
    println!();

    // -------------------------------------------------------------------------
    // 2. Every derivation
    // -------------------------------------------------------------------------
    println!("2. Every Derivation");
    println!("-------------------\n");

    let sentence = "albert and betty or john and oscar admired an alligator";
    let forest = enumerator.enumerate(sentence).unwrap();

    println!("  \"{}\"", sentence);
    println!("  {} derivations\n", forest.len());
    for (i, root) in forest.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, root.compact());
    }

    let stats = forest.stats();
    println!(
        "\n  steps: {}, states: {}, dead ends: {}, duplicates: {}, max depth: {}\n",
        stats.steps, stats.states_pushed, stats.dead_ends, stats.duplicates, stats.max_stack_depth
    );

    // -------------------------------------------------------------------------
    // 3. Truth in a model
    // -------------------------------------------------------------------------
    println!("3. Truth in a Model");
    println!("-------------------\n");

    let model = Model::toy().unwrap();
    for sentence in [
        "albert admired betty",
        "betty admired albert",
        "every person ran",
        "two people ran",
        "some anxious person admired mike",
        "no person cried",
    ] {
        match evaluate(sentence, &enumerator, &model) {
            Ok(Value::Boolean(truth)) => println!("  {:<36} {}", sentence, truth),
            Ok(other) => println!("  {:<36} {}", sentence, other),
            Err(err) => println!("  {:<36} error: {}", sentence, err),
        }
    }
    println!();

    println!("Coordinated subjects have no binary meaning:");
    let forest = enumerator.enumerate("albert and betty ran").unwrap();
    for result in Evaluator::new(&model).evaluate_forest(&forest) {
        match result {
            Ok(value) => println!("  {}", value),
            Err(err) => println!("  {}", err),
        }
    }
    println!();

    // -------------------------------------------------------------------------
    // 4. From JSON
    // -------------------------------------------------------------------------
    println!("4. Grammar and Model from JSON");
    println!("------------------------------\n");

    let grammar = RuleTable::from_json(
        r#"{
            "NP VP": "S", "V_T NP": "VP", "PN": "NP",
            "jane": "PN", "mike": "PN", "admired": "V_T"
        }"#,
    )
    .unwrap();
    let model = Model::from_json(
        r#"{
            "domain": ["j", "m"],
            "individuals": { "jane": "j", "mike": "m" },
            "relations": { "admired": [["j", "m"]] }
        }"#,
    )
    .unwrap();
    let enumerator = Enumerator::new(Arc::new(grammar));

    for sentence in ["jane admired mike", "mike admired jane"] {
        let value = evaluate(sentence, &enumerator, &model).unwrap();
        println!("  {:<20} {}", sentence, value);
    }

    println!("\n=== Done ===");
}
