//! Test utilities and fixtures for the card catalog.
//!
//! Proptest strategies for cards and store operation sequences, plus helpers
//! for temporary card files.

use std::path::PathBuf;

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use tempfile::TempDir;

use crate::data_structures::Card;

/// Maximum number of operations in a generated sequence.
const MAX_OPERATIONS: usize = 200;

/// Create a temporary directory for test files.
///
/// # Returns
///
/// A result containing the temporary directory or an error if creation fails.
pub fn create_test_dir() -> std::io::Result<TempDir> {
    tempfile::tempdir()
}

/// Writes `contents` to `name` inside `dir` and returns the full path.
pub fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("failed to write test file");
    path
}

/// Generate short card ids drawn from a small alphabet, so sequences revisit ids.
pub fn id_strategy() -> BoxedStrategy<String> {
    "[a-f][0-9]{0,2}".boxed()
}

/// Generate cards with ratings in `[0, 10]` rounded to one decimal.
///
/// Names may carry surrounding spaces and tag lists may be empty, so file
/// round trips see both.
pub fn card_strategy() -> BoxedStrategy<Card> {
    (
        id_strategy(),
        " ?[A-Z][a-z]{2,10} ?",
        0..300i32,
        0..200i32,
        0..=100u32,
        proptest::collection::vec("[A-Z][a-z]{2,8}", 0..3),
    )
        .prop_map(|(id, name, power, resistance, rating, tags)| {
            Card::new(id, name, power, resistance, f64::from(rating) / 10.0).with_tags(tags)
        })
        .boxed()
}

/// A mutation applied to a card store.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Add a card (possibly a duplicate id)
    Add(Card),
    /// Remove an id (possibly absent)
    Remove(String),
}

/// Generate sequences of adds and removes, weighted towards adds.
pub fn operations_strategy() -> BoxedStrategy<Vec<Operation>> {
    let operation = prop_oneof![
        3 => card_strategy().prop_map(Operation::Add),
        1 => id_strategy().prop_map(Operation::Remove),
    ];
    proptest::collection::vec(operation, 0..MAX_OPERATIONS).boxed()
}
