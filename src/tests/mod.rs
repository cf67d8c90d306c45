//! Crate-level test modules for the card catalog.
//!
//! Unit tests live beside each module; the suites here cover behaviour that
//! spans modules:
//! - configuration layering and validation
//! - error types and the global reporter
//! - property-based checks of the card store invariants
//! - ingestion from files and the export round trip

pub mod config_tests;
pub mod error_tests;
pub mod test_utils;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{card_strategy, create_test_dir, operations_strategy, Operation};
