//! Tests for the error module.
//!
//! This module contains tests for error handling and error types.

use crate::error::config::ConfigError;
use crate::error::ingest::IngestError;
use crate::error::store::StoreError;
use crate::error::{
    report_error, set_error_reporter, CatalogError, ErrorContext, ErrorReporter,
    TracingErrorReporter,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Test that error context can be created and displayed properly.
#[test]
fn test_error_context_display() {
    let error = CatalogError::Custom("test error".to_string());
    let context = ErrorContext::new(error, "test_component").with_details("additional details");

    let display_string = format!("{context}");
    assert!(display_string.contains("test error"));
    assert!(display_string.contains("test_component"));
    assert!(display_string.contains("additional details"));
}

/// Test that domain errors convert into the catalog error with their message.
#[test]
fn test_nested_errors() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let catalog_error = CatalogError::from(io_error);
    assert!(format!("{catalog_error}").contains("file not found"));

    let store_error: CatalogError = StoreError::DuplicateKey { id: "xy1-1".to_string() }.into();
    assert_eq!(
        store_error.to_string(),
        "Store error: Card with id 'xy1-1' already exists"
    );

    let ingest_error: CatalogError = IngestError::RatingOutOfRange {
        line: 4,
        rating: 12.5,
        min: 0.0,
        max: 10.0,
    }
    .into();
    assert!(ingest_error.to_string().contains("Rating 12.5 at line 4"));

    let config_error: CatalogError = ConfigError::ValidationError("bad".to_string()).into();
    assert!(matches!(config_error, CatalogError::Config(_)));
}

/// Mock error reporter for testing.
#[derive(Debug, Default)]
struct MockErrorReporter {
    reported_count: AtomicUsize,
}

impl MockErrorReporter {
    fn reported_count(&self) -> usize {
        self.reported_count.load(Ordering::SeqCst)
    }
}

impl ErrorReporter for MockErrorReporter {
    fn report(&self, _context: ErrorContext) {
        self.reported_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Test that the global error reporter receives reports and cannot be replaced.
///
/// Other tests may report concurrently, so only a lower bound is checked.
#[test]
fn test_global_error_reporter() {
    let reporter = Arc::new(MockErrorReporter::default());
    assert!(set_error_reporter(reporter.clone()));
    assert!(!set_error_reporter(Arc::new(TracingErrorReporter)));

    let error = CatalogError::Custom("test error".to_string());
    report_error(ErrorContext::new(error, "test_component"));

    assert!(reporter.reported_count() >= 1);
}

/// Test that the default tracing error reporter can be created.
#[test]
fn test_tracing_error_reporter() {
    let reporter = TracingErrorReporter;
    let error = CatalogError::Custom("test error".to_string());
    let context = ErrorContext::new(error, "test_component");

    // Just make sure this doesn't panic
    reporter.report(context);
}
