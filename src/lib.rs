//! Card Catalog Library
//!
//! An in-memory catalog of trading cards. Every card is indexed twice: by a
//! chained hash table for lookups by id, and by an AVL tree for ordered
//! listing, rating-range queries and top-K rankings. The library also holds
//! the CSV/JSON importers, the CSV exporter and the layered configuration
//! used by the `card_catalog` binary.
//!
//! # Architecture
//!
//! - [`data_structures`]: the card record and the index structures
//! - [`store`]: the [`store::CardStore`] façade that keeps both indexes in sync
//! - [`ingest`]: card sources, the ingestion driver and export
//! - [`config`]: defaults, file and environment layering
//! - [`error`]: error types and the process-wide error reporter

pub mod config;
pub mod data_structures;
pub mod error;
pub mod ingest;
pub mod store;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for the card catalog.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization function.
///
/// Installs the tracing-backed error reporter. Calling it again is harmless;
/// the first installed reporter stays in place.
pub fn init() {
    error::set_error_reporter(std::sync::Arc::new(error::TracingErrorReporter));
}
