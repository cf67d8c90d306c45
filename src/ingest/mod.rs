//! Card ingestion and export.
//!
//! A [`CardSource`] yields cards one record at a time; [`ingest`] drains a
//! source into a [`CardStore`], skipping duplicates and malformed records,
//! and [`export_csv`] writes the catalog back out in id order.

mod delimited;
mod json;

use serde::Serialize;
use tracing::{info, warn};

use crate::data_structures::Card;
use crate::error::ingest::IngestResult;
use crate::error::{report_error, ErrorContext};
use crate::store::CardStore;

pub use delimited::{export_csv, manual_card, CsvCardSource, EXPORT_HEADER};
pub use json::JsonCardSource;

/// A stream of cards read from some external format.
#[cfg_attr(test, mockall::automock)]
pub trait CardSource {
    /// Reads the next card.
    ///
    /// Returns `None` once the source is exhausted. A record-level error
    /// (see [`IngestError::is_row_error`](crate::error::ingest::IngestError::is_row_error))
    /// does not end the stream.
    fn next_card(&mut self) -> Option<IngestResult<Card>>;
}

/// Outcome of one [`ingest`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Cards added to the store
    pub added: usize,

    /// Records skipped because their id was already stored
    pub duplicates: usize,

    /// Records skipped because they could not be read as cards
    pub rejected: usize,
}

impl IngestReport {
    /// Adds another run's counts to this one.
    pub fn merge(&mut self, other: IngestReport) {
        self.added += other.added;
        self.duplicates += other.duplicates;
        self.rejected += other.rejected;
    }
}

/// Drains `source` into `store`.
///
/// Duplicates and malformed records are counted, reported through the error
/// reporter and skipped. Reading stops early once `limit` cards have been
/// added.
///
/// # Errors
///
/// Stops at the first error that is not tied to a single record, such as a
/// failing reader.
pub fn ingest<S>(
    store: &mut CardStore,
    source: &mut S,
    limit: Option<usize>,
) -> IngestResult<IngestReport>
where
    S: CardSource + ?Sized,
{
    let mut report = IngestReport::default();

    while limit.map_or(true, |limit| report.added < limit) {
        let Some(next) = source.next_card() else {
            break;
        };

        match next {
            Ok(card) => match store.add(card) {
                Ok(()) => report.added += 1,
                Err(err) => {
                    report.duplicates += 1;
                    report_error(ErrorContext::new(err, "ingest"));
                }
            },
            Err(err) if err.is_row_error() => {
                warn!(error = %err, "skipping record");
                report.rejected += 1;
                report_error(ErrorContext::new(err, "ingest"));
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        added = report.added,
        duplicates = report.duplicates,
        rejected = report.rejected,
        "ingestion finished"
    );
    Ok(report)
}
