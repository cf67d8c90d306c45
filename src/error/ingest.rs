//! Ingestion error module.
//!
//! Errors raised by the card sources and the CSV exporter. Row-level errors
//! carry the 1-based line number of the offending record.

use thiserror::Error;

/// Errors that can occur while importing or exporting cards.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The delimited reader or writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The JSON payload could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing the underlying stream failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be turned into a card.
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow {
        /// Line number of the row
        line: u64,
        /// What was wrong with it
        reason: String,
    },

    /// The rating column is outside the accepted bounds.
    #[error("Rating {rating} at line {line} is outside [{min}, {max}]")]
    RatingOutOfRange {
        /// Line number of the row
        line: u64,
        /// The rejected rating
        rating: f64,
        /// Lower accepted bound
        min: f64,
        /// Upper accepted bound
        max: f64,
    },
}

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

impl IngestError {
    /// Whether the error concerns a single record, so ingestion can skip it
    /// and continue with the next one.
    pub fn is_row_error(&self) -> bool {
        match self {
            Self::MalformedRow { .. } | Self::RatingOutOfRange { .. } => true,
            Self::Csv(err) => !err.is_io_error(),
            Self::Json(_) | Self::Io(_) => false,
        }
    }
}
