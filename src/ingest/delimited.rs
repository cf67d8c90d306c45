//! Delimited (CSV) card files.
//!
//! Rows are `id,name,power,resistance,rating[,tags]`, tags separated by the
//! configured tag delimiter. The exporter writes the same layout with a
//! header, so an exported file can be fed straight back in.
//!
//! Only the numeric fields are trimmed; ids, names and tags are kept as
//! written. A row without a tags column gets the configured default tags,
//! while a present but empty tags column means the card has no tags.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use super::CardSource;
use crate::config::IngestConfig;
use crate::data_structures::Card;
use crate::error::ingest::{IngestError, IngestResult};
use crate::store::CardStore;

/// Header row written by [`export_csv`].
pub const EXPORT_HEADER: [&str; 6] = ["id", "name", "power", "resistance", "rating", "tags"];

const REQUIRED_FIELDS: usize = 5;

/// Reads cards from delimited rows.
pub struct CsvCardSource<R: Read> {
    reader: csv::Reader<R>,
    record: StringRecord,
    config: IngestConfig,
}

impl CsvCardSource<File> {
    /// Opens a card file.
    pub fn from_path<P: AsRef<Path>>(path: P, config: &IngestConfig) -> IngestResult<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file, config))
    }
}

impl<R: Read> CsvCardSource<R> {
    /// Reads cards from any byte stream.
    pub fn from_reader(reader: R, config: &IngestConfig) -> Self {
        let reader = ReaderBuilder::new()
            .delimiter(config.delimiter_byte())
            .has_headers(config.has_headers)
            .flexible(true)
            .trim(csv::Trim::None)
            .from_reader(reader);
        Self {
            reader,
            record: StringRecord::new(),
            config: config.clone(),
        }
    }

    fn parse_record(&self) -> IngestResult<Card> {
        let record = &self.record;
        let line = record.position().map_or(0, |pos| pos.line());

        if record.len() < REQUIRED_FIELDS {
            return Err(IngestError::MalformedRow {
                line,
                reason: format!(
                    "expected at least {REQUIRED_FIELDS} fields, found {}",
                    record.len()
                ),
            });
        }

        let id = &record[0];
        if id.is_empty() {
            return Err(IngestError::MalformedRow {
                line,
                reason: "empty id".to_string(),
            });
        }

        let power: i32 = parse_field(record, 2, "power", line)?;
        let resistance: i32 = parse_field(record, 3, "resistance", line)?;
        let rating: f64 = parse_field(record, 4, "rating", line)?;
        check_rating(rating, line, &self.config)?;

        let tags = parse_tags(record.get(5), &self.config);
        Ok(Card::new(id, &record[1], power, resistance, rating).with_tags(tags))
    }
}

/// Builds a card typed in by hand, checked the same way as a CSV row.
///
/// `tags` is a tag-delimited list; `None` gives the configured default tags.
/// Errors carry line 0.
pub fn manual_card(
    id: impl Into<String>,
    name: impl Into<String>,
    power: i32,
    resistance: i32,
    rating: f64,
    tags: Option<&str>,
    config: &IngestConfig,
) -> IngestResult<Card> {
    let id = id.into();
    if id.is_empty() {
        return Err(IngestError::MalformedRow {
            line: 0,
            reason: "empty id".to_string(),
        });
    }
    check_rating(rating, 0, config)?;
    Ok(Card::new(id, name, power, resistance, rating).with_tags(parse_tags(tags, config)))
}

fn parse_tags(field: Option<&str>, config: &IngestConfig) -> Vec<String> {
    match field {
        None => config.default_tags.clone(),
        Some(field) => field
            .split(config.tag_delimiter)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect(),
    }
}

impl<R: Read> CardSource for CsvCardSource<R> {
    fn next_card(&mut self) -> Option<IngestResult<Card>> {
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(false) => return None,
                // Blank lines are skipped by the reader; a lone delimiter is not.
                Ok(true) if self.record.iter().all(str::is_empty) => continue,
                Ok(true) => return Some(self.parse_record()),
                Err(err) => return Some(Err(err.into())),
            }
        }
    }
}

fn parse_field<T: FromStr>(
    record: &StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> IngestResult<T> {
    let raw = record[index].trim();
    raw.parse().map_err(|_| IngestError::MalformedRow {
        line,
        reason: format!("{name} '{raw}' is not a valid number"),
    })
}

/// Rejects ratings outside the configured bounds, NaN included.
pub(super) fn check_rating(rating: f64, line: u64, config: &IngestConfig) -> IngestResult<()> {
    if rating >= config.min_rating && rating <= config.max_rating {
        Ok(())
    } else {
        Err(IngestError::RatingOutOfRange {
            line,
            rating,
            min: config.min_rating,
            max: config.max_rating,
        })
    }
}

/// Writes every card of `store` to `writer` in id order.
///
/// # Returns
///
/// The number of cards written.
pub fn export_csv<W: Write>(
    store: &CardStore,
    writer: W,
    config: &IngestConfig,
) -> IngestResult<usize> {
    let mut writer = WriterBuilder::new()
        .delimiter(config.delimiter_byte())
        .from_writer(writer);
    writer.write_record(EXPORT_HEADER)?;

    let tag_delimiter = config.tag_delimiter.to_string();
    let mut written = 0;
    for card in store.iter_by_id() {
        writer.write_record([
            card.id.clone(),
            card.name.clone(),
            card.power.to_string(),
            card.resistance.to_string(),
            card.rating.to_string(),
            card.tags.join(&tag_delimiter),
        ])?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}
