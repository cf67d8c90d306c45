//! Card-API JSON pages.
//!
//! Accepts the page shape served by public trading-card APIs:
//! `{ "data": [ { "id", "name", "hp"?, "rating"?, "types"? }, ... ] }`.
//! `hp` is usually a string such as `"60"`; it becomes the card's power, or 0
//! when absent or not a number. Resistance is always 0.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::delimited::check_rating;
use super::CardSource;
use crate::config::IngestConfig;
use crate::data_structures::Card;
use crate::error::ingest::{IngestError, IngestResult};

#[derive(Debug, Deserialize)]
struct Page {
    data: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: String,
    name: String,
    #[serde(default)]
    hp: Option<Value>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    types: Option<Vec<String>>,
}

/// Reads cards from a JSON page held in memory.
#[derive(Debug)]
pub struct JsonCardSource {
    entries: std::iter::Enumerate<std::vec::IntoIter<Entry>>,
    config: IngestConfig,
}

impl JsonCardSource {
    /// Parses a page from a file.
    pub fn from_path<P: AsRef<Path>>(path: P, config: &IngestConfig) -> IngestResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), config)
    }

    /// Parses a page from any byte stream.
    ///
    /// # Errors
    ///
    /// [`IngestError::Json`] if the payload is not a page of cards.
    pub fn from_reader<R: Read>(reader: R, config: &IngestConfig) -> IngestResult<Self> {
        let page: Page = serde_json::from_reader(reader)?;
        Ok(Self {
            entries: page.data.into_iter().enumerate(),
            config: config.clone(),
        })
    }

    fn convert(&self, index: usize, entry: Entry) -> IngestResult<Card> {
        // Entries are numbered from 1 in error messages.
        let line = index as u64 + 1;
        if entry.id.is_empty() {
            return Err(IngestError::MalformedRow {
                line,
                reason: "empty id".to_string(),
            });
        }

        let rating = entry.rating.unwrap_or(0.0);
        check_rating(rating, line, &self.config)?;

        let tags = match entry.types {
            Some(types) if !types.is_empty() => types,
            _ => self.config.default_tags.clone(),
        };

        let power = parse_hp(entry.hp.as_ref());
        Ok(Card::new(entry.id, entry.name, power, 0, rating).with_tags(tags))
    }
}

fn parse_hp(hp: Option<&Value>) -> i32 {
    match hp {
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
        Some(Value::Number(number)) => number
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(0),
        _ => 0,
    }
}

impl CardSource for JsonCardSource {
    fn next_card(&mut self) -> Option<IngestResult<Card>> {
        let (index, entry) = self.entries.next()?;
        Some(self.convert(index, entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!("60"), 60 ; "string")]
    #[test_case(json!(" 70 "), 70 ; "padded string")]
    #[test_case(json!(120), 120 ; "number")]
    #[test_case(json!("lots"), 0 ; "not a number")]
    #[test_case(json!(null), 0 ; "null")]
    fn test_parse_hp(value: Value, expected: i32) {
        assert_eq!(parse_hp(Some(&value)), expected);
    }

    #[test]
    fn test_reads_page() {
        let payload = json!({
            "data": [
                { "id": "xy1-1", "name": "Venusaur-EX", "hp": "180", "types": ["Grass"], "rating": 8.5 },
                { "id": "xy1-2", "name": "M Venusaur-EX" },
                { "id": "xy1-3", "name": "Weedle", "rating": 42.0 }
            ]
        });
        let mut source =
            JsonCardSource::from_reader(payload.to_string().as_bytes(), &IngestConfig::default())
                .unwrap();

        let first = source.next_card().unwrap().unwrap();
        assert_eq!(first.power, 180);
        assert_eq!(first.resistance, 0);
        assert_eq!(first.tags, vec!["Grass"]);
        assert_eq!(first.rating, 8.5);

        let second = source.next_card().unwrap().unwrap();
        assert_eq!(second.power, 0);
        assert_eq!(second.rating, 0.0);
        assert_eq!(second.tags, vec!["Pokémon"]);

        assert!(matches!(
            source.next_card(),
            Some(Err(IngestError::RatingOutOfRange { line: 3, .. }))
        ));
        assert!(source.next_card().is_none());
    }

    #[test]
    fn test_rejects_non_page() {
        let result = JsonCardSource::from_reader(&b"[1, 2, 3]"[..], &IngestConfig::default());
        assert!(matches!(result, Err(IngestError::Json(_))));
    }
}
