//! Ingestion configuration module.
//!
//! This module defines how delimited card files are read and written and
//! which rows the importers accept.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Ingestion and export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Field separator of card files
    pub delimiter: char,

    /// Separator between tags inside the tags field
    pub tag_delimiter: char,

    /// Whether the first row of a card file is a header
    pub has_headers: bool,

    /// Lowest rating accepted from a source
    pub min_rating: f64,

    /// Highest rating accepted from a source
    pub max_rating: f64,

    /// Tags given to cards whose source row carries none
    pub default_tags: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            tag_delimiter: '|',
            has_headers: true,
            min_rating: 0.0,
            max_rating: 10.0,
            default_tags: vec!["Pokémon".to_string()],
        }
    }
}

impl IngestConfig {
    /// The field delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.delimiter as u8
    }
}

impl Validate for IngestConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !self.delimiter.is_ascii() || !self.tag_delimiter.is_ascii() {
            return Err(ConfigError::ValidationError(
                "delimiter and tag_delimiter must be ASCII characters".to_string(),
            ));
        }

        if self.delimiter == self.tag_delimiter {
            return Err(ConfigError::ValidationError(format!(
                "tag_delimiter must differ from delimiter ('{}')",
                self.delimiter
            )));
        }

        if self.min_rating > self.max_rating {
            return Err(ConfigError::ValidationError(format!(
                "min_rating ({}) must be less than or equal to max_rating ({})",
                self.min_rating, self.max_rating
            )));
        }

        Ok(())
    }
}
