//! Store configuration module.
//!
//! This module defines the sizing parameters of the card store: the initial
//! hash table capacity, the load factor that triggers growth, and the default
//! size of top-K rankings.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Number of hash buckets the store starts with (and returns to on clear)
    pub initial_capacity: usize,

    /// Load factor at which the hash table doubles before an insert
    pub load_factor_threshold: f64,

    /// Default number of cards in a top-K ranking
    pub top_k: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 100,
            load_factor_threshold: 0.7,
            top_k: 20,
        }
    }
}

impl StoreConfig {
    /// Sets the initial number of hash buckets.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the load factor that triggers growth.
    pub fn with_load_factor_threshold(mut self, load_factor_threshold: f64) -> Self {
        self.load_factor_threshold = load_factor_threshold;
        self
    }
}

impl Validate for StoreConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.initial_capacity < 2 {
            return Err(ConfigError::ValidationError(
                "initial_capacity must be at least 2".to_string(),
            ));
        }

        if !(self.load_factor_threshold > 0.0 && self.load_factor_threshold <= 1.0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "store.load_factor_threshold".to_string(),
                message: format!("{} is not in (0.0, 1.0]", self.load_factor_threshold),
            });
        }

        if self.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "top_k must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
