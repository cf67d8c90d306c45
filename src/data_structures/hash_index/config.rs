// Copyright (c) 2026 Card Catalog Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration options for the hash index.

use crate::config::StoreConfig;

/// Smallest capacity the index accepts; the secondary step needs `capacity - 1 > 0`.
pub const MIN_CAPACITY: usize = 2;

/// Configuration for the hash index.
#[derive(Debug, Clone, PartialEq)]
pub struct HashIndexConfig {
    /// Number of buckets the index starts with.
    pub initial_capacity: usize,

    /// Load factor at which the table doubles.
    /// Growth is checked against the prospective size before each insert.
    pub load_factor_threshold: f64,
}

impl HashIndexConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial number of buckets, clamped to at least [`MIN_CAPACITY`].
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity.max(MIN_CAPACITY);
        self
    }

    /// Sets the growth threshold, clamped to `(0.0, 1.0]`.
    pub fn with_load_factor_threshold(mut self, load_factor_threshold: f64) -> Self {
        self.load_factor_threshold = load_factor_threshold.clamp(f64::EPSILON, 1.0);
        self
    }
}

impl Default for HashIndexConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 100,
            load_factor_threshold: 0.7,
        }
    }
}

impl From<&StoreConfig> for HashIndexConfig {
    fn from(config: &StoreConfig) -> Self {
        Self::new()
            .with_initial_capacity(config.initial_capacity)
            .with_load_factor_threshold(config.load_factor_threshold)
    }
}
