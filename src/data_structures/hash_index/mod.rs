// Copyright (c) 2026 Card Catalog Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Chained hash index keyed by card id.
//!
//! A resizable table of buckets, each bucket a small chain of cards. The
//! destination bucket is chosen with double hashing (see [`BucketHasher`]);
//! collisions inside that bucket are tolerated by chaining rather than
//! re-probed into alternate buckets.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use card_catalog_lib::data_structures::{Card, HashIndex, HashIndexConfig};
//!
//! let mut index = HashIndex::with_config(HashIndexConfig::new().with_initial_capacity(10));
//! assert!(index.insert(Arc::new(Card::new("base1-4", "Charizard", 120, 0, 9.5))));
//!
//! // Duplicate ids are rejected, the original card remains
//! assert!(!index.insert(Arc::new(Card::new("base1-4", "Other", 1, 1, 1.0))));
//! assert_eq!(index.get("base1-4").map(|c| c.name.as_str()), Some("Charizard"));
//! ```
//!
//! # Growth
//!
//! Before every insert the index checks the prospective load factor
//! `(len + 1) / capacity`; when it reaches the threshold the table doubles and
//! every card is re-bucketed under the new capacity. The index never shrinks.

mod config;
mod hash;

use std::sync::Arc;

use tracing::{debug, trace};

use super::card::Card;

pub use config::{HashIndexConfig, MIN_CAPACITY};
pub use hash::{primary_hash, BucketHasher};

type Bucket = Vec<Arc<Card>>;

/// Hash index mapping card id to card.
#[derive(Debug, Clone)]
pub struct HashIndex {
    buckets: Vec<Bucket>,
    hasher: BucketHasher,
    len: usize,
    config: HashIndexConfig,
    rehash_count: usize,
}

impl HashIndex {
    /// Creates an empty index with default configuration.
    pub fn new() -> Self {
        Self::with_config(HashIndexConfig::default())
    }

    /// Creates an empty index with the given configuration.
    pub fn with_config(config: HashIndexConfig) -> Self {
        let hasher = BucketHasher::new(config.initial_capacity);
        Self {
            buckets: vec![Bucket::new(); hasher.capacity()],
            hasher,
            len: 0,
            config,
            rehash_count: 0,
        }
    }

    /// Number of cards stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no cards.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Current ratio of stored cards to buckets.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// The configured growth threshold.
    pub fn load_factor_threshold(&self) -> f64 {
        self.config.load_factor_threshold
    }

    /// How many times the table has doubled since creation or the last clear.
    pub fn rehash_count(&self) -> usize {
        self.rehash_count
    }

    /// Chain length of every bucket, in bucket order.
    pub fn bucket_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(Vec::len)
    }

    /// Inserts a card unless its id is already present.
    ///
    /// # Returns
    ///
    /// `true` if the card was inserted, `false` if the id already existed
    /// (the stored card is left untouched).
    pub fn insert(&mut self, card: Arc<Card>) -> bool {
        if self.contains(&card.id) {
            return false;
        }

        while self.prospective_load_factor() >= self.config.load_factor_threshold {
            self.rehash();
        }

        let bucket = self.hasher.bucket(&card.id);
        trace!(id = %card.id, bucket, "inserting into bucket");
        self.buckets[bucket].push(card);
        self.len += 1;
        true
    }

    /// Looks up a card by id.
    pub fn get(&self, id: &str) -> Option<&Arc<Card>> {
        self.buckets[self.hasher.bucket(id)]
            .iter()
            .find(|card| card.id == id)
    }

    /// Whether a card with this id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Removes the card with this id from its chain.
    ///
    /// The rest of the chain keeps its order. The table never shrinks.
    pub fn remove(&mut self, id: &str) -> Option<Arc<Card>> {
        let bucket = &mut self.buckets[self.hasher.bucket(id)];
        let position = bucket.iter().position(|card| card.id == id)?;
        let card = bucket.remove(position);
        self.len -= 1;
        Some(card)
    }

    /// Iterates over all cards in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Card>> + '_ {
        self.buckets.iter().flatten()
    }

    /// Calls `visitor` for every card in bucket order.
    pub fn for_each<F: FnMut(&Arc<Card>)>(&self, visitor: F) {
        self.iter().for_each(visitor);
    }

    /// Drops every card and returns to the configured initial capacity.
    pub fn clear(&mut self) {
        *self = Self::with_config(self.config.clone());
    }

    fn prospective_load_factor(&self) -> f64 {
        (self.len + 1) as f64 / self.capacity() as f64
    }

    /// Doubles the bucket count and re-buckets every card.
    fn rehash(&mut self) {
        let new_hasher = BucketHasher::new(self.capacity() * 2);
        let mut new_buckets = vec![Bucket::new(); new_hasher.capacity()];

        for card in self.buckets.drain(..).flatten() {
            new_buckets[new_hasher.bucket(&card.id)].push(card);
        }

        debug!(
            old_capacity = self.hasher.capacity(),
            new_capacity = new_hasher.capacity(),
            len = self.len,
            "hash index rehashed"
        );

        self.buckets = new_buckets;
        self.hasher = new_hasher;
        self.rehash_count += 1;
    }
}

impl Default for HashIndex {
    fn default() -> Self {
        Self::new()
    }
}
