// Copyright (c) 2026 Card Catalog Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! The card store.
//!
//! [`CardStore`] keeps every card in a [`HashIndex`] for lookups by id and an
//! [`OrderedIndex`] for ordered traversal, rating queries and rankings. Both
//! indexes hold the same `Arc<Card>`; the store is the only writer of either,
//! so they always contain exactly the same set of ids.
//!
//! # Examples
//!
//! ```
//! use card_catalog_lib::data_structures::Card;
//! use card_catalog_lib::store::CardStore;
//!
//! let mut store = CardStore::new();
//! store.add(Card::new("A", "Bulbasaur", 49, 49, 1.0)).unwrap();
//! store.add(Card::new("B", "Charmander", 52, 43, 5.0)).unwrap();
//! store.add(Card::new("C", "Squirtle", 48, 65, 3.0)).unwrap();
//!
//! let top: Vec<_> = store.top_by_rating(2).iter().map(|c| c.id.clone()).collect();
//! assert_eq!(top, ["B", "C"]);
//! assert!(store.add(Card::new("A", "Ivysaur", 62, 63, 4.0)).is_err());
//! ```

mod statistics;

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::data_structures::{
    Card, HashIndex, HashIndexConfig, NameMatcher, OrderedIndex, RatingFilterTree,
    RatingThreshold,
};
use crate::error::store::{StoreError, StoreResult};

pub use statistics::{min_tree_height, CatalogStatistics, APPROX_BYTES_PER_CARD};

/// In-memory card catalog indexed by id.
#[derive(Debug, Clone)]
pub struct CardStore {
    by_id: HashIndex,
    ordered: OrderedIndex,
}

impl CardStore {
    /// Creates an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    /// Creates an empty store sized by `config`.
    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            by_id: HashIndex::with_config(HashIndexConfig::from(config)),
            ordered: OrderedIndex::new(),
        }
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the store holds no cards.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Adds a card to both indexes.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateKey`] if a card with the same id is stored; the
    /// store is left unchanged.
    pub fn add(&mut self, card: Card) -> StoreResult<()> {
        if self.by_id.contains(&card.id) {
            debug!(id = %card.id, "rejected duplicate card");
            return Err(StoreError::DuplicateKey { id: card.id });
        }

        let card = Arc::new(card);
        self.by_id.insert(Arc::clone(&card));
        if !self.ordered.insert(Arc::clone(&card)) {
            // Only reachable if the indexes were already out of sync.
            self.by_id.remove(&card.id);
            return Err(StoreError::InvariantViolation(format!(
                "id '{}' was in the ordered index but not the hash index",
                card.id
            )));
        }

        debug!(id = %card.id, len = self.len(), "card added");
        Ok(())
    }

    /// Removes a card from both indexes and hands it back.
    ///
    /// # Errors
    ///
    /// * [`StoreError::NotFound`] if the id is absent; nothing is touched.
    /// * [`StoreError::InvariantViolation`] if the id was hashed but missing
    ///   from the ordered index.
    pub fn remove(&mut self, id: &str) -> StoreResult<Arc<Card>> {
        let Some(card) = self.by_id.remove(id) else {
            return Err(StoreError::NotFound { id: id.to_string() });
        };

        if self.ordered.remove(id).is_none() {
            return Err(StoreError::InvariantViolation(format!(
                "id '{id}' was in the hash index but not the ordered index"
            )));
        }

        debug!(id, len = self.len(), "card removed");
        Ok(card)
    }

    /// Looks up a card by id.
    pub fn find_by_id(&self, id: &str) -> Option<&Arc<Card>> {
        self.by_id.get(id)
    }

    /// Cards whose name contains `text` (case-sensitive), in bucket order.
    ///
    /// An empty `text` matches every card.
    pub fn find_by_name_substring(&self, text: &str) -> Vec<Arc<Card>> {
        let matcher = NameMatcher::new(text);
        self.by_id
            .iter()
            .filter(|card| matcher.is_match(&card.name))
            .cloned()
            .collect()
    }

    /// Cards rated within `[min, max]`, in id order. Empty when `min > max`.
    pub fn find_by_rating_range(&self, min: f64, max: f64) -> Vec<Arc<Card>> {
        self.ordered.range_by_rating(min, max)
    }

    /// The `k` best-rated cards, highest first.
    pub fn top_by_rating(&self, k: usize) -> Vec<Arc<Card>> {
        self.ordered.top_by_rating(k)
    }

    /// Builds a throwaway tree of the cards passing `threshold`.
    ///
    /// Cards are scanned in bucket order, so equal ratings keep that order.
    pub fn rating_snapshot(&self, threshold: RatingThreshold) -> RatingFilterTree {
        RatingFilterTree::build(self.by_id.iter(), threshold)
    }

    /// Iterates over the cards in ascending id order.
    pub fn iter_by_id(&self) -> impl Iterator<Item = &Arc<Card>> + '_ {
        self.ordered.iter()
    }

    /// Renders the ordered index sideways.
    pub fn render_tree(&self) -> String {
        self.ordered.render()
    }

    /// Collects the current catalog metrics.
    pub fn statistics(&self) -> CatalogStatistics {
        CatalogStatistics::from_parts(
            self.by_id.bucket_sizes(),
            self.len(),
            self.by_id.rehash_count(),
            self.ordered.height(),
        )
    }

    /// Drops every card and returns the hash table to its initial capacity.
    pub fn clear(&mut self) {
        let dropped = self.len();
        self.by_id.clear();
        self.ordered.clear();
        info!(dropped, capacity = self.by_id.capacity(), "card store cleared");
    }

    /// Checks that both indexes agree and are internally well formed.
    ///
    /// Verifies that both hold the same ids and share each card allocation,
    /// that the load factor is below its threshold, and the AVL invariants.
    pub fn verify_consistency(&self) -> StoreResult<()> {
        self.ordered.check_invariants()?;

        let tree_count = self.ordered.count();
        if tree_count != self.by_id.len() {
            return Err(StoreError::InvariantViolation(format!(
                "hash index holds {} cards but ordered index holds {tree_count}",
                self.by_id.len()
            )));
        }

        for card in self.by_id.iter() {
            match self.ordered.find(&card.id) {
                Some(other) if Arc::ptr_eq(card, other) => {}
                Some(_) => {
                    return Err(StoreError::InvariantViolation(format!(
                        "id '{}' maps to different cards in the two indexes",
                        card.id
                    )))
                }
                None => {
                    return Err(StoreError::InvariantViolation(format!(
                        "id '{}' is missing from the ordered index",
                        card.id
                    )))
                }
            }
        }

        if !self.is_empty() && self.by_id.load_factor() >= self.by_id.load_factor_threshold() {
            return Err(StoreError::InvariantViolation(format!(
                "load factor {:.3} reached the threshold {}",
                self.by_id.load_factor(),
                self.by_id.load_factor_threshold()
            )));
        }

        Ok(())
    }
}

impl Default for CardStore {
    fn default() -> Self {
        Self::new()
    }
}
