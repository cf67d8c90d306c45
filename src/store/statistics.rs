//! Catalog health report.

use std::fmt;

use serde::Serialize;

/// Rough per-card footprint used by [`CatalogStatistics::approx_memory_bytes`]:
/// the card allocation, its strings, one tree node and one chain slot.
pub const APPROX_BYTES_PER_CARD: usize = 128;

/// Point-in-time metrics of a [`CardStore`](super::CardStore).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStatistics {
    /// Number of cards in the catalog
    pub card_count: usize,

    /// Current number of hash buckets
    pub capacity: usize,

    /// `card_count / capacity`
    pub load_factor: f64,

    /// Sum over non-empty buckets of `bucket size - 1`
    pub collision_count: usize,

    /// Buckets holding no card
    pub empty_buckets: usize,

    /// `empty_buckets / capacity`
    pub empty_bucket_ratio: f64,

    /// Longest chain
    pub max_bucket_size: usize,

    /// Number of times the hash table has grown
    pub rehash_count: usize,

    /// Height of the ordered index
    pub tree_height: usize,

    /// Height of a perfectly balanced tree with `card_count` nodes
    pub min_tree_height: usize,

    /// Estimated memory held by the catalog
    pub approx_memory_bytes: usize,
}

impl CatalogStatistics {
    /// Derives the bucket metrics from a sequence of chain lengths.
    pub(crate) fn from_parts<I>(
        bucket_sizes: I,
        card_count: usize,
        rehash_count: usize,
        tree_height: usize,
    ) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut capacity = 0;
        let mut collision_count = 0;
        let mut empty_buckets = 0;
        let mut max_bucket_size = 0;
        for size in bucket_sizes {
            capacity += 1;
            if size == 0 {
                empty_buckets += 1;
            } else {
                collision_count += size - 1;
            }
            max_bucket_size = max_bucket_size.max(size);
        }

        let ratio = |n: usize| {
            if capacity == 0 {
                0.0
            } else {
                n as f64 / capacity as f64
            }
        };

        Self {
            card_count,
            capacity,
            load_factor: ratio(card_count),
            collision_count,
            empty_buckets,
            empty_bucket_ratio: ratio(empty_buckets),
            max_bucket_size,
            rehash_count,
            tree_height,
            min_tree_height: min_tree_height(card_count),
            approx_memory_bytes: card_count * APPROX_BYTES_PER_CARD,
        }
    }
}

/// `floor(log2 n) + 1`, or 0 for an empty tree.
pub fn min_tree_height(n: usize) -> usize {
    match n.checked_ilog2() {
        Some(log) => log as usize + 1,
        None => 0,
    }
}

impl fmt::Display for CatalogStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cards:             {}", self.card_count)?;
        writeln!(f, "Capacity:          {}", self.capacity)?;
        writeln!(f, "Load factor:       {:.3}", self.load_factor)?;
        writeln!(f, "Collisions:        {}", self.collision_count)?;
        writeln!(
            f,
            "Empty buckets:     {} ({:.1}%)",
            self.empty_buckets,
            self.empty_bucket_ratio * 100.0
        )?;
        writeln!(f, "Longest chain:     {}", self.max_bucket_size)?;
        writeln!(f, "Rehashes:          {}", self.rehash_count)?;
        writeln!(
            f,
            "Tree height:       {} (minimum {})",
            self.tree_height, self.min_tree_height
        )?;
        write!(f, "Approx. memory:    {} bytes", self.approx_memory_bytes)
    }
}
