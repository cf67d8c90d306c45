// Copyright (c) 2026 Card Catalog Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Bucket selection for the hash index.
//!
//! Bucket indices come from double hashing: a primary FNV-1a hash of the id
//! plus an attempt-scaled secondary step derived from it,
//! `(h1 + attempt * h2) mod capacity` with `h2 = 1 + (h1 mod (capacity - 1))`.
//! The index itself only ever uses attempt 0 and chains collisions.

use std::hash::Hasher;

use super::config::MIN_CAPACITY;

/// Computes the primary hash of an id using the FNV-1a algorithm.
pub fn primary_hash(id: &str) -> u64 {
    let mut hasher = fnv::FnvHasher::default();
    hasher.write(id.as_bytes());
    hasher.finish()
}

/// Maps ids to buckets for a table of a given capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketHasher {
    capacity: usize,
}

impl BucketHasher {
    /// Creates a hasher for `capacity` buckets (at least [`MIN_CAPACITY`]).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(MIN_CAPACITY),
        }
    }

    /// The number of buckets this hasher maps into.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The secondary step for a primary hash. Never zero.
    pub fn step(&self, h1: u64) -> u64 {
        1 + h1 % (self.capacity as u64 - 1)
    }

    /// The bucket visited by probe number `attempt` for `id`.
    pub fn probe(&self, id: &str, attempt: u64) -> usize {
        let h1 = primary_hash(id);
        let h2 = self.step(h1);
        // u128 keeps the probe sequence an exact arithmetic progression mod capacity
        ((h1 as u128 + attempt as u128 * h2 as u128) % self.capacity as u128) as usize
    }

    /// The home bucket of `id`.
    pub fn bucket(&self, id: &str) -> usize {
        self.probe(id, 0)
    }
}
