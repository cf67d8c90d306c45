// Copyright (c) 2026 Card Catalog Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! AVL ordered index keyed by card id.
//!
//! This module provides a self-balancing binary search tree over card ids.
//! It answers the ordered queries of the catalog: in-order listing, rating
//! range filters (a linear in-order walk, since the tree is not keyed by
//! rating) and top-K rankings.
//!
//! # Invariants
//!
//! * in-order traversal yields strictly ascending ids;
//! * every node's `height` equals `1 + max(height(left), height(right))`;
//! * every node satisfies `|height(left) - height(right)| <= 1`.
//!
//! [`OrderedIndex::check_invariants`] verifies all three.

mod node;

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;

use ordered_float::OrderedFloat;

use crate::error::store::{StoreError, StoreResult};

use super::card::Card;
use super::tree_render;
use node::{height, rebalance, AvlNode, Link};

/// AVL tree mapping card id to card.
#[derive(Debug, Clone, Default)]
pub struct OrderedIndex {
    root: Link,
    len: usize,
}

impl OrderedIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cards, maintained on insert and remove.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no cards.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes, counted by walking the whole tree.
    pub fn count(&self) -> usize {
        fn count_nodes(link: &Link) -> usize {
            link.as_ref()
                .map_or(0, |node| 1 + count_nodes(&node.left) + count_nodes(&node.right))
        }
        count_nodes(&self.root)
    }

    /// Height of the tree, 0 when empty.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// The card at the root of the tree.
    pub fn root(&self) -> Option<&Arc<Card>> {
        self.root.as_ref().map(|node| &node.card)
    }

    /// Inserts a card, rebalancing on the way back up.
    ///
    /// # Returns
    ///
    /// `true` if the card was inserted, `false` if its id was already present.
    pub fn insert(&mut self, card: Arc<Card>) -> bool {
        let mut inserted = false;
        self.root = Some(insert_node(self.root.take(), card, &mut inserted));
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Removes the card with this id, rebalancing every ancestor.
    pub fn remove(&mut self, id: &str) -> Option<Arc<Card>> {
        let mut removed = None;
        self.root = remove_node(self.root.take(), id, &mut removed);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Looks up a card by id.
    pub fn find(&self, id: &str) -> Option<&Arc<Card>> {
        let mut current = self.root.as_ref();
        while let Some(node) = current {
            current = match id.cmp(node.card.id.as_str()) {
                Ordering::Less => node.left.as_ref(),
                Ordering::Greater => node.right.as_ref(),
                Ordering::Equal => return Some(&node.card),
            };
        }
        None
    }

    /// Iterates over the cards in ascending id order.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Cards whose rating lies in `[min, max]`, in id order.
    pub fn range_by_rating(&self, min: f64, max: f64) -> Vec<Arc<Card>> {
        self.collect_where(|card| card.rating >= min && card.rating <= max)
    }

    /// Cards matching `predicate`, in id order.
    pub fn collect_where<P>(&self, mut predicate: P) -> Vec<Arc<Card>>
    where
        P: FnMut(&Card) -> bool,
    {
        let mut out = Vec::new();
        for card in self.iter() {
            if predicate(card.as_ref()) {
                out.push(Arc::clone(card));
            }
        }
        out
    }

    /// The `k` highest-rated cards, highest first.
    ///
    /// Walks the tree keeping a min-heap of at most `k` entries. Among equal
    /// ratings the card with the smaller id wins and is listed first.
    pub fn top_by_rating(&self, k: usize) -> Vec<Arc<Card>> {
        if k == 0 {
            return Vec::new();
        }

        let mut heap = BinaryHeap::with_capacity(k.min(self.len).saturating_add(1));
        for (seen, card) in self.iter().enumerate() {
            heap.push(Reverse(Ranked {
                rating: OrderedFloat(card.rating),
                seen: Reverse(seen),
                card,
            }));
            if heap.len() > k {
                heap.pop();
            }
        }

        // Ascending order of Reverse<Ranked> is descending rank.
        heap.into_sorted_vec()
            .into_iter()
            .map(|Reverse(ranked)| Arc::clone(ranked.card))
            .collect()
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Renders the tree sideways, greatest id on top.
    pub fn render(&self) -> String {
        tree_render::render(self.root.as_deref())
    }

    /// Verifies ordering, cached heights, balance and the cached length.
    pub fn check_invariants(&self) -> StoreResult<()> {
        fn check(link: &Link, low: Option<&str>, high: Option<&str>) -> StoreResult<usize> {
            let Some(node) = link else {
                return Ok(0);
            };
            let id = node.card.id.as_str();
            if low.is_some_and(|low| id <= low) || high.is_some_and(|high| id >= high) {
                return Err(StoreError::InvariantViolation(format!(
                    "id '{id}' is out of order"
                )));
            }

            let left = check(&node.left, low, Some(id))?;
            let right = check(&node.right, Some(id), high)?;
            if left.abs_diff(right) > 1 {
                return Err(StoreError::InvariantViolation(format!(
                    "node '{id}' is unbalanced ({left} vs {right})"
                )));
            }
            let expected = 1 + left.max(right);
            if node.height != expected {
                return Err(StoreError::InvariantViolation(format!(
                    "node '{id}' caches height {} but has height {expected}",
                    node.height
                )));
            }
            Ok(expected)
        }

        check(&self.root, None, None)?;
        let count = self.count();
        if count != self.len {
            return Err(StoreError::InvariantViolation(format!(
                "tracked length {} differs from node count {count}",
                self.len
            )));
        }
        Ok(())
    }
}

fn insert_node(link: Link, card: Arc<Card>, inserted: &mut bool) -> Box<AvlNode> {
    let Some(mut node) = link else {
        *inserted = true;
        return AvlNode::leaf(card);
    };

    match card.id.cmp(&node.card.id) {
        Ordering::Less => node.left = Some(insert_node(node.left.take(), card, inserted)),
        Ordering::Greater => node.right = Some(insert_node(node.right.take(), card, inserted)),
        Ordering::Equal => return node,
    }

    rebalance(node)
}

fn remove_node(link: Link, id: &str, removed: &mut Option<Arc<Card>>) -> Link {
    let mut node = link?;

    match id.cmp(node.card.id.as_str()) {
        Ordering::Less => node.left = remove_node(node.left.take(), id, removed),
        Ordering::Greater => node.right = remove_node(node.right.take(), id, removed),
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, None) => {
                *removed = Some(node.card);
                return None;
            }
            (Some(child), None) | (None, Some(child)) => {
                *removed = Some(node.card);
                return Some(child);
            }
            (Some(left), Some(right)) => {
                // Take over the in-order successor, then delete it from the right subtree.
                let successor = Arc::clone(leftmost(&right));
                let mut successor_slot = None;
                node.right = remove_node(Some(right), &successor.id, &mut successor_slot);
                node.left = Some(left);
                *removed = Some(std::mem::replace(&mut node.card, successor));
            }
        },
    }

    Some(rebalance(node))
}

fn leftmost(node: &AvlNode) -> &Arc<Card> {
    let mut current = node;
    while let Some(left) = current.left.as_deref() {
        current = left;
    }
    &current.card
}

/// Ranking entry for top-K: rating first, earlier-seen wins ties.
struct Ranked<'a> {
    rating: OrderedFloat<f64>,
    seen: Reverse<usize>,
    card: &'a Arc<Card>,
}

impl PartialEq for Ranked<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked<'_> {}

impl PartialOrd for Ranked<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.rating, self.seen).cmp(&(other.rating, other.seen))
    }
}

/// In-order iterator over an [`OrderedIndex`].
#[derive(Debug)]
pub struct Iter<'a> {
    stack: Vec<&'a AvlNode>,
}

impl<'a> Iter<'a> {
    fn push_left_spine(&mut self, mut node: Option<&'a AvlNode>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Arc<Card>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.card)
    }
}
