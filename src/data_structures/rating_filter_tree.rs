//! Throwaway rating tree for threshold snapshots.
//!
//! A plain, unbalanced binary search tree keyed by rating, built from the
//! cards above or below a threshold and discarded after it has been shown.
//! Equal ratings always go right, so ties keep the order of the scan that
//! built the tree. It takes part in no invariant with the catalog indexes.

use std::fmt;
use std::sync::Arc;

use super::card::Card;
use super::tree_render::{self, RenderNode};

/// Which side of the threshold a snapshot keeps. Both comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingThreshold {
    /// Keep cards rated strictly above the value
    Above(f64),
    /// Keep cards rated strictly below the value
    Below(f64),
}

impl RatingThreshold {
    /// Whether `card` passes this threshold.
    pub fn accepts(&self, card: &Card) -> bool {
        match *self {
            Self::Above(limit) => card.rating > limit,
            Self::Below(limit) => card.rating < limit,
        }
    }
}

impl fmt::Display for RatingThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Above(limit) => write!(f, "> {limit}"),
            Self::Below(limit) => write!(f, "< {limit}"),
        }
    }
}

#[derive(Debug)]
struct RatingNode {
    card: Arc<Card>,
    left: Option<Box<RatingNode>>,
    right: Option<Box<RatingNode>>,
}

impl RenderNode for RatingNode {
    fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    fn card(&self) -> &Card {
        &self.card
    }
}

/// Unbalanced BST of the cards passing a [`RatingThreshold`].
#[derive(Debug)]
pub struct RatingFilterTree {
    root: Option<Box<RatingNode>>,
    threshold: RatingThreshold,
    len: usize,
}

impl RatingFilterTree {
    /// Builds a tree from the cards in `cards` that pass `threshold`, in scan order.
    pub fn build<'a, I>(cards: I, threshold: RatingThreshold) -> Self
    where
        I: IntoIterator<Item = &'a Arc<Card>>,
    {
        let mut tree = Self {
            root: None,
            threshold,
            len: 0,
        };
        for card in cards {
            if threshold.accepts(card) {
                tree.insert(Arc::clone(card));
            }
        }
        tree
    }

    /// The threshold the tree was built with.
    pub fn threshold(&self) -> RatingThreshold {
        self.threshold
    }

    /// Number of cards in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no card passed the threshold.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // Iterative: a sorted scan degenerates the tree into a list.
    fn insert(&mut self, card: Arc<Card>) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if card.rating < node.card.rating {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(Box::new(RatingNode {
            card,
            left: None,
            right: None,
        }));
        self.len += 1;
    }

    /// Cards from highest to lowest rating (right-first in-order walk).
    pub fn descending(&self) -> Vec<Arc<Card>> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack: Vec<&RatingNode> = Vec::new();
        let mut current = self.root.as_deref();
        loop {
            while let Some(node) = current {
                stack.push(node);
                current = node.right.as_deref();
            }
            let Some(node) = stack.pop() else {
                break;
            };
            out.push(Arc::clone(&node.card));
            current = node.left.as_deref();
        }
        out
    }

    /// Renders the tree sideways, highest rating on top.
    pub fn render(&self) -> String {
        tree_render::render(self.root.as_deref())
    }
}

// The default recursive drop would use one stack frame per level.
impl Drop for RatingFilterTree {
    fn drop(&mut self) {
        let mut pending: Vec<Box<RatingNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(entries: &[(&str, f64)]) -> Vec<Arc<Card>> {
        entries
            .iter()
            .map(|(id, rating)| Arc::new(Card::new(*id, *id, 0, 0, *rating)))
            .collect()
    }

    fn ids(cards: &[Arc<Card>]) -> Vec<&str> {
        cards.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_above_is_strict() {
        let all = cards(&[("a", 5.0), ("b", 6.0), ("c", 4.0)]);
        let tree = RatingFilterTree::build(&all, RatingThreshold::Above(5.0));
        assert_eq!(ids(&tree.descending()), vec!["b"]);
    }

    #[test]
    fn test_below_filters_and_orders() {
        let all = cards(&[("a", 3.0), ("b", 9.0), ("c", 1.0), ("d", 2.5)]);
        let tree = RatingFilterTree::build(&all, RatingThreshold::Below(5.0));
        assert_eq!(tree.len(), 3);
        assert_eq!(ids(&tree.descending()), vec!["a", "d", "c"]);
    }

    #[test]
    fn test_duplicate_ratings_keep_scan_order() {
        // Ties go right, so in a right-first walk the later card comes first.
        let all = cards(&[("first", 7.0), ("second", 7.0), ("third", 7.0)]);
        let tree = RatingFilterTree::build(&all, RatingThreshold::Above(0.0));
        assert_eq!(ids(&tree.descending()), vec!["third", "second", "first"]);
    }

    #[test]
    fn test_degenerate_input_does_not_overflow() {
        let all: Vec<Arc<Card>> = (0..50_000)
            .map(|i| Arc::new(Card::new(format!("{i}"), "x", 0, 0, i as f64)))
            .collect();
        let tree = RatingFilterTree::build(&all, RatingThreshold::Above(-1.0));
        assert_eq!(tree.len(), 50_000);
        assert_eq!(tree.descending().first().map(|c| c.rating), Some(49_999.0));

        let small = RatingFilterTree::build(&all[..2_000], RatingThreshold::Above(-1.0));
        assert_eq!(small.render().lines().count(), 2_000);
    }

    #[test]
    fn test_empty_snapshot() {
        let all = cards(&[("a", 1.0)]);
        let tree = RatingFilterTree::build(&all, RatingThreshold::Above(9.0));
        assert!(tree.is_empty());
        assert!(tree.render().is_empty());
        assert_eq!(tree.threshold().to_string(), "> 9");
    }
}
