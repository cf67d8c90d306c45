// Copyright (c) 2026 Card Catalog Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Node implementation and rotations for the AVL ordered index.
//!
//! Every function here takes ownership of a subtree and returns its new root,
//! so rebalancing never leaves a dangling parent link.

use std::cmp::max;
use std::sync::Arc;

use crate::data_structures::card::Card;
use crate::data_structures::tree_render::RenderNode;

/// An owned, possibly empty subtree.
pub(crate) type Link = Option<Box<AvlNode>>;

/// A node of the AVL tree.
#[derive(Debug, Clone)]
pub(crate) struct AvlNode {
    /// The card stored at this position
    pub(crate) card: Arc<Card>,

    /// Subtree of smaller ids
    pub(crate) left: Link,

    /// Subtree of greater ids
    pub(crate) right: Link,

    /// Height of the subtree rooted here; a leaf has height 1
    pub(crate) height: usize,
}

impl AvlNode {
    pub(crate) fn leaf(card: Arc<Card>) -> Box<Self> {
        Box::new(Self {
            card,
            left: None,
            right: None,
            height: 1,
        })
    }

    /// Recomputes this node's height from its children.
    pub(crate) fn update_height(&mut self) {
        self.height = 1 + max(height(&self.left), height(&self.right));
    }

    /// `height(left) - height(right)`.
    pub(crate) fn balance(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }
}

impl RenderNode for AvlNode {
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

/// Height of a subtree, 0 when absent.
pub(crate) fn height(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

/// Rotates `y` right around its left child.
///
/// ```text
///       y            x
///      / \          / \
///     x   C   =>   A   y
///    / \              / \
///   A   B            B   C
/// ```
pub(crate) fn rotate_right(mut y: Box<AvlNode>) -> Box<AvlNode> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

/// Rotates `x` left around its right child. Mirror of [`rotate_right`].
pub(crate) fn rotate_left(mut x: Box<AvlNode>) -> Box<AvlNode> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

/// Restores the AVL property at `node`, whose children are already balanced.
///
/// Applies the four classical cases. When the heavy child is itself evenly
/// balanced (possible after a deletion) the single rotation is used.
pub(crate) fn rebalance(mut node: Box<AvlNode>) -> Box<AvlNode> {
    node.update_height();
    let balance = node.balance();

    if balance > 1 {
        if node.left.as_ref().is_some_and(|left| left.balance() < 0) {
            // left-right
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if balance < -1 {
        if node.right.as_ref().is_some_and(|right| right.balance() > 0) {
            // right-left
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str) -> Box<AvlNode> {
        AvlNode::leaf(Arc::new(Card::new(id, id, 0, 0, 0.0)))
    }

    fn ids(link: &Link, out: &mut Vec<String>) {
        if let Some(node) = link {
            ids(&node.left, out);
            out.push(node.card.id.clone());
            ids(&node.right, out);
        }
    }

    #[test]
    fn test_rotate_right_preserves_order_and_heights() {
        // c <- b <- a chain leaning left
        let mut b = leaf("b");
        b.left = Some(leaf("a"));
        b.update_height();
        let mut c = leaf("c");
        c.left = Some(b);
        c.update_height();
        assert_eq!(c.height, 3);

        let root = rotate_right(c);
        assert_eq!(root.card.id, "b");
        assert_eq!(root.height, 2);
        assert_eq!(root.left.as_ref().map(|n| n.height), Some(1));
        assert_eq!(root.right.as_ref().map(|n| n.height), Some(1));

        let mut order = Vec::new();
        ids(&Some(root), &mut order);
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_rebalance_left_right_case() {
        // c has left child a, which has right child b
        let mut a = leaf("a");
        a.right = Some(leaf("b"));
        a.update_height();
        let mut c = leaf("c");
        c.left = Some(a);

        let root = rebalance(c);
        assert_eq!(root.card.id, "b");
        assert_eq!(root.balance(), 0);
        assert_eq!(root.height, 2);
    }

    #[test]
    fn test_rotation_without_child_is_identity() {
        let node = rotate_left(leaf("solo"));
        assert_eq!(node.card.id, "solo");
        assert_eq!(node.height, 1);
    }
}
