//! Sideways pretty-printing of binary trees.
//!
//! The greatest key is printed first (right subtree on top), each line
//! prefixed with box-drawing connectors:
//!
//! ```text
//! │   ┌── C (ID: c, Rating: 3)
//! └── B (ID: b, Rating: 2)
//!     └── A (ID: a, Rating: 1)
//! ```
//!
//! Rendering uses an explicit stack, so degenerate (list-shaped) trees do not
//! recurse once per level.

use std::fmt::Write;

use super::card::Card;

/// A node that can be rendered by [`render`].
pub trait RenderNode {
    /// The left child, if any.
    fn left(&self) -> Option<&Self>;

    /// The right child, if any.
    fn right(&self) -> Option<&Self>;

    /// The card carried by this node.
    fn card(&self) -> &Card;
}

enum Frame<'a, N> {
    Visit(&'a N, String, bool),
    Emit(&'a N, String, bool),
}

/// Renders the tree rooted at `root`, one node per line.
pub fn render<N: RenderNode>(root: Option<&N>) -> String {
    let mut out = String::new();
    let mut stack = Vec::new();
    if let Some(root) = root {
        stack.push(Frame::Visit(root, String::new(), true));
    }

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Visit(node, prefix, is_left) => {
                if let Some(left) = node.left() {
                    let child_prefix = format!("{prefix}{}", if is_left { "    " } else { "│   " });
                    stack.push(Frame::Visit(left, child_prefix, true));
                }
                let right_prefix = format!("{prefix}{}", if is_left { "│   " } else { "    " });
                stack.push(Frame::Emit(node, prefix, is_left));
                if let Some(right) = node.right() {
                    stack.push(Frame::Visit(right, right_prefix, false));
                }
            }
            Frame::Emit(node, prefix, is_left) => {
                let card = node.card();
                // Writing to a String cannot fail.
                let _ = writeln!(
                    out,
                    "{prefix}{}{} (ID: {}, Rating: {})",
                    if is_left { "└── " } else { "┌── " },
                    card.name,
                    card.id,
                    card.rating
                );
            }
        }
    }

    out
}
