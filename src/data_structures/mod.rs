//! Data structures backing the card catalog.
//!
//! The catalog keeps every card in two indexes at once: a chained
//! [`HashIndex`] for lookup by id and an AVL [`OrderedIndex`] for ordered
//! traversal and rating queries. Both hold the same `Arc<Card>`, so a card is
//! allocated once no matter how many structures reference it.

pub mod card;
pub mod hash_index;
pub mod name_matcher;
pub mod ordered_index;
pub mod rating_filter_tree;
pub mod tree_render;

// Re-export common data structures
pub use card::Card;
pub use hash_index::{HashIndex, HashIndexConfig};
pub use name_matcher::NameMatcher;
pub use ordered_index::OrderedIndex;
pub use rating_filter_tree::{RatingFilterTree, RatingThreshold};
