//! The card record shared by every index.

use serde::{Deserialize, Serialize};

/// A trading card.
///
/// Cards are write-once: the indexes share one `Arc<Card>` per id and never
/// mutate it. Replacing a card means removing the id and adding a new card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Caller-assigned unique key
    pub id: String,

    /// Display name
    pub name: String,

    /// Attack strength (hit points for imported cards)
    pub power: i32,

    /// Defensive strength
    pub resistance: i32,

    /// Type tags in source order
    pub tags: Vec<String>,

    /// Score, expected in `[0, 10]` but not enforced here
    pub rating: f64,
}

impl Card {
    /// Creates a card with no tags.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        power: i32,
        resistance: i32,
        rating: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            power,
            resistance,
            tags: Vec::new(),
            rating,
        }
    }

    /// Replaces the tag list.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}
