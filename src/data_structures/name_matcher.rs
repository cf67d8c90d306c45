// Copyright (c) 2026 Card Catalog Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Substring matcher for card-name search.
//!
//! Boyer-Moore-Horspool over UTF-8 bytes: the pattern is preprocessed once
//! into a bad-character shift table and then run against every card name in
//! the catalog. Matching is case-sensitive. Byte-wise matching is sound for
//! UTF-8 because no character's encoding occurs inside another's.

/// Preprocessed search pattern.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    pattern: Vec<u8>,
    /// Shift distance per byte value when it is the last byte of the window
    shifts: [usize; 256],
}

impl NameMatcher {
    /// Preprocesses `pattern`. An empty pattern matches every name.
    pub fn new(pattern: &str) -> Self {
        let pattern = pattern.as_bytes().to_vec();
        let len = pattern.len();
        let mut shifts = [len.max(1); 256];
        // Rightmost occurrence wins; the final byte is excluded.
        for (i, &byte) in pattern.iter().enumerate().take(len.saturating_sub(1)) {
            shifts[byte as usize] = len - 1 - i;
        }
        Self { pattern, shifts }
    }

    /// Byte offset of the first occurrence of the pattern in `text`.
    pub fn find_first(&self, text: &str) -> Option<usize> {
        let text = text.as_bytes();
        let m = self.pattern.len();
        if m == 0 {
            return Some(0);
        }
        if m > text.len() {
            return None;
        }

        let mut start = 0;
        while start + m <= text.len() {
            let window = &text[start..start + m];
            if window == self.pattern.as_slice() {
                return Some(start);
            }
            start += self.shifts[window[m - 1] as usize];
        }
        None
    }

    /// Whether `text` contains the pattern.
    pub fn is_match(&self, text: &str) -> bool {
        self.find_first(text).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("Charizard", "Char", Some(0) ; "prefix")]
    #[test_case("Dark Charizard", "Charizard", Some(5) ; "suffix")]
    #[test_case("Pikachu", "kac", Some(2) ; "middle")]
    #[test_case("Pikachu", "pika", None ; "case sensitive")]
    #[test_case("Mew", "Mewtwo", None ; "pattern longer than text")]
    #[test_case("Mew", "", Some(0) ; "empty pattern")]
    #[test_case("Flabébé", "bébé", Some(4) ; "multibyte")]
    fn test_find_first(text: &str, pattern: &str, expected: Option<usize>) {
        assert_eq!(NameMatcher::new(pattern).find_first(text), expected);
    }

    proptest! {
        #[test]
        fn prop_agrees_with_str_find(text in "[a-cA-C ]{0,40}", pattern in "[a-cA-C]{0,4}") {
            let matcher = NameMatcher::new(&pattern);
            prop_assert_eq!(matcher.find_first(&text), text.find(pattern.as_str()));
        }
    }
}
