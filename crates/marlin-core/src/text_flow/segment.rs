//! Grapheme and word segmentation strategies.
//!
//! [`UnicodeSegmenter`] follows UAX #29 boundaries. [`FallbackSegmenter`]
//! reproduces the naive behavior used where no segmentation data is
//! available: one piece per code point, and words split on single spaces
//! with each space re-inserted as an explicit `" "` joiner.

use unicode_segmentation::UnicodeSegmentation;

/// A strategy for splitting text into grapheme clusters and words.
pub trait Segmenter {
    /// Splits `text` into user-perceived characters.
    fn split_graphemes<'a>(&self, text: &'a str) -> Vec<&'a str>;

    /// Splits `text` into words, keeping separators as their own pieces.
    fn split_words<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Segmentation following Unicode grapheme cluster and word boundaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSegmenter;

impl Segmenter for UnicodeSegmenter {
    fn split_graphemes<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.graphemes(true).collect()
    }

    fn split_words<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split_word_bounds().collect()
    }
}

/// Code point and space-delimited segmentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSegmenter;

impl Segmenter for FallbackSegmenter {
    fn split_graphemes<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.char_indices()
            .map(|(start, ch)| &text[start..start + ch.len_utf8()])
            .collect()
    }

    fn split_words<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut words: Vec<&'a str> = text
            .split(' ')
            .flat_map(|word| [word, " "])
            .filter(|piece| !piece.is_empty())
            .collect();
        // every piece was followed by a joiner, including the last one
        words.pop();
        words
    }
}
