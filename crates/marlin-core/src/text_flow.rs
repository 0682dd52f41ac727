//! Width-constrained text flow for diagram labels.
//!
//! This module folds a line of styled words into as many lines as needed so
//! that each one satisfies a caller-supplied fit predicate. The predicate
//! owns the notion of width (pixels, terminal columns, ...); this module only
//! decides where lines break and, when a single word is too wide, where the
//! word itself is cut.
//!
//! # Overview
//!
//! - [`MarkdownWord`] / [`MarkdownLine`] - styled words and lines
//! - [`Segmenter`] - pluggable grapheme and word segmentation
//! - [`TextFlow`] - the line/word fitting engine
//!
//! # Example
//!
//! ```
//! # use marlin_core::text_flow::{TextFlow, MarkdownWordType, fits_columns};
//! let flow: TextFlow = TextFlow::default();
//! let line = flow.line_from_text("hello brave new world", MarkdownWordType::Normal);
//!
//! let lines = flow.split_line_to_fit_width(&line, fits_columns(11)).unwrap();
//! let rendered: Vec<String> = lines.iter().map(|l| marlin_core::text_flow::line_text(l)).collect();
//! assert_eq!(rendered, ["hello brave", "new world"]);
//! ```

mod markdown;
mod segment;

pub use markdown::{MarkdownLine, MarkdownWord, MarkdownWordType, line_text};
pub use segment::{FallbackSegmenter, Segmenter, UnicodeSegmenter};

use std::collections::VecDeque;

use log::trace;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

/// Errors reported by the text-flow engine.
///
/// These indicate a caller contract violation rather than malformed user text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextFlowError {
    /// A word contained an explicit line break.
    ///
    /// Multi-line text must be split on line breaks before being laid out.
    #[error("split_line_to_fit_width does not support newlines in the line")]
    UnsupportedNewline,
}

/// The text-flow engine, parameterized over its segmentation strategy.
///
/// The engine is pure: identical `(line, fits)` input always yields identical
/// output, and no state is shared between calls.
#[derive(Debug, Clone, Default)]
pub struct TextFlow<S = UnicodeSegmenter> {
    segmenter: S,
}

impl<S: Segmenter> TextFlow<S> {
    /// Creates an engine using the given segmentation strategy.
    pub fn new(segmenter: S) -> Self {
        Self { segmenter }
    }

    /// Builds a line from plain text, splitting it into words.
    ///
    /// Every word, joiners included, receives `word_type`. The text must not
    /// contain line breaks if the result is to be laid out.
    pub fn line_from_text(&self, text: &str, word_type: MarkdownWordType) -> MarkdownLine {
        self.segmenter
            .split_words(text)
            .into_iter()
            .map(|word| MarkdownWord::new(word, word_type))
            .collect()
    }

    /// Splits a word into the longest leading part that fits and the remainder.
    ///
    /// Grapheme clusters are appended one at a time while the growing fragment
    /// still fits. The first cluster is always taken, even when it does not
    /// fit on its own, so repeated splitting always makes progress.
    pub fn split_word_to_fit_width<F>(
        &self,
        fits: F,
        word: &MarkdownWord,
    ) -> (MarkdownWord, MarkdownWord)
    where
        F: Fn(&[MarkdownWord]) -> bool,
    {
        let characters = self.segmenter.split_graphemes(&word.content);

        let mut used = String::new();
        let mut consumed = 0;
        for character in &characters {
            let candidate = MarkdownWord::new(format!("{used}{character}"), word.word_type);
            if !fits(std::slice::from_ref(&candidate)) {
                break;
            }
            used = candidate.content;
            consumed += 1;
        }

        if consumed == 0 {
            if let Some(first) = characters.first() {
                used.push_str(first);
                consumed = 1;
            }
        }

        let rest: String = characters[consumed..].concat();
        (
            MarkdownWord::new(used, word.word_type),
            MarkdownWord::new(rest, word.word_type),
        )
    }

    /// Splits a line into lines that each satisfy `fits`.
    ///
    /// Words are consumed in order. A `" "` word is a joiner: it is kept only
    /// between two words sharing a line. A word that does not fit on an empty
    /// line is split at grapheme granularity and its remainder is requeued.
    ///
    /// # Errors
    ///
    /// Returns [`TextFlowError::UnsupportedNewline`] if any word contains a
    /// line break.
    pub fn split_line_to_fit_width<F>(
        &self,
        line: &[MarkdownWord],
        fits: F,
    ) -> Result<Vec<MarkdownLine>, TextFlowError>
    where
        F: Fn(&[MarkdownWord]) -> bool,
    {
        if line.iter().any(|word| word.content.contains('\n')) {
            return Err(TextFlowError::UnsupportedNewline);
        }

        let mut words: VecDeque<MarkdownWord> = line.iter().cloned().collect();
        let mut lines: Vec<MarkdownLine> = Vec::new();
        let mut current: MarkdownLine = Vec::new();

        loop {
            if words.is_empty() {
                if !current.is_empty() {
                    lines.push(current);
                }
                break;
            }

            let has_joiner = words.front().is_some_and(MarkdownWord::is_joiner);
            if has_joiner {
                words.pop_front();
            }

            let next_word = words.pop_front().unwrap_or_else(MarkdownWord::joiner);

            let mut candidate = current.clone();
            if has_joiner {
                candidate.push(MarkdownWord::joiner());
            }
            candidate.push(next_word.clone());

            if fits(&candidate) {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                words.push_front(next_word);
            } else if !next_word.content.is_empty() {
                let (head, rest) = self.split_word_to_fit_width(&fits, &next_word);
                lines.push(vec![head]);
                if !rest.content.is_empty() {
                    words.push_front(rest);
                }
            }
        }

        trace!(words = line.len(), lines = lines.len(); "Line split to fit width");

        Ok(lines)
    }
}

/// Splits a line using the default Unicode segmentation.
///
/// See [`TextFlow::split_line_to_fit_width`].
///
/// # Errors
///
/// Returns [`TextFlowError::UnsupportedNewline`] if any word contains a
/// line break.
pub fn split_line_to_fit_width<F>(
    line: &[MarkdownWord],
    fits: F,
) -> Result<Vec<MarkdownLine>, TextFlowError>
where
    F: Fn(&[MarkdownWord]) -> bool,
{
    TextFlow::new(UnicodeSegmenter).split_line_to_fit_width(line, fits)
}

/// Splits a word using the default Unicode segmentation.
///
/// See [`TextFlow::split_word_to_fit_width`].
pub fn split_word_to_fit_width<F>(fits: F, word: &MarkdownWord) -> (MarkdownWord, MarkdownWord)
where
    F: Fn(&[MarkdownWord]) -> bool,
{
    TextFlow::new(UnicodeSegmenter).split_word_to_fit_width(fits, word)
}

/// A fit predicate accepting lines at most `max_columns` display columns wide.
///
/// Width is measured with East Asian width rules, so wide characters count
/// as two columns.
pub fn fits_columns(max_columns: usize) -> impl Fn(&[MarkdownWord]) -> bool + Copy {
    move |line: &[MarkdownWord]| {
        line.iter()
            .map(|word| UnicodeWidthStr::width(word.content.as_str()))
            .sum::<usize>()
            <= max_columns
    }
}
