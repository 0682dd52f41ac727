//! Styled words and lines.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Style tag carried by a [`MarkdownWord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkdownWordType {
    #[default]
    Normal,
    Strong,
    #[serde(rename = "em")]
    Emphasis,
}

/// A single styled word.
///
/// Content never contains a line break when handed to the layout engine.
/// A word whose content is exactly `" "` is a joiner between two words.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MarkdownWord {
    pub content: String,
    #[serde(rename = "type")]
    pub word_type: MarkdownWordType,
}

/// An ordered sequence of words laid out on one line.
pub type MarkdownLine = Vec<MarkdownWord>;

impl MarkdownWord {
    /// Creates a word with the given content and style.
    pub fn new(content: impl Into<String>, word_type: MarkdownWordType) -> Self {
        Self {
            content: content.into(),
            word_type,
        }
    }

    /// The single-space joiner placed between words on the same line.
    pub fn joiner() -> Self {
        Self::new(" ", MarkdownWordType::Normal)
    }

    /// Returns `true` if this word is a joiner.
    pub fn is_joiner(&self) -> bool {
        self.content == " "
    }
}

impl fmt::Display for MarkdownWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

/// Concatenates the content of every word in `line`.
pub fn line_text(line: &[MarkdownWord]) -> String {
    line.iter().map(|word| word.content.as_str()).collect()
}
