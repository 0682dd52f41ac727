//! Configuration types for Marlin diagram processing.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! a partial configuration file only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and parser settings.
//! - [`LayoutConfig`] - Label width and segmentation strategy.
//! - [`ParserConfig`] - Optionally forces a diagram kind instead of detecting it.
//!
//! # Example
//!
//! ```
//! # use marlin::config::{AppConfig, Segmentation};
//! let config = AppConfig::default();
//! assert_eq!(config.layout().max_width(), 40);
//! assert_eq!(config.layout().segmentation(), Segmentation::Unicode);
//! assert!(config.parser().kind().is_none());
//! ```

use serde::Deserialize;

use marlin_core::kind::DiagramKind;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Parser configuration section.
    #[serde(default)]
    parser: ParserConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    ///
    /// # Arguments
    ///
    /// * `layout` - Label layout settings.
    /// * `parser` - Parser dispatch settings.
    pub fn new(layout: LayoutConfig, parser: ParserConfig) -> Self {
        Self { layout, parser }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the parser configuration.
    pub fn parser(&self) -> &ParserConfig {
        &self.parser
    }
}

/// How label text is split into graphemes and words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segmentation {
    /// Unicode grapheme cluster and word boundaries.
    #[default]
    Unicode,
    /// Code points and single spaces.
    Fallback,
}

/// Label layout configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Widest label line, in display columns.
    #[serde(default = "default_max_width")]
    max_width: usize,

    /// Segmentation strategy for labels.
    #[serde(default)]
    segmentation: Segmentation,
}

fn default_max_width() -> usize {
    40
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            segmentation: Segmentation::default(),
        }
    }
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    ///
    /// # Arguments
    ///
    /// * `max_width` - Widest label line, in display columns.
    /// * `segmentation` - Segmentation strategy for labels.
    pub fn new(max_width: usize, segmentation: Segmentation) -> Self {
        Self {
            max_width,
            segmentation,
        }
    }

    /// Returns the widest label line, in display columns.
    pub fn max_width(&self) -> usize {
        self.max_width
    }

    /// Returns the segmentation strategy.
    pub fn segmentation(&self) -> Segmentation {
        self.segmentation
    }
}

/// Parser dispatch configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParserConfig {
    /// Kind used for every input instead of detecting it.
    #[serde(default)]
    kind: Option<DiagramKind>,
}

impl ParserConfig {
    /// Creates a new [`ParserConfig`] forcing `kind`, if any.
    pub fn new(kind: Option<DiagramKind>) -> Self {
        Self { kind }
    }

    /// Returns the forced diagram kind, if any.
    pub fn kind(&self) -> Option<DiagramKind> {
        self.kind
    }
}
