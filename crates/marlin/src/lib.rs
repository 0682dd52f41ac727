//! Marlin - parsing and label layout for Mermaid-style text diagrams.
//!
//! [`DiagramBuilder`] is the entry point: it detects the kind of a diagram,
//! parses it into a typed syntax tree and wraps its labels to the configured
//! width.

pub mod config;

mod error;

pub use marlin_core::{kind, text_flow};
pub use marlin_parser::{Diagram, ast};

pub use error::MarlinError;

use log::{debug, info, trace};

use marlin_core::{
    kind::DiagramKind,
    text_flow::{
        FallbackSegmenter, MarkdownWordType, Segmenter, TextFlow, UnicodeSegmenter, fits_columns,
        line_text,
    },
};
use marlin_parser::error::DispatchError;

use config::{AppConfig, Segmentation};

/// Builder for parsing Marlin diagrams and laying out their labels.
///
/// # Examples
///
/// ```rust
/// use marlin::{DiagramBuilder, config::AppConfig, kind::DiagramKind};
///
/// let source = "pie title Pets\n\"Dogs\": 386\n\"Cats\": 85\n";
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// // Detect the kind and parse
/// let diagram = builder.parse(source).expect("Failed to parse");
/// assert_eq!(diagram.kind(), DiagramKind::Pie);
///
/// // Wrap a label to the configured width
/// let lines = builder.wrap_label("Pets adopted by volunteers").expect("Failed to wrap");
/// assert_eq!(lines, ["Pets adopted by volunteers"]);
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including layout and parser settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration of this builder.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source text into a syntax tree.
    ///
    /// The diagram kind comes from the parser configuration if set, and is
    /// otherwise detected from the leading keyword of `source`.
    ///
    /// # Errors
    ///
    /// Returns `MarlinError::Dispatch` if no kind can be determined and
    /// `MarlinError::Parse` for lexer or syntax errors.
    pub fn parse(&self, source: &str) -> Result<Diagram, MarlinError> {
        let kind = match self.config.parser().kind() {
            Some(kind) => kind,
            None => marlin_parser::detect(source).ok_or_else(|| {
                let tag = source.split_whitespace().next().unwrap_or_default();
                MarlinError::Dispatch(DispatchError::UnknownKind(tag.to_string()))
            })?,
        };
        self.parse_as(kind, source)
    }

    /// Parse source text as a diagram of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `MarlinError::Parse` for lexer or syntax errors.
    pub fn parse_as(&self, kind: DiagramKind, source: &str) -> Result<Diagram, MarlinError> {
        info!(kind = kind.as_str(); "Parsing diagram");

        let diagram = marlin_parser::parse(kind, source)
            .map_err(|err| MarlinError::new_parse_error(err, source))?;

        debug!("Diagram parsed successfully");
        trace!(diagram:?; "Parsed diagram");

        Ok(diagram)
    }

    /// Parse source text with the grammar registered under `tag`.
    ///
    /// # Errors
    ///
    /// Returns `MarlinError::Dispatch` for an unknown tag and
    /// `MarlinError::Parse` for lexer or syntax errors.
    pub fn parse_named(&self, tag: &str, source: &str) -> Result<Diagram, MarlinError> {
        info!(tag; "Parsing diagram");
        marlin_parser::parse_named(tag, source)
            .map_err(|err| MarlinError::from_dispatch(err, source))
    }

    /// Wrap a label to the configured width.
    ///
    /// Line breaks in `text` are kept; each line is wrapped on its own.
    ///
    /// # Errors
    ///
    /// Returns `MarlinError::Layout` if the layout engine rejects a line.
    pub fn wrap_label(&self, text: &str) -> Result<Vec<String>, MarlinError> {
        let layout = self.config.layout();
        match layout.segmentation() {
            Segmentation::Unicode => {
                wrap(&TextFlow::new(UnicodeSegmenter), text, layout.max_width())
            }
            Segmentation::Fallback => {
                wrap(&TextFlow::new(FallbackSegmenter), text, layout.max_width())
            }
        }
    }

    /// Wrap every label of `diagram`, in document order.
    ///
    /// # Errors
    ///
    /// Returns `MarlinError::Layout` if the layout engine rejects a line.
    pub fn wrap_labels(&self, diagram: &Diagram) -> Result<Vec<Vec<String>>, MarlinError> {
        let labels = diagram.labels();
        debug!(labels = labels.len(); "Wrapping labels");
        labels.into_iter().map(|label| self.wrap_label(label)).collect()
    }
}

fn wrap<S: Segmenter>(
    flow: &TextFlow<S>,
    text: &str,
    max_width: usize,
) -> Result<Vec<String>, MarlinError> {
    let mut wrapped = Vec::new();
    for line in text.lines() {
        let words = flow.line_from_text(line, MarkdownWordType::Normal);
        let lines = flow.split_line_to_fit_width(&words, fits_columns(max_width))?;
        if lines.is_empty() {
            wrapped.push(String::new());
        }
        wrapped.extend(lines.iter().map(|line| line_text(line)));
    }
    Ok(wrapped)
}
