//! Lazily constructed parser instances, one per diagram kind.
//!
//! A [`Registry`] builds the parser for a kind on first use and hands out the
//! same instance afterwards. Construction is guarded by a [`OnceLock`], so
//! concurrent first requests build exactly one instance and later reads take
//! no lock.

use std::sync::OnceLock;

use log::{debug, trace};

use marlin_core::kind::DiagramKind;

use crate::{
    ast::Diagram,
    error::{DispatchError, ParseError},
    grammar::{
        ArchitectureGrammar, InfoGrammar, PacketGrammar, PieGrammar, SankeyGrammar,
        TimelineGrammar,
    },
    parser::{DiagramParser, Grammar, ParseResult},
};

/// A parser for one diagram kind, producing the unified [`Diagram`] tree.
pub trait ParserInstance: Send + Sync {
    fn kind(&self) -> DiagramKind;

    fn parse(&self, text: &str) -> ParseResult<Diagram>;
}

impl<G: Grammar> ParserInstance for DiagramParser<G> {
    fn kind(&self) -> DiagramKind {
        DiagramParser::kind(self)
    }

    fn parse(&self, text: &str) -> ParseResult<Diagram> {
        DiagramParser::parse(self, text).map(Into::into)
    }
}

fn build(kind: DiagramKind) -> Box<dyn ParserInstance> {
    debug!(kind = kind.as_str(); "Registering parser");
    match kind {
        DiagramKind::Info => Box::new(DiagramParser::new(InfoGrammar::default())),
        DiagramKind::Pie => Box::new(DiagramParser::new(PieGrammar::default())),
        DiagramKind::Packet => Box::new(DiagramParser::new(PacketGrammar::default())),
        DiagramKind::Sankey => Box::new(DiagramParser::new(SankeyGrammar::default())),
        DiagramKind::Timeline => Box::new(DiagramParser::new(TimelineGrammar::default())),
        DiagramKind::Architecture => {
            Box::new(DiagramParser::new(ArchitectureGrammar::default()))
        }
    }
}

/// Parser instances keyed by [`DiagramKind`].
pub struct Registry {
    parsers: [OnceLock<Box<dyn ParserInstance>>; DiagramKind::COUNT],
}

impl Registry {
    /// Creates a registry with no parser built yet.
    pub const fn new() -> Self {
        Self {
            parsers: [const { OnceLock::new() }; DiagramKind::COUNT],
        }
    }

    /// The process-wide registry behind [`crate::parse`].
    pub fn global() -> &'static Registry {
        static GLOBAL: Registry = Registry::new();
        &GLOBAL
    }

    /// Returns the parser for `kind`, building it on first use.
    pub fn parser(&self, kind: DiagramKind) -> &dyn ParserInstance {
        &**self.parsers[kind.index()].get_or_init(|| build(kind))
    }

    /// Parses `text` as a diagram of `kind`.
    ///
    /// Fails if any lexer or parser error was reported.
    pub fn parse(&self, kind: DiagramKind, text: &str) -> Result<Diagram, ParseError> {
        self.parser(kind).parse(text).into_result()
    }

    /// Parses `text` with the grammar registered under `tag`.
    pub fn parse_named(&self, tag: &str, text: &str) -> Result<Diagram, DispatchError> {
        let kind: DiagramKind = tag
            .parse()
            .map_err(|_| DispatchError::UnknownKind(tag.to_string()))?;
        Ok(self.parse(kind, text)?)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Detects the kind of a diagram from its leading keyword.
///
/// Leading whitespace, blank lines, `%%` comments and `%%{...}%%` directives
/// are skipped. The first kind with a keyword prefixing the remaining text
/// wins.
pub fn detect(text: &str) -> Option<DiagramKind> {
    let rest = skip_preamble(text);
    let kind = DiagramKind::ALL
        .into_iter()
        .find(|kind| kind.keywords().iter().any(|keyword| rest.starts_with(keyword)));
    trace!(kind:? = kind; "Detected diagram kind");
    kind
}

fn skip_preamble(mut text: &str) -> &str {
    loop {
        text = text.trim_start();
        let closed = if text.starts_with("%%{") {
            text.find("}%%").map(|end| end + "}%%".len())
        } else if text.starts_with("%%*") {
            text.find("*%%").map(|end| end + "*%%".len())
        } else {
            None
        };
        text = match closed {
            Some(end) => &text[end..],
            None if text.starts_with("%%") => text.find('\n').map_or("", |end| &text[end..]),
            None => return text,
        };
    }
}
