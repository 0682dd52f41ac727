//! Token kinds shared by every diagram grammar.
//!
//! Grammars do not define their own token types. Each one selects an ordered
//! subset of [`TokenKind`]s through a [`TokenSet`](crate::lexer::TokenSet),
//! and the lexer tags every matched slice with the kind of the rule that
//! matched it.

use std::fmt;

use crate::span::Span;

/// Reserved words recognized by at least one grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Info,
    ShowInfo,
    Pie,
    ShowData,
    PacketBeta,
    Packet,
    SankeyBeta,
    Sankey,
    Timeline,
    Section,
    ArchitectureBeta,
    Architecture,
    Group,
    Service,
    Junction,
    In,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Info => "info",
            Keyword::ShowInfo => "showInfo",
            Keyword::Pie => "pie",
            Keyword::ShowData => "showData",
            Keyword::PacketBeta => "packet-beta",
            Keyword::Packet => "packet",
            Keyword::SankeyBeta => "sankey-beta",
            Keyword::Sankey => "sankey",
            Keyword::Timeline => "timeline",
            Keyword::Section => "section",
            Keyword::ArchitectureBeta => "architecture-beta",
            Keyword::Architecture => "architecture",
            Keyword::Group => "group",
            Keyword::Service => "service",
            Keyword::Junction => "junction",
            Keyword::In => "in",
        }
    }
}

/// Punctuation recognized by at least one grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Colon,
    Comma,
    Minus,
    DoubleMinus,
    Plus,
    LeftAngle,
    RightAngle,
    /// The `{group}` edge modifier.
    GroupModifier,
}

impl Symbol {
    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::Colon => ":",
            Symbol::Comma => ",",
            Symbol::Minus => "-",
            Symbol::DoubleMinus => "--",
            Symbol::Plus => "+",
            Symbol::LeftAngle => "<",
            Symbol::RightAngle => ">",
            Symbol::GroupModifier => "{group}",
        }
    }
}

/// The category of a lexed slice of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Hidden kinds, consumed by the lexer and never handed to a grammar
    Whitespace,
    LineComment,
    BlockComment,
    Directive,

    Newline,
    Keyword(Keyword),
    Symbol(Symbol),
    Identifier,
    Number,
    String,

    // Shared title and accessibility statements
    Title,
    AccTitle,
    AccDescr,

    // sankey
    SankeyNode,
    SankeyValue,

    // timeline
    SectionTitle,
    PeriodTitle,
    PeriodEvent,

    // architecture
    ArchIcon,
    ArchTextIcon,
    ArchTitle,

    /// Text no rule could match.
    Invalid,
}

impl TokenKind {
    /// Returns `true` for kinds the lexer drops from the token stream.
    pub fn is_hidden(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::Directive
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Whitespace => write!(f, "whitespace"),
            TokenKind::LineComment => write!(f, "line comment"),
            TokenKind::BlockComment => write!(f, "block comment"),
            TokenKind::Directive => write!(f, "directive"),
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::Keyword(keyword) => write!(f, "`{}`", keyword.as_str()),
            TokenKind::Symbol(symbol) => write!(f, "`{}`", symbol.as_str()),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::String => write!(f, "string"),
            TokenKind::Title => write!(f, "title"),
            TokenKind::AccTitle => write!(f, "accessible title"),
            TokenKind::AccDescr => write!(f, "accessible description"),
            TokenKind::SankeyNode => write!(f, "node"),
            TokenKind::SankeyValue => write!(f, "flow value"),
            TokenKind::SectionTitle => write!(f, "section"),
            TokenKind::PeriodTitle => write!(f, "period"),
            TokenKind::PeriodEvent => write!(f, "event"),
            TokenKind::ArchIcon => write!(f, "icon"),
            TokenKind::ArchTextIcon => write!(f, "text icon"),
            TokenKind::ArchTitle => write!(f, "title"),
            TokenKind::Invalid => write!(f, "invalid text"),
        }
    }
}

/// A lexed slice of the source together with its kind and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(kind: TokenKind, text: &'src str, span: Span) -> Self {
        Self { kind, text, span }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Newline => write!(f, "newline"),
            _ => write!(f, "`{}`", self.text),
        }
    }
}
