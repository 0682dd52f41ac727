//! # Marlin Parser
//!
//! Lexers and grammars for Marlin's text diagrams. Each supported
//! [`DiagramKind`](marlin_core::kind::DiagramKind) has a grammar producing a
//! typed syntax tree; the [`Registry`] dispatches source text to the right
//! one.
//!
//! ## Usage
//!
//! ```
//! # use marlin_core::kind::DiagramKind;
//! # use marlin_parser::{parse, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "pie title Pets\n\"Dogs\": 386\n\"Cats\": 85\n";
//!
//!     let diagram = parse(DiagramKind::Pie, source)?;
//!     assert_eq!(diagram.labels(), ["Pets", "Dogs", "Cats"]);
//!     Ok(())
//! }
//! ```
//!
//! When the kind is not known up front, [`detect`] reads it from the
//! leading keyword.

pub mod ast;
pub mod converter;
pub mod error;
pub mod grammar;
pub mod lexer;
mod parser;
pub mod registry;
mod span;
pub mod tokens;

pub use ast::Diagram;
pub use parser::{Context, DiagramParser, Grammar, IResult, Input, ParseContext, ParseResult};
pub use registry::{ParserInstance, Registry, detect};
pub use span::{Span, Spanned};

use marlin_core::kind::DiagramKind;

use error::{DispatchError, ParseError};

/// Parse `text` as a diagram of `kind` with the global [`Registry`].
///
/// Any lexer or parser error fails the whole parse; the returned
/// [`ParseError`] carries every diagnostic, lexer diagnostics first.
///
/// # Example
///
/// ```
/// # use marlin_core::kind::DiagramKind;
/// # use marlin_parser::parse;
///
/// let err = parse(DiagramKind::Info, "info\n  bad syntax").unwrap_err();
/// assert_eq!(err.lexer_errors().len(), 2);
/// ```
pub fn parse(kind: DiagramKind, text: &str) -> Result<Diagram, ParseError> {
    Registry::global().parse(kind, text)
}

/// Parse `text` with the grammar registered under `tag` (e.g. `"sankey"`).
pub fn parse_named(tag: &str, text: &str) -> Result<Diagram, DispatchError> {
    Registry::global().parse_named(tag, text)
}
