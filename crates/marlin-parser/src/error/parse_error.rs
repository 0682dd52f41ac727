//! The aggregated failure of one parse call.

use std::fmt;

use crate::error::Diagnostic;

/// Every lexer and parser diagnostic of a failed parse.
///
/// A `ParseError` always holds at least one diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    lexer_errors: Vec<Diagnostic>,
    parser_errors: Vec<Diagnostic>,
}

impl ParseError {
    /// Builds an error from both diagnostic sequences.
    ///
    /// Returns `None` when both are empty.
    pub fn new(lexer_errors: Vec<Diagnostic>, parser_errors: Vec<Diagnostic>) -> Option<Self> {
        if lexer_errors.is_empty() && parser_errors.is_empty() {
            return None;
        }
        Some(Self {
            lexer_errors,
            parser_errors,
        })
    }

    pub fn lexer_errors(&self) -> &[Diagnostic] {
        &self.lexer_errors
    }

    pub fn parser_errors(&self) -> &[Diagnostic] {
        &self.parser_errors
    }

    /// Iterates lexer diagnostics, then parser diagnostics.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.lexer_errors.iter().chain(&self.parser_errors)
    }

    /// Lexer messages followed by parser messages, one per line.
    pub fn message(&self) -> String {
        self.diagnostics()
            .map(Diagnostic::message)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parsing failed: {}", self.message())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            lexer_errors: Vec::new(),
            parser_errors: vec![diagnostic],
        }
    }
}
