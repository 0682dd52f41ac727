//! The core diagnostic type.
//!
//! Every diagnostic is an error: a parse that reports one never yields a
//! tree. Whether it came from the lexer or a grammar follows from its
//! [`ErrorCode`].

use std::fmt;

use crate::{error::ErrorCode, span::Span};

/// A message pinned to a span of the diagram source.
///
/// `primary` marks the offending text; other labels point at related text,
/// such as the start of a reversed packet range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub primary: bool,
}

/// A single lexer or parser error with source locations.
///
/// ```text
/// error[E103]: invalid range: block ends at bit 3 before it starts at bit 8
///   --> packet.mmd:2:1
///    |
///  2 | 8-3: "Flags"
///    | ^^^ ends before it starts
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic with no code, labels or help.
    ///
    /// ```
    /// # use marlin_parser::error::{Diagnostic, ErrorCode};
    /// # use marlin_parser::Span;
    /// let diag = Diagnostic::error("unexpected characters `#`")
    ///     .with_code(ErrorCode::E001)
    ///     .with_label(Span::new(16..17), "not recognized here");
    /// assert!(diag.is_lexical());
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// The message, without the `error[code]` prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// `true` when the code belongs to the lexer (`E0xx`).
    pub fn is_lexical(&self) -> bool {
        self.code.is_some_and(|code| code.is_lexical())
    }

    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.primary)
            .map(|label| label.span)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_label(self, span: Span, message: impl Into<String>) -> Self {
        self.labelled(span, message, true)
    }

    pub fn with_secondary_label(self, span: Span, message: impl Into<String>) -> Self {
        self.labelled(span, message, false)
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn labelled(mut self, span: Span, message: impl Into<String>, primary: bool) -> Self {
        self.labels.push(Label {
            span,
            message: message.into(),
            primary,
        });
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "error[{code}]: {}", self.message),
            None => write!(f, "error: {}", self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}
