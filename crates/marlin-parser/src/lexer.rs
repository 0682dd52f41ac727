//! Lexical analyzer shared by every diagram grammar.
//!
//! A grammar describes its tokens as an ordered [`TokenSet`]: a list of
//! [`TokenRule`]s, each pairing a [`TokenKind`] with a [`PatternMatcher`].
//! Every set starts with the common hidden rules (directives, comments,
//! whitespace and newlines), so grammars only list their distinguishing
//! tokens. At each position the first rule that matches wins.
//!
//! The public entry point is [`Lexer::tokenize`], which never aborts: text
//! no rule recognizes is reported as a diagnostic and handed on as an
//! [`TokenKind::Invalid`] token, so the grammar reports it as well.

pub mod matchers;

use std::fmt;

use log::{debug, trace};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    span::Span,
    tokens::{Keyword, PositionedToken, Symbol, TokenKind},
};

/// Recognizes one token shape anchored at a byte offset.
pub trait PatternMatcher: Send + Sync {
    /// Returns the exclusive end of the match starting exactly at `offset`.
    ///
    /// Never skips ahead. A zero-length match is reported as `None`.
    fn match_at(&self, text: &str, offset: usize) -> Option<usize>;
}

impl<F> PatternMatcher for F
where
    F: Fn(&str, usize) -> Option<usize> + Send + Sync,
{
    fn match_at(&self, text: &str, offset: usize) -> Option<usize> {
        self(text, offset)
    }
}

/// A token kind paired with the matcher that recognizes it.
pub struct TokenRule {
    kind: TokenKind,
    matcher: Box<dyn PatternMatcher>,
}

impl TokenRule {
    pub fn new(kind: TokenKind, matcher: impl PatternMatcher + 'static) -> Self {
        Self {
            kind,
            matcher: Box::new(matcher),
        }
    }

    /// A reserved word that must not run into a following word character.
    pub fn keyword(keyword: Keyword) -> Self {
        Self::new(
            TokenKind::Keyword(keyword),
            matchers::keyword(keyword.as_str()),
        )
    }

    pub fn symbol(symbol: Symbol) -> Self {
        Self::new(TokenKind::Symbol(symbol), matchers::literal(symbol.as_str()))
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    fn match_at(&self, text: &str, offset: usize) -> Option<usize> {
        self.matcher
            .match_at(text, offset)
            .filter(|&end| end > offset && text.is_char_boundary(end))
    }
}

impl fmt::Debug for TokenRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRule")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// An ordered list of token rules.
#[derive(Debug)]
pub struct TokenSet {
    rules: Vec<TokenRule>,
}

impl TokenSet {
    /// The rules every grammar starts from.
    ///
    /// Order: directive, block comment, line comment, whitespace, newline.
    pub fn common_hidden() -> Self {
        Self {
            rules: vec![
                TokenRule::new(TokenKind::Directive, matchers::directive()),
                TokenRule::new(TokenKind::BlockComment, matchers::block_comment()),
                TokenRule::new(TokenKind::LineComment, matchers::line_comment()),
                TokenRule::new(TokenKind::Whitespace, matchers::whitespace()),
                TokenRule::new(TokenKind::Newline, matchers::newline()),
            ],
        }
    }

    /// Appends one rule.
    pub fn rule(mut self, rule: TokenRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends one rule per keyword, in the given order.
    pub fn keywords(mut self, keywords: &[Keyword]) -> Self {
        self.rules
            .extend(keywords.iter().copied().map(TokenRule::keyword));
        self
    }

    /// Appends one rule per symbol, longest literal first.
    pub fn symbols(mut self, symbols: &[Symbol]) -> Self {
        let mut symbols = symbols.to_vec();
        symbols.sort_by_key(|symbol| std::cmp::Reverse(symbol.as_str().len()));
        self.rules.extend(symbols.into_iter().map(TokenRule::symbol));
        self
    }

    /// Appends the `accDescr`, `accTitle` and `title` statement rules.
    pub fn title_and_accessibilities(self) -> Self {
        self.rule(TokenRule::new(TokenKind::AccDescr, matchers::acc_descr()))
            .rule(TokenRule::new(TokenKind::AccTitle, matchers::acc_title()))
            .rule(TokenRule::new(TokenKind::Title, matchers::title()))
    }

    pub(crate) fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns the kind and end of the first rule matching at `offset`.
    pub fn match_at(&self, text: &str, offset: usize) -> Option<(TokenKind, usize)> {
        self.rules
            .iter()
            .find_map(|rule| rule.match_at(text, offset).map(|end| (rule.kind(), end)))
    }
}

/// Supplies the token rules of one grammar.
pub trait TokenBuilder: Send + Sync {
    fn build_tokens(&self) -> TokenSet;
}

/// Visible tokens and lexer diagnostics of one input.
#[derive(Debug)]
pub struct LexOutput<'src> {
    pub tokens: Vec<PositionedToken<'src>>,
    pub errors: Vec<Diagnostic>,
}

/// Per-call lexer state.
pub struct Lexer<'set, 'src> {
    set: &'set TokenSet,
    text: &'src str,
    tokens: Vec<PositionedToken<'src>>,
    diagnostics: DiagnosticCollector,
}

impl<'set, 'src> Lexer<'set, 'src> {
    /// Splits `text` into tokens using the rules of `set`.
    pub fn tokenize(set: &'set TokenSet, text: &'src str) -> LexOutput<'src> {
        let mut lexer = Self {
            set,
            text,
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        };
        lexer.run();
        lexer.finish()
    }

    fn run(&mut self) {
        let mut offset = 0;
        while offset < self.text.len() {
            offset = match self.set.match_at(self.text, offset) {
                Some((kind, end)) => {
                    if !kind.is_hidden() {
                        self.push(kind, offset, end);
                    }
                    end
                }
                None => self.recover(offset),
            };
        }
    }

    /// Reports the unrecognized run starting at `offset` and skips past it.
    fn recover(&mut self, offset: usize) -> usize {
        let rest = &self.text[offset..];
        let unterminated = rest.starts_with(['"', '\'']);
        let mut end = offset;
        for (index, ch) in rest.char_indices() {
            let at = offset + index;
            if unterminated {
                if ch == '\n' || ch == '\r' {
                    break;
                }
            } else if at > offset
                && (ch.is_whitespace() || self.set.match_at(self.text, at).is_some())
            {
                break;
            }
            end = at + ch.len_utf8();
        }

        let run = &self.text[offset..end];
        let span = Span::new(offset..end);
        let diagnostic = if unterminated {
            Diagnostic::error(format!("unterminated string literal `{run}`"))
                .with_code(ErrorCode::E002)
                .with_label(span, "string is not closed on this line")
        } else {
            let noun = if run.chars().count() == 1 {
                "character"
            } else {
                "characters"
            };
            Diagnostic::error(format!("unexpected {noun} `{run}`"))
                .with_code(ErrorCode::E001)
                .with_label(span, "not recognized here")
        };
        trace!(offset, end; "Lexer recovery");
        self.diagnostics.emit(diagnostic);
        self.push(TokenKind::Invalid, offset, end);
        end
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(PositionedToken::new(
            kind,
            &self.text[start..end],
            Span::new(start..end),
        ));
    }

    fn finish(self) -> LexOutput<'src> {
        debug!(
            tokens = self.tokens.len(),
            errors = self.diagnostics.len();
            "Tokenized input"
        );
        LexOutput {
            tokens: self.tokens,
            errors: self.diagnostics.into_diagnostics(),
        }
    }
}
