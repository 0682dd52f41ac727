//! Winnow machinery shared by the diagram grammars.
//!
//! A grammar is a [`Grammar`] implementation: a token builder, a value
//! converter, production rules written as winnow parsers over the token
//! slice, and an optional post-processing pass. [`DiagramParser`] binds one
//! grammar to its compiled [`TokenSet`] and runs lexing, parsing and
//! post-processing for each call, returning a [`ParseResult`].
//!
//! Statements are parsed one at a time through [`ParseContext::statements`].
//! A failing statement is recorded as a diagnostic and parsing resumes after
//! the next newline, so one pass reports every broken line.

use log::{debug, trace};
use winnow::{
    Parser as _,
    combinator::{alt, eof, repeat},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use marlin_core::kind::DiagramKind;

use crate::{
    ast::SyntaxTree,
    converter::{Value, ValueConverter},
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    lexer::{LexOutput, Lexer, TokenBuilder, TokenSet},
    span::{Span, Spanned},
    tokens::{Keyword, PositionedToken, Symbol, TokenKind},
};

/// Context attached to grammar errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// A token of the right kind whose value could not be converted
    Invalid(Diagnostic),
}

/// The token stream a grammar parses.
pub type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
pub type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// A diagram grammar.
pub trait Grammar: Send + Sync {
    type Ast: SyntaxTree;
    type Tokens: TokenBuilder;
    type Converter: ValueConverter;

    fn tokens(&self) -> &Self::Tokens;

    fn converter(&self) -> &Self::Converter;

    /// Parses the whole token stream.
    ///
    /// Returns `None` when no tree could be built at all, for instance when
    /// the header is missing. Problems are reported through `cx`.
    fn rules(&self, input: &mut Input<'_>, cx: &mut ParseContext<'_>) -> Option<Self::Ast>;

    /// Derives values from a successfully parsed tree.
    ///
    /// Runs once, only when parsing reported no errors. Must be idempotent.
    fn post_process(&self, _ast: &mut Self::Ast) {}
}

/// Output of one parse: the tree, if any, and every diagnostic.
#[derive(Debug, Clone)]
pub struct ParseResult<T> {
    pub value: Option<T>,
    pub lexer_errors: Vec<Diagnostic>,
    pub parser_errors: Vec<Diagnostic>,
}

impl<T> ParseResult<T> {
    /// Returns `true` if the lexer or the grammar reported anything.
    pub fn has_errors(&self) -> bool {
        !self.lexer_errors.is_empty() || !self.parser_errors.is_empty()
    }

    /// Returns the tree only if no error was reported.
    pub fn into_result(self) -> Result<T, ParseError> {
        let has_errors = self.has_errors();
        match self.value {
            Some(value) if !has_errors => Ok(value),
            _ => Err(
                ParseError::new(self.lexer_errors, self.parser_errors).unwrap_or_else(|| {
                    Diagnostic::error("no syntax tree was produced")
                        .with_code(ErrorCode::E101)
                        .into()
                }),
            ),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<U> {
        ParseResult {
            value: self.value.map(f),
            lexer_errors: self.lexer_errors,
            parser_errors: self.parser_errors,
        }
    }
}

/// A grammar bound to its compiled token rules.
///
/// Holds no per-call state, so one instance serves concurrent parses.
#[derive(Debug)]
pub struct DiagramParser<G> {
    grammar: G,
    tokens: TokenSet,
}

impl<G: Grammar> DiagramParser<G> {
    pub fn new(grammar: G) -> Self {
        let tokens = grammar.tokens().build_tokens();
        debug!(kind = G::Ast::KIND.as_str(), rules = tokens.len(); "Constructed parser");
        Self { grammar, tokens }
    }

    pub fn kind(&self) -> DiagramKind {
        G::Ast::KIND
    }

    pub fn parse(&self, text: &str) -> ParseResult<G::Ast> {
        let LexOutput {
            tokens,
            errors: lexer_errors,
        } = Lexer::tokenize(&self.tokens, text);
        trace!(tokens:?; "Lexed tokens");

        let mut cx = ParseContext::new(self.grammar.converter(), Span::empty(text.len()));
        let mut input: Input<'_> = TokenSlice::new(&tokens);
        let mut value = self.grammar.rules(&mut input, &mut cx);
        let parser_errors = cx.finish();

        if parser_errors.is_empty() {
            if let Some(ast) = value.as_mut() {
                self.grammar.post_process(ast);
            }
        }

        debug!(
            kind = G::Ast::KIND.as_str(),
            lexer_errors = lexer_errors.len(),
            parser_errors = parser_errors.len();
            "Parsed diagram"
        );
        ParseResult {
            value,
            lexer_errors,
            parser_errors,
        }
    }
}

impl<G: Grammar + Default> Default for DiagramParser<G> {
    fn default() -> Self {
        Self::new(G::default())
    }
}

/// Per-call parser state handed to grammar rules.
pub struct ParseContext<'c> {
    converter: &'c dyn ValueConverter,
    eof: Span,
    diagnostics: DiagnosticCollector,
}

impl<'c> ParseContext<'c> {
    fn new(converter: &'c dyn ValueConverter, eof: Span) -> Self {
        Self {
            converter,
            eof,
            diagnostics: DiagnosticCollector::new(),
        }
    }

    pub(crate) fn converter(&self) -> &'c dyn ValueConverter {
        self.converter
    }

    pub(crate) fn error(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.emit(diagnostic);
    }

    pub(crate) fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Span of the end of input.
    pub(crate) fn eof(&self) -> Span {
        self.eof
    }

    fn report(&mut self, error: ErrMode<ContextError<Context>>, input: &Input<'_>) {
        let diagnostic = convert_error(error, input.first(), self.eof);
        self.error(diagnostic);
    }

    /// Parses the diagram header after any leading blank lines.
    pub(crate) fn header<'src, O>(
        &mut self,
        input: &mut Input<'src>,
        mut parser: impl FnMut(&mut Input<'src>) -> IResult<O>,
    ) -> Option<O> {
        let result = newlines0(input).and_then(|()| parser(input));
        match result {
            Ok(header) => Some(header),
            Err(err) => {
                self.report(err, input);
                None
            }
        }
    }

    /// Parses statements until the input is exhausted.
    ///
    /// Blank lines between statements are skipped. A failing statement is
    /// reported and skipped up to and including the next newline.
    pub(crate) fn statements<'src, O>(
        &mut self,
        input: &mut Input<'src>,
        mut statement: impl FnMut(&mut Input<'src>) -> IResult<O>,
    ) -> Vec<O> {
        let mut items = Vec::new();
        loop {
            if newlines0(input).is_err() || input.eof_offset() == 0 {
                break;
            }
            let checkpoint = input.checkpoint();
            match statement(input) {
                Ok(item) => items.push(item),
                Err(err) => {
                    self.report(err, input);
                    input.reset(&checkpoint);
                    skip_line(input);
                }
            }
        }
        items
    }

    fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics.into_diagnostics()
    }
}

/// Helper to create a Cut error carrying a conversion diagnostic
pub(crate) fn invalid(diagnostic: Diagnostic) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    e.push(Context::Invalid(diagnostic));
    ErrMode::Cut(e)
}

/// Helper to create a Backtrack error with a label
pub(crate) fn expected(label: &'static str) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    e.push(Context::Label(label));
    ErrMode::Backtrack(e)
}

/// Consumes tokens through the next newline.
fn skip_line(input: &mut Input<'_>) {
    while let Ok(token) = any::<_, ErrMode<ContextError<Context>>>.parse_next(input) {
        if token.kind == TokenKind::Newline {
            break;
        }
    }
}

/// Kind of the next token, if any.
pub(crate) fn peek_kind(input: &Input<'_>) -> Option<TokenKind> {
    input.first().map(|token| token.kind)
}

/// Parse one token of `kind`
pub(crate) fn token<'src>(
    kind: TokenKind,
    label: &'static str,
) -> impl FnMut(&mut Input<'src>) -> IResult<&'src PositionedToken<'src>> {
    move |input: &mut Input<'src>| {
        any.verify(|token: &PositionedToken<'_>| token.kind == kind)
            .context(Context::Label(label))
            .parse_next(input)
    }
}

pub(crate) fn keyword<'src>(
    keyword: Keyword,
) -> impl FnMut(&mut Input<'src>) -> IResult<&'src PositionedToken<'src>> {
    token(TokenKind::Keyword(keyword), keyword.as_str())
}

pub(crate) fn symbol<'src>(
    symbol: Symbol,
) -> impl FnMut(&mut Input<'src>) -> IResult<&'src PositionedToken<'src>> {
    token(TokenKind::Symbol(symbol), symbol.as_str())
}

/// Parse the first matching keyword of `keywords`
pub(crate) fn one_of_keywords<'src>(
    input: &mut Input<'src>,
    keywords: &[Keyword],
    label: &'static str,
) -> IResult<Keyword> {
    any.verify_map(|token: &PositionedToken<'_>| match token.kind {
        TokenKind::Keyword(keyword) if keywords.contains(&keyword) => Some(keyword),
        _ => None,
    })
    .context(Context::Label(label))
    .parse_next(input)
}

fn newline<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.kind == TokenKind::Newline)
        .void()
        .parse_next(input)
}

/// Parse zero or more newlines
pub(crate) fn newlines0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., newline).parse_next(input)
}

/// Parse one or more newlines
pub(crate) fn newlines1<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(1.., newline).parse_next(input)
}

/// End of a statement: newlines or the end of input
pub(crate) fn eol<'src>(input: &mut Input<'src>) -> IResult<()> {
    alt((newlines1, eof.void()))
        .context(Context::Label("end of line"))
        .parse_next(input)
}

/// Parse one token of `kind` and convert its value
pub(crate) fn value<'src>(
    input: &mut Input<'src>,
    converter: &dyn ValueConverter,
    kind: TokenKind,
    label: &'static str,
) -> IResult<Spanned<Value>> {
    let checkpoint = input.checkpoint();
    let token = token(kind, label).parse_next(input)?;
    match converter.convert(token) {
        Ok(value) => Ok(Spanned::new(value, token.span)),
        Err(diagnostic) => {
            input.reset(&checkpoint);
            Err(invalid(diagnostic))
        }
    }
}

/// Parse one token of `kind` as text
pub(crate) fn text<'src>(
    input: &mut Input<'src>,
    converter: &dyn ValueConverter,
    kind: TokenKind,
    label: &'static str,
) -> IResult<Spanned<String>> {
    let value = value(input, converter, kind, label)?;
    let span = value.span();
    Ok(match value.into_inner() {
        Value::Text(text) => Spanned::new(text, span),
        Value::Number(number) => Spanned::new(number.to_string(), span),
    })
}

/// Parse one token of `kind` as a number
pub(crate) fn number<'src>(
    input: &mut Input<'src>,
    converter: &dyn ValueConverter,
    kind: TokenKind,
    label: &'static str,
) -> IResult<Spanned<f64>> {
    let value = value(input, converter, kind, label)?;
    let span = value.span();
    match value.into_inner() {
        Value::Number(number) => Ok(Spanned::new(number, span)),
        Value::Text(text) => Err(invalid(
            Diagnostic::error(format!("invalid value `{text}`: not a number"))
                .with_code(ErrorCode::E102)
                .with_label(span, "expected a number"),
        )),
    }
}

/// Converts a winnow error at `at` (`None` at end of input) into a diagnostic.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    at: Option<&PositionedToken<'_>>,
    eof: Span,
) -> Diagnostic {
    let error = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        // Token slices are never partial input
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    if let Some(diagnostic) = error.context().find_map(|ctx| match ctx {
        Context::Invalid(diagnostic) => Some(diagnostic.clone()),
        Context::Label(_) => None,
    }) {
        return diagnostic;
    }

    let contexts: Vec<String> = error
        .context()
        .filter_map(|ctx| match ctx {
            Context::Label(label) => Some(format!("expected {label}")),
            Context::Invalid(_) => None,
        })
        .collect();
    let expected = if contexts.is_empty() {
        "expected a statement".to_string()
    } else {
        contexts.join(" → ")
    };

    match at {
        Some(token) if token.kind == TokenKind::Newline => {
            Diagnostic::error(format!("unexpected end of line: {expected}"))
                .with_code(ErrorCode::E100)
                .with_label(token.span, "statement ends here")
                .with_help("complete the statement before the line break")
        }
        Some(token) => Diagnostic::error(format!("unexpected token {token}: {expected}"))
            .with_code(ErrorCode::E100)
            .with_label(token.span, "unexpected token")
            .with_help("check the statement syntax of this diagram kind"),
        None => Diagnostic::error(format!("unexpected end of input: {expected}"))
            .with_code(ErrorCode::E101)
            .with_label(eof, "input ends here")
            .with_help("complete the statement"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, text: &str, start: usize) -> PositionedToken<'_> {
        PositionedToken::new(kind, text, Span::new(start..start + text.len()))
    }

    #[test]
    fn test_convert_error_labels_are_joined() {
        let mut e = ContextError::new();
        e.push(Context::Label("identifier"));
        e.push(Context::Label("group"));
        let at = tok(TokenKind::Symbol(Symbol::Colon), ":", 6);

        let diag = convert_error(ErrMode::Backtrack(e), Some(&at), Span::empty(10));
        assert_eq!(
            diag.message(),
            "unexpected token `:`: expected identifier → expected group"
        );
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.primary_span(), Some(Span::new(6..7)));
    }

    #[test]
    fn test_convert_error_at_end_of_input() {
        let diag = convert_error(expected("identifier"), None, Span::empty(22));
        assert_eq!(diag.message(), "unexpected end of input: expected identifier");
        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert_eq!(diag.primary_span(), Some(Span::empty(22)));
    }

    #[test]
    fn test_convert_error_prefers_conversion_diagnostic() {
        let conversion = Diagnostic::error("invalid value `1.5`").with_code(ErrorCode::E102);
        let diag = convert_error(invalid(conversion.clone()), None, Span::empty(0));
        assert_eq!(diag, conversion);
    }

    #[test]
    fn test_into_result_is_fail_fast() {
        let result = ParseResult {
            value: Some(1),
            lexer_errors: Vec::new(),
            parser_errors: vec![Diagnostic::error("broken")],
        };
        assert!(result.has_errors());
        let err = result.into_result().unwrap_err();
        assert_eq!(err.message(), "broken");
    }

    #[test]
    fn test_into_result_fails_on_lexer_errors_alone() {
        let lexer_error = Diagnostic::error("unexpected characters `#`").with_code(ErrorCode::E001);
        let result = ParseResult {
            value: Some(1),
            lexer_errors: vec![lexer_error],
            parser_errors: Vec::new(),
        };
        assert!(result.has_errors());
        let err = result.into_result().unwrap_err();
        assert_eq!(err.lexer_errors().len(), 1);
        assert!(err.parser_errors().is_empty());
    }

    #[test]
    fn test_into_result_without_value_or_errors() {
        let result: ParseResult<u8> = ParseResult {
            value: None,
            lexer_errors: Vec::new(),
            parser_errors: Vec::new(),
        };
        assert_eq!(result.into_result().unwrap_err().parser_errors().len(), 1);
    }
}
