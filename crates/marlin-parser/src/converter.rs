//! Conversion of raw token text into semantic values.
//!
//! Grammars never interpret token text themselves. They ask their
//! [`ValueConverter`] for the [`Value`] of a token, which strips keywords and
//! quotes, trims free text and parses numbers. Grammar converters handle
//! their own token kinds and delegate everything else to
//! [`CommonValueConverter`].

use crate::{
    error::{Diagnostic, ErrorCode},
    tokens::{PositionedToken, TokenKind},
};

/// A normalized token value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
}

/// Rewrites matched token text into its normalized value.
pub trait ValueConverter: Send + Sync {
    fn convert(&self, token: &PositionedToken<'_>) -> Result<Value, Diagnostic>;
}

/// Conversions shared by every grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonValueConverter;

impl ValueConverter for CommonValueConverter {
    fn convert(&self, token: &PositionedToken<'_>) -> Result<Value, Diagnostic> {
        let text = token.text;
        let value = match token.kind {
            TokenKind::Title => Value::Text(text["title".len()..].trim().to_string()),
            TokenKind::AccTitle => Value::Text(after_colon(text).trim().to_string()),
            TokenKind::AccDescr => Value::Text(acc_descr(text)),
            TokenKind::String => Value::Text(unquote(text).to_string()),
            TokenKind::Number => Value::Number(parse_number(token, text)?),
            _ => Value::Text(text.to_string()),
        };
        Ok(value)
    }
}

/// Parses a finite number, reporting `E102` on failure.
pub fn parse_number(token: &PositionedToken<'_>, text: &str) -> Result<f64, Diagnostic> {
    text.parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| {
            Diagnostic::error(format!("invalid value `{}`: not a number", token.text))
                .with_code(ErrorCode::E102)
                .with_label(token.span, "expected a number")
        })
}

fn after_colon(text: &str) -> &str {
    text.split_once(':').map_or("", |(_, rest)| rest)
}

fn unquote(text: &str) -> &str {
    let quoted = text.len() >= 2
        && ((text.starts_with('"') && text.ends_with('"'))
            || (text.starts_with('\'') && text.ends_with('\'')));
    if quoted { &text[1..text.len() - 1] } else { text }
}

fn acc_descr(text: &str) -> String {
    let body = &text["accDescr".len()..];
    let trimmed = body.trim_start();
    if trimmed.starts_with(':') {
        return after_colon(body).trim().to_string();
    }
    trimmed
        .trim_start_matches('{')
        .trim_end_matches('}')
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    fn convert(kind: TokenKind, text: &str) -> Result<Value, Diagnostic> {
        let token = PositionedToken::new(kind, text, Span::new(0..text.len()));
        CommonValueConverter.convert(&token)
    }

    fn text(kind: TokenKind, text: &str) -> String {
        match convert(kind, text).unwrap() {
            Value::Text(text) => text,
            Value::Number(number) => panic!("expected text, got {number}"),
        }
    }

    #[test]
    fn test_title_is_trimmed() {
        assert_eq!(text(TokenKind::Title, "title  Key elements "), "Key elements");
        assert_eq!(text(TokenKind::Title, "title"), "");
    }

    #[test]
    fn test_acc_title() {
        assert_eq!(text(TokenKind::AccTitle, "accTitle : Pets adopted "), "Pets adopted");
    }

    #[test]
    fn test_acc_descr_single_line() {
        assert_eq!(text(TokenKind::AccDescr, "accDescr: A short one"), "A short one");
    }

    #[test]
    fn test_acc_descr_block_trims_each_line() {
        assert_eq!(
            text(TokenKind::AccDescr, "accDescr {\n    first line\n    second line\n}"),
            "first line\nsecond line"
        );
    }

    #[test]
    fn test_string_quotes_stripped() {
        assert_eq!(text(TokenKind::String, "\"Dogs\""), "Dogs");
        assert_eq!(text(TokenKind::String, "'Cats'"), "Cats");
        assert_eq!(text(TokenKind::String, "\"\""), "");
    }

    #[test]
    fn test_number() {
        assert_eq!(convert(TokenKind::Number, "42.5").unwrap(), Value::Number(42.5));
    }

    #[test]
    fn test_number_overflow_is_invalid() {
        let digits = "9".repeat(400);
        let err = convert(TokenKind::Number, &digits).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E102));
    }

    #[test]
    fn test_other_kinds_keep_raw_text() {
        assert_eq!(text(TokenKind::Identifier, "db"), "db");
    }
}
