//! Pattern matchers composed into grammar token sets.
//!
//! Regular shapes are written as winnow parsers run against the remainder of
//! the input. Free-text shapes (titles, periods, sankey nodes) must stop at a
//! context-sensitive delimiter such as a trailing `%%` comment without
//! consuming it, so they scan the text directly.

use winnow::{
    Parser,
    ascii::digit1,
    combinator::{alt, delimited, not, opt, terminated},
    error::{ContextError, ErrMode},
    token::{literal as tag, one_of, take_till, take_until, take_while},
};

use crate::lexer::PatternMatcher;

type Error = ErrMode<ContextError>;

/// Runs `parser` on the text after `offset` and returns where it stopped.
fn anchored<'a, O>(
    mut parser: impl Parser<&'a str, O, Error>,
    text: &'a str,
    offset: usize,
) -> Option<usize> {
    let mut input = text.get(offset..)?;
    parser.parse_next(&mut input).ok()?;
    let end = text.len() - input.len();
    (end > offset).then_some(end)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_horizontal_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// End of free text starting at `from`: the first line break, any of
/// `stops`, or a `%%` comment marker.
fn text_end(text: &str, from: usize, stops: &[char]) -> usize {
    let rest = &text[from..];
    let stop = rest
        .find(|c: char| c == '\n' || c == '\r' || stops.contains(&c))
        .unwrap_or(rest.len());
    from + rest[..stop].find("%%").unwrap_or(stop)
}

/// Offset of the first non-blank character at or after `from`.
fn skip_horizontal_space(text: &str, from: usize) -> usize {
    let rest = &text[from..];
    from + (rest.len() - rest.trim_start_matches(is_horizontal_space).len())
}

/// `[\t ]+`, plus any `\r` not starting a `\r\n` pair.
pub fn whitespace() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        let bytes = text.as_bytes();
        let mut end = offset;
        while end < bytes.len() {
            match bytes[end] {
                b' ' | b'\t' => end += 1,
                b'\r' if bytes.get(end + 1) != Some(&b'\n') => end += 1,
                _ => break,
            }
        }
        (end > offset).then_some(end)
    }
}

pub fn newline() -> impl PatternMatcher {
    |text: &str, offset: usize| anchored(alt(("\r\n", "\n")), text, offset)
}

/// `%%` up to the end of the line, with any leading blanks.
pub fn line_comment() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        anchored(
            (
                take_while(0.., is_horizontal_space),
                "%%",
                take_till(0.., ['\n', '\r']),
            ),
            text,
            offset,
        )
    }
}

/// `%%*` to the next `*%%`, across lines.
pub fn block_comment() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        anchored(
            (
                take_while(0.., is_horizontal_space),
                "%%*",
                take_until(0.., "*%%"),
                "*%%",
            ),
            text,
            offset,
        )
    }
}

/// `%%{` to `}%%`, recognized only before any content.
pub fn directive() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        if !text[..offset].trim().is_empty() {
            return None;
        }
        anchored(("%%{", take_until(0.., "}%%"), "}%%"), text, offset)
    }
}

/// `word`, not immediately followed by `[A-Za-z0-9_-]`.
pub fn keyword(word: &'static str) -> impl PatternMatcher {
    move |text: &str, offset: usize| {
        anchored(
            terminated(tag(word), not(one_of(|c: char| is_word_char(c) || c == '-'))),
            text,
            offset,
        )
    }
}

/// An exact literal.
pub fn literal(word: &'static str) -> impl PatternMatcher {
    move |text: &str, offset: usize| anchored(tag(word), text, offset)
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn identifier() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        anchored(
            (
                one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
                take_while(0.., is_word_char),
            ),
            text,
            offset,
        )
    }
}

/// `\d+(\.\d+)?`, not running into a word character or another dot.
pub fn number() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        anchored(
            terminated(
                (digit1, opt((".", digit1))),
                not(one_of(|c: char| is_word_char(c) || c == '.')),
            ),
            text,
            offset,
        )
    }
}

/// A double- or single-quoted string closed on the same line.
pub fn string() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        anchored(
            alt((
                delimited('"', take_till(0.., ['"', '\n', '\r']), '"'),
                delimited('\'', take_till(0.., ['\'', '\n', '\r']), '\''),
            )),
            text,
            offset,
        )
    }
}

/// `title`, optionally followed by blank-separated text.
pub fn title() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        let after = offset + "title".len();
        if !text.get(offset..)?.starts_with("title") {
            return None;
        }
        let rest = &text[after..];
        match rest.chars().next() {
            None | Some('\n' | '\r') => Some(after),
            Some(' ' | '\t') => Some(text_end(text, after, &[])),
            Some(_) if rest.starts_with("%%") => Some(after),
            Some(_) => None,
        }
    }
}

/// `accTitle:` and the rest of the line.
pub fn acc_title() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        if !text.get(offset..)?.starts_with("accTitle") {
            return None;
        }
        let colon = skip_horizontal_space(text, offset + "accTitle".len());
        text[colon..]
            .starts_with(':')
            .then(|| text_end(text, colon + 1, &[]))
    }
}

/// `accDescr:` and the rest of the line, or `accDescr { ... }` across lines.
pub fn acc_descr() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        if !text.get(offset..)?.starts_with("accDescr") {
            return None;
        }
        let after = offset + "accDescr".len();
        let colon = skip_horizontal_space(text, after);
        if text[colon..].starts_with(':') {
            return Some(text_end(text, colon + 1, &[]));
        }
        let rest = &text[after..];
        let brace = after + (rest.len() - rest.trim_start().len());
        if !text[brace..].starts_with('{') {
            return None;
        }
        text[brace..].find('}').map(|close| brace + close + 1)
    }
}

/// A sankey endpoint: a quoted CSV field, or unquoted text up to a comma.
pub fn sankey_node() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        let rest = text.get(offset..)?;
        if rest.starts_with('"') {
            let bytes = rest.as_bytes();
            let mut index = 1;
            loop {
                let quote = index + rest[index..].find('"')?;
                if bytes.get(quote + 1) == Some(&b'"') {
                    // "" is an escaped quote
                    index = quote + 2;
                    continue;
                }
                return (quote > 1).then_some(offset + quote + 1);
            }
        }
        let end = text_end(text, offset, &[',']);
        (end > offset).then_some(end)
    }
}

/// A sankey flow value, only when it is the last thing on its line.
pub fn sankey_value() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        let end = anchored(
            alt((
                (digit1, opt((".", digit1))).void(),
                delimited('"', (digit1, opt((".", digit1))), '"').void(),
            )),
            text,
            offset,
        )?;
        let next = skip_horizontal_space(text, end);
        let tail = &text[next..];
        let at_line_end = tail.is_empty()
            || tail.starts_with(['\n', '\r'])
            || tail.starts_with("%%");
        at_line_end.then_some(end)
    }
}

/// `section` followed by its title text.
pub fn section_title() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        if !text.get(offset..)?.starts_with("section") {
            return None;
        }
        let after = offset + "section".len();
        let start = skip_horizontal_space(text, after);
        if start == after {
            return None;
        }
        let end = text_end(text, start, &[]);
        (end > start).then_some(end)
    }
}

/// A timeline period label, stopping before `:`.
pub fn period_title() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        let end = text_end(text, offset, &[':']);
        (end > offset).then_some(end)
    }
}

/// `:` followed by one timeline event.
pub fn period_event() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        if !text.get(offset..)?.starts_with(':') {
            return None;
        }
        let start = skip_horizontal_space(text, offset + 1);
        let end = text_end(text, start, &[':']);
        (end > start).then_some(end)
    }
}

/// `(name)` with `[\w:-]` names.
pub fn arch_icon() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        anchored(
            delimited(
                '(',
                take_while(1.., |c: char| is_word_char(c) || c == ':' || c == '-'),
                ')',
            ),
            text,
            offset,
        )
    }
}

/// `("free text")`
pub fn arch_text_icon() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        anchored(
            delimited("(\"", take_till(1.., ['"', '\n', '\r']), "\")"),
            text,
            offset,
        )
    }
}

/// `[free text]` on one line.
pub fn arch_title() -> impl PatternMatcher {
    |text: &str, offset: usize| {
        anchored(
            delimited('[', take_till(1.., [']', '\n', '\r']), ']'),
            text,
            offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched<'a>(matcher: &impl PatternMatcher, text: &'a str, offset: usize) -> Option<&'a str> {
        matcher.match_at(text, offset).map(|end| &text[offset..end])
    }

    #[test]
    fn test_match_is_anchored() {
        assert_eq!(matched(&number(), "ab 12", 0), None);
        assert_eq!(matched(&number(), "ab 12", 3), Some("12"));
    }

    #[test]
    fn test_whitespace_leaves_crlf() {
        assert_eq!(matched(&whitespace(), " \t\r\n", 0), Some(" \t"));
        assert_eq!(matched(&whitespace(), "\rx", 0), Some("\r"));
        assert_eq!(matched(&newline(), "\r\nx", 0), Some("\r\n"));
    }

    #[test]
    fn test_comments() {
        assert_eq!(matched(&line_comment(), "  %% note\nnext", 0), Some("  %% note"));
        assert_eq!(matched(&block_comment(), "%%* a\nb *%% c", 0), Some("%%* a\nb *%%"));
        assert_eq!(matched(&block_comment(), "%%**%%", 0), Some("%%**%%"));
        assert_eq!(matched(&block_comment(), "%%* open", 0), None);
        assert_eq!(matched(&line_comment(), "%%* open", 0), Some("%%* open"));
    }

    #[test]
    fn test_directive_requires_leading_position() {
        assert_eq!(matched(&directive(), "  %%{init}%%", 2), Some("%%{init}%%"));
        assert_eq!(matched(&directive(), "pie %%{init}%%", 4), None);
    }

    #[test]
    fn test_keyword_word_boundary() {
        let packet = keyword("packet");
        assert_eq!(matched(&packet, "packet\n", 0), Some("packet"));
        assert_eq!(matched(&packet, "packet-beta", 0), None);
        assert_eq!(matched(&packet, "packets", 0), None);
        assert_eq!(matched(&keyword("in"), "in api", 0), Some("in"));
        assert_eq!(matched(&keyword("in"), "internal", 0), None);
    }

    #[test]
    fn test_number() {
        assert_eq!(matched(&number(), "42.5:", 0), Some("42.5"));
        assert_eq!(matched(&number(), "0-15", 0), Some("0"));
        assert_eq!(matched(&number(), "1.2.3", 0), None);
        assert_eq!(matched(&number(), "12ab", 0), None);
    }

    #[test]
    fn test_string() {
        assert_eq!(matched(&string(), "\"Dogs\" : 1", 0), Some("\"Dogs\""));
        assert_eq!(matched(&string(), "'it' x", 0), Some("'it'"));
        assert_eq!(matched(&string(), "\"open\nline\"", 0), None);
    }

    #[test]
    fn test_title_forms() {
        assert_eq!(matched(&title(), "title Pets %% c", 0), Some("title Pets "));
        assert_eq!(matched(&title(), "title\n", 0), Some("title"));
        assert_eq!(matched(&title(), "titles", 0), None);
    }

    #[test]
    fn test_accessibility_forms() {
        assert_eq!(matched(&acc_title(), "accTitle : Key", 0), Some("accTitle : Key"));
        assert_eq!(matched(&acc_title(), "accTitle Key", 0), None);
        assert_eq!(matched(&acc_descr(), "accDescr: one line\n", 0), Some("accDescr: one line"));
        assert_eq!(
            matched(&acc_descr(), "accDescr {\n  a\n  b\n}\nnext", 0),
            Some("accDescr {\n  a\n  b\n}")
        );
    }

    #[test]
    fn test_sankey_node() {
        assert_eq!(matched(&sankey_node(), "Bio-conversion ,Losses", 0), Some("Bio-conversion "));
        assert_eq!(matched(&sankey_node(), "\"a,\"\"b\"\"\",c", 0), Some("\"a,\"\"b\"\"\""));
        assert_eq!(matched(&sankey_node(), ",x", 0), None);
        assert_eq!(matched(&sankey_node(), "A %% c", 0), Some("A "));
    }

    #[test]
    fn test_sankey_value_only_at_line_end() {
        assert_eq!(matched(&sankey_value(), "10.5\nA", 0), Some("10.5"));
        assert_eq!(matched(&sankey_value(), "10  %% c", 0), Some("10"));
        assert_eq!(matched(&sankey_value(), "\"3\"", 0), Some("\"3\""));
        assert_eq!(matched(&sankey_value(), "10,B", 0), None);
    }

    #[test]
    fn test_timeline_matchers() {
        assert_eq!(matched(&section_title(), "section Stone Age\n", 0), Some("section Stone Age"));
        assert_eq!(matched(&section_title(), "sections", 0), None);
        assert_eq!(matched(&period_title(), "2002 : LinkedIn", 0), Some("2002 "));
        assert_eq!(matched(&period_event(), ": LinkedIn : Google", 0), Some(": LinkedIn "));
        assert_eq!(matched(&period_event(), ":\n", 0), None);
    }

    #[test]
    fn test_architecture_matchers() {
        assert_eq!(matched(&arch_icon(), "(logos:aws-s3) rest", 0), Some("(logos:aws-s3)"));
        assert_eq!(matched(&arch_text_icon(), "(\"DB\")[x]", 0), Some("(\"DB\")"));
        assert_eq!(
            matched(&arch_title(), "[user:password@some_domain.com] in", 0),
            Some("[user:password@some_domain.com]")
        );
        assert_eq!(matched(&arch_title(), "[]", 0), None);
    }
}
