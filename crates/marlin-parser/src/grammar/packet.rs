//! `packet-beta` blocks: `start[-end]: "label"` or `+bits: "label"`.

use winnow::{
    Parser as _,
    combinator::{opt, preceded},
};

use crate::{
    ast::{Packet, PacketBlock},
    converter::{CommonValueConverter, ValueConverter},
    error::{Diagnostic, ErrorCode},
    grammar::common::{CommonStatement, common_statement, starts_common},
    lexer::{TokenBuilder, TokenRule, TokenSet, matchers},
    parser::{
        Grammar, IResult, Input, ParseContext, eol, expected, invalid, number, one_of_keywords,
        peek_kind, symbol, text,
    },
    span::Spanned,
    tokens::{Keyword, Symbol, TokenKind},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct PacketTokens;

impl TokenBuilder for PacketTokens {
    fn build_tokens(&self) -> TokenSet {
        TokenSet::common_hidden()
            .keywords(&[Keyword::PacketBeta, Keyword::Packet])
            .title_and_accessibilities()
            .rule(TokenRule::new(TokenKind::Number, matchers::number()))
            .rule(TokenRule::new(TokenKind::String, matchers::string()))
            .symbols(&[Symbol::Colon, Symbol::Minus, Symbol::Plus])
    }
}

#[derive(Debug, Default)]
pub struct PacketGrammar {
    tokens: PacketTokens,
    converter: CommonValueConverter,
}

enum Statement {
    Common(CommonStatement),
    Block(PacketBlock),
}

impl Grammar for PacketGrammar {
    type Ast = Packet;
    type Tokens = PacketTokens;
    type Converter = CommonValueConverter;

    fn tokens(&self) -> &PacketTokens {
        &self.tokens
    }

    fn converter(&self) -> &CommonValueConverter {
        &self.converter
    }

    fn rules(&self, input: &mut Input<'_>, cx: &mut ParseContext<'_>) -> Option<Packet> {
        let converter = cx.converter();
        cx.header(input, |input| {
            one_of_keywords(input, &[Keyword::PacketBeta, Keyword::Packet], "packet-beta")
        })?;
        let mut packet = Packet::default();
        for statement in cx.statements(input, |input| statement(input, converter)) {
            match statement {
                Statement::Common(common) => packet.meta.apply(common),
                Statement::Block(block) => packet.blocks.push(block),
            }
        }
        Some(packet)
    }
}

fn statement<'src>(input: &mut Input<'src>, converter: &dyn ValueConverter) -> IResult<Statement> {
    match peek_kind(input) {
        Some(kind) if starts_common(kind) => {
            common_statement(input, converter).map(Statement::Common)
        }
        Some(TokenKind::Number) => range_block(input, converter).map(Statement::Block),
        Some(TokenKind::Symbol(Symbol::Plus)) => {
            width_block(input, converter).map(Statement::Block)
        }
        _ => Err(expected("packet block")),
    }
}

/// Parse a bit position or width: a whole, non-negative number that fits in `u32`
fn bit<'src>(
    input: &mut Input<'src>,
    converter: &dyn ValueConverter,
    label: &'static str,
) -> IResult<Spanned<u32>> {
    let value = number(input, converter, TokenKind::Number, label)?;
    let bits = *value.inner();
    if bits.fract() != 0.0 || bits < 0.0 || bits > f64::from(u32::MAX) {
        return Err(invalid(
            Diagnostic::error(format!("invalid value `{bits}`: expected a whole number of bits"))
                .with_code(ErrorCode::E102)
                .with_label(value.span(), "not a whole number of bits"),
        ));
    }
    Ok(value.map(|bits| bits as u32))
}

fn label<'src>(input: &mut Input<'src>, converter: &dyn ValueConverter) -> IResult<String> {
    symbol(Symbol::Colon).parse_next(input)?;
    let label = text(input, converter, TokenKind::String, "block label")?;
    eol(input)?;
    Ok(label.into_inner())
}

/// Parse `start[-end]: "label"`
fn range_block<'src>(
    input: &mut Input<'src>,
    converter: &dyn ValueConverter,
) -> IResult<PacketBlock> {
    let start = bit(input, converter, "start bit")?;
    let end = opt(preceded(symbol(Symbol::Minus), |input: &mut Input<'src>| {
        bit(input, converter, "end bit")
    }))
    .parse_next(input)?;

    if let Some(end) = &end {
        if end.inner() < start.inner() {
            return Err(invalid(
                Diagnostic::error(format!(
                    "invalid range: block ends at bit {} before it starts at bit {}",
                    end.inner(),
                    start.inner()
                ))
                .with_code(ErrorCode::E103)
                .with_label(end.span(), "ends before it starts")
                .with_secondary_label(start.span(), "block starts here")
                .with_help("write the lower bit first"),
            ));
        }
    }

    let label = label(input, converter)?;
    Ok(PacketBlock {
        start: Some(start.into_inner()),
        end: end.map(Spanned::into_inner),
        bits: None,
        label,
    })
}

/// Parse `+bits: "label"`
fn width_block<'src>(
    input: &mut Input<'src>,
    converter: &dyn ValueConverter,
) -> IResult<PacketBlock> {
    symbol(Symbol::Plus).parse_next(input)?;
    let bits = bit(input, converter, "block width")?;
    let label = label(input, converter)?;
    Ok(PacketBlock {
        start: None,
        end: None,
        bits: Some(bits.into_inner()),
        label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::DiagramParser, span::Span};

    fn parse(text: &str) -> crate::ParseResult<Packet> {
        DiagramParser::new(PacketGrammar::default()).parse(text)
    }

    #[test]
    fn test_packet_blocks() {
        let packet = parse(
            "packet-beta\ntitle TCP\n0-15: \"Source Port\"\n16-31: \"Destination Port\"\n32: \"Flag\"\n+8: \"Reserved\"\n",
        )
        .into_result()
        .unwrap();

        assert_eq!(packet.meta.title.as_deref(), Some("TCP"));
        assert_eq!(
            packet.blocks,
            [
                PacketBlock {
                    start: Some(0),
                    end: Some(15),
                    bits: None,
                    label: "Source Port".to_string(),
                },
                PacketBlock {
                    start: Some(16),
                    end: Some(31),
                    bits: None,
                    label: "Destination Port".to_string(),
                },
                PacketBlock {
                    start: Some(32),
                    end: None,
                    bits: None,
                    label: "Flag".to_string(),
                },
                PacketBlock {
                    start: None,
                    end: None,
                    bits: Some(8),
                    label: "Reserved".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_packet_keyword_without_beta() {
        let packet = parse("packet\n0-7: \"Byte\"").into_result().unwrap();
        assert_eq!(packet.blocks.len(), 1);
    }

    #[test]
    fn test_packet_reversed_range() {
        let result = parse("packet-beta\n8-3: \"Flags\"");
        assert_eq!(result.parser_errors.len(), 1);
        let diag = &result.parser_errors[0];
        assert_eq!(diag.code(), Some(ErrorCode::E103));
        assert_eq!(diag.primary_span(), Some(Span::new(14..15)));
    }

    #[test]
    fn test_packet_fractional_bit() {
        let result = parse("packet-beta\n1.5: \"Half\"");
        assert_eq!(result.parser_errors.len(), 1);
        assert_eq!(result.parser_errors[0].code(), Some(ErrorCode::E102));
    }

    #[test]
    fn test_packet_missing_label() {
        let result = parse("packet-beta\n0-7:\n8-15: \"Ok\"");
        assert_eq!(result.parser_errors.len(), 1);
        assert_eq!(result.value.unwrap().blocks.len(), 1);
    }
}
