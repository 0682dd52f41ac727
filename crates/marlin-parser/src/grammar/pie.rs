//! `pie [showData]` followed by `"label" : value` sections.

use winnow::{Parser as _, combinator::opt};

use crate::{
    ast::{Pie, PieSection},
    converter::{CommonValueConverter, ValueConverter},
    grammar::common::{CommonStatement, common_statement, starts_common},
    lexer::{TokenBuilder, TokenRule, TokenSet, matchers},
    parser::{
        Grammar, IResult, Input, ParseContext, eol, expected, keyword, number, peek_kind, symbol,
        text,
    },
    tokens::{Keyword, Symbol, TokenKind},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct PieTokens;

impl TokenBuilder for PieTokens {
    fn build_tokens(&self) -> TokenSet {
        TokenSet::common_hidden()
            .keywords(&[Keyword::Pie, Keyword::ShowData])
            .title_and_accessibilities()
            .rule(TokenRule::new(TokenKind::Number, matchers::number()))
            .rule(TokenRule::new(TokenKind::String, matchers::string()))
            .symbols(&[Symbol::Colon])
    }
}

#[derive(Debug, Default)]
pub struct PieGrammar {
    tokens: PieTokens,
    converter: CommonValueConverter,
}

enum Statement {
    Common(CommonStatement),
    Section(PieSection),
}

impl Grammar for PieGrammar {
    type Ast = Pie;
    type Tokens = PieTokens;
    type Converter = CommonValueConverter;

    fn tokens(&self) -> &PieTokens {
        &self.tokens
    }

    fn converter(&self) -> &CommonValueConverter {
        &self.converter
    }

    fn rules(&self, input: &mut Input<'_>, cx: &mut ParseContext<'_>) -> Option<Pie> {
        let converter = cx.converter();
        let show_data = cx.header(input, header)?;
        let mut pie = Pie {
            show_data,
            ..Pie::default()
        };
        for statement in cx.statements(input, |input| statement(input, converter)) {
            match statement {
                Statement::Common(common) => pie.meta.apply(common),
                Statement::Section(section) => pie.sections.push(section),
            }
        }
        Some(pie)
    }
}

fn header<'src>(input: &mut Input<'src>) -> IResult<bool> {
    keyword(Keyword::Pie).parse_next(input)?;
    let show_data = opt(keyword(Keyword::ShowData)).parse_next(input)?;
    Ok(show_data.is_some())
}

fn statement<'src>(input: &mut Input<'src>, converter: &dyn ValueConverter) -> IResult<Statement> {
    match peek_kind(input) {
        Some(kind) if starts_common(kind) => {
            common_statement(input, converter).map(Statement::Common)
        }
        Some(TokenKind::String) => section(input, converter).map(Statement::Section),
        _ => Err(expected("pie section")),
    }
}

/// Parse `"label" : value`
fn section<'src>(input: &mut Input<'src>, converter: &dyn ValueConverter) -> IResult<PieSection> {
    let label = text(input, converter, TokenKind::String, "section label")?;
    symbol(Symbol::Colon).parse_next(input)?;
    let value = number(input, converter, TokenKind::Number, "section value")?;
    eol(input)?;
    Ok(PieSection {
        label: label.into_inner(),
        value: value.into_inner(),
    })
}
