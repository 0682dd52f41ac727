//! `info [showInfo]`

use winnow::{Parser as _, combinator::opt};

use crate::{
    ast::Info,
    converter::CommonValueConverter,
    grammar::common::common_statement,
    lexer::{TokenBuilder, TokenSet},
    parser::{Grammar, IResult, Input, ParseContext, keyword, newlines0},
    tokens::Keyword,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct InfoTokens;

impl TokenBuilder for InfoTokens {
    fn build_tokens(&self) -> TokenSet {
        TokenSet::common_hidden()
            .keywords(&[Keyword::Info, Keyword::ShowInfo])
            .title_and_accessibilities()
    }
}

#[derive(Debug, Default)]
pub struct InfoGrammar {
    tokens: InfoTokens,
    converter: CommonValueConverter,
}

impl Grammar for InfoGrammar {
    type Ast = Info;
    type Tokens = InfoTokens;
    type Converter = CommonValueConverter;

    fn tokens(&self) -> &InfoTokens {
        &self.tokens
    }

    fn converter(&self) -> &CommonValueConverter {
        &self.converter
    }

    fn rules(&self, input: &mut Input<'_>, cx: &mut ParseContext<'_>) -> Option<Info> {
        let converter = cx.converter();
        let show_info = cx.header(input, header)?;
        let mut info = Info {
            show_info,
            ..Info::default()
        };
        for statement in cx.statements(input, |input| common_statement(input, converter)) {
            info.meta.apply(statement);
        }
        Some(info)
    }
}

/// `info`, optionally followed by `showInfo` on the same or a later line
fn header<'src>(input: &mut Input<'src>) -> IResult<bool> {
    keyword(Keyword::Info).parse_next(input)?;
    let show_info = opt((newlines0, keyword(Keyword::ShowInfo))).parse_next(input)?;
    Ok(show_info.is_some())
}
