//! `sankey-beta` flows written as CSV records: `source,target,value`.

use indexmap::IndexSet;
use winnow::Parser as _;

use crate::{
    ast::{Sankey, SankeyLink, SankeyNode},
    converter::{CommonValueConverter, Value, ValueConverter, parse_number},
    error::{Diagnostic, ErrorCode},
    grammar::common::{CommonStatement, common_statement, starts_common},
    lexer::{TokenBuilder, TokenRule, TokenSet, matchers},
    parser::{
        Grammar, IResult, Input, ParseContext, eol, expected, number, one_of_keywords, peek_kind,
        symbol, text,
    },
    tokens::{Keyword, PositionedToken, Symbol, TokenKind},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SankeyTokens;

impl TokenBuilder for SankeyTokens {
    fn build_tokens(&self) -> TokenSet {
        // Values are tried before nodes: a number ending a line is a flow value
        TokenSet::common_hidden()
            .keywords(&[Keyword::SankeyBeta, Keyword::Sankey])
            .title_and_accessibilities()
            .rule(TokenRule::new(TokenKind::SankeyValue, matchers::sankey_value()))
            .rule(TokenRule::new(TokenKind::SankeyNode, matchers::sankey_node()))
            .symbols(&[Symbol::Comma])
    }
}

/// Unquotes CSV fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct SankeyValueConverter {
    common: CommonValueConverter,
}

impl ValueConverter for SankeyValueConverter {
    fn convert(&self, token: &PositionedToken<'_>) -> Result<Value, Diagnostic> {
        match token.kind {
            TokenKind::SankeyNode => Ok(Value::Text(unquote_field(token.text))),
            TokenKind::SankeyValue => {
                let digits = token.text.trim_matches('"');
                parse_number(token, digits).map(Value::Number)
            }
            _ => self.common.convert(token),
        }
    }
}

fn unquote_field(field: &str) -> String {
    match field.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        Some(quoted) => quoted.replace("\"\"", "\""),
        None => field.trim().to_string(),
    }
}

#[derive(Debug, Default)]
pub struct SankeyGrammar {
    tokens: SankeyTokens,
    converter: SankeyValueConverter,
}

enum Statement {
    Common(CommonStatement),
    Link(SankeyLink),
}

impl Grammar for SankeyGrammar {
    type Ast = Sankey;
    type Tokens = SankeyTokens;
    type Converter = SankeyValueConverter;

    fn tokens(&self) -> &SankeyTokens {
        &self.tokens
    }

    fn converter(&self) -> &SankeyValueConverter {
        &self.converter
    }

    fn rules(&self, input: &mut Input<'_>, cx: &mut ParseContext<'_>) -> Option<Sankey> {
        let converter = cx.converter();
        cx.header(input, header)?;
        let mut sankey = Sankey::default();
        for statement in cx.statements(input, |input| statement(input, converter)) {
            match statement {
                Statement::Common(common) => sankey.meta.apply(common),
                Statement::Link(link) => sankey.links.push(link),
            }
        }

        if sankey.links.is_empty() && !cx.has_errors() {
            cx.error(
                Diagnostic::error("unexpected end of input: expected sankey link")
                    .with_code(ErrorCode::E101)
                    .with_label(cx.eof(), "input ends here")
                    .with_help("add a `source,target,value` line"),
            );
        }
        Some(sankey)
    }

    fn post_process(&self, sankey: &mut Sankey) {
        let ids: IndexSet<&str> = sankey
            .links
            .iter()
            .flat_map(|link| [link.source.as_str(), link.target.as_str()])
            .collect();
        sankey.nodes = ids
            .into_iter()
            .map(|id| SankeyNode { id: id.to_string() })
            .collect();
    }
}

/// `sankey-beta` or `sankey`, which must end its line
fn header<'src>(input: &mut Input<'src>) -> IResult<()> {
    one_of_keywords(input, &[Keyword::SankeyBeta, Keyword::Sankey], "sankey-beta")?;
    eol(input)
}

fn statement<'src>(input: &mut Input<'src>, converter: &dyn ValueConverter) -> IResult<Statement> {
    match peek_kind(input) {
        Some(kind) if starts_common(kind) => {
            common_statement(input, converter).map(Statement::Common)
        }
        Some(TokenKind::SankeyNode) => link(input, converter).map(Statement::Link),
        _ => Err(expected("sankey link")),
    }
}

/// Parse `source,target,value`
fn link<'src>(input: &mut Input<'src>, converter: &dyn ValueConverter) -> IResult<SankeyLink> {
    let source = text(input, converter, TokenKind::SankeyNode, "source node")?;
    symbol(Symbol::Comma).parse_next(input)?;
    let target = text(input, converter, TokenKind::SankeyNode, "target node")?;
    symbol(Symbol::Comma).parse_next(input)?;
    let value = number(input, converter, TokenKind::SankeyValue, "flow value")?;
    eol(input)?;
    Ok(SankeyLink {
        source: source.into_inner(),
        target: target.into_inner(),
        value: value.into_inner(),
    })
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::parser::DiagramParser;

    fn node_name_strategy() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{0,6}"
    }

    fn links_strategy() -> impl Strategy<Value = Vec<(String, String, u16)>> {
        prop::collection::vec(
            (node_name_strategy(), node_name_strategy(), any::<u16>()),
            1..12,
        )
    }

    /// Nodes are exactly the link endpoints, deduplicated in first-occurrence order.
    fn check_nodes_derived_from_links(
        links: &[(String, String, u16)],
    ) -> Result<(), TestCaseError> {
        let mut source = String::from("sankey-beta\n");
        for (from, to, value) in links {
            source.push_str(&format!("{from},{to},{value}\n"));
        }

        let result = DiagramParser::new(SankeyGrammar::default()).parse(&source);
        prop_assert!(!result.has_errors(), "{source}: {:?}", result.parser_errors);
        let sankey = result.value.unwrap_or_default();

        let mut expected: Vec<&str> = Vec::new();
        for (from, to, _) in links {
            for id in [from.as_str(), to.as_str()] {
                if !expected.contains(&id) {
                    expected.push(id);
                }
            }
        }
        let actual: Vec<&str> = sankey.nodes.iter().map(|node| node.id.as_str()).collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(sankey.links.len(), links.len());
        Ok(())
    }

    proptest! {
        #[test]
        fn nodes_derived_from_links(links in links_strategy()) {
            check_nodes_derived_from_links(&links)?;
        }
    }
}
