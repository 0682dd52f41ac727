//! `architecture-beta` groups, services, junctions and edges.
//!
//! ```text
//! architecture-beta
//!     group api(cloud)[API]
//!     service db(database)[Database] in api
//!     service server(server)[Server] in api
//!     junction hub in api
//!     db:L -- R:server
//!     server{group}:B <-[calls]-> T:hub
//! ```

use winnow::{
    Parser as _,
    combinator::{opt, preceded},
    token::any,
};

use crate::{
    ast::{ArchDirection, ArchEdge, ArchGroup, ArchJunction, ArchService, Architecture},
    converter::{CommonValueConverter, Value, ValueConverter},
    error::Diagnostic,
    grammar::common::{CommonStatement, common_statement, starts_common},
    lexer::{TokenBuilder, TokenRule, TokenSet, matchers},
    parser::{
        Context, Grammar, IResult, Input, ParseContext, eol, expected, keyword, one_of_keywords,
        peek_kind, symbol, text,
    },
    tokens::{Keyword, PositionedToken, Symbol, TokenKind},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ArchitectureTokens;

impl TokenBuilder for ArchitectureTokens {
    fn build_tokens(&self) -> TokenSet {
        TokenSet::common_hidden()
            .keywords(&[
                Keyword::ArchitectureBeta,
                Keyword::Architecture,
                Keyword::Group,
                Keyword::Service,
                Keyword::Junction,
                Keyword::In,
            ])
            .title_and_accessibilities()
            .rule(TokenRule::new(TokenKind::ArchTextIcon, matchers::arch_text_icon()))
            .rule(TokenRule::new(TokenKind::ArchIcon, matchers::arch_icon()))
            .rule(TokenRule::new(TokenKind::ArchTitle, matchers::arch_title()))
            .rule(TokenRule::new(TokenKind::Identifier, matchers::identifier()))
            .symbols(&[
                Symbol::GroupModifier,
                Symbol::DoubleMinus,
                Symbol::Minus,
                Symbol::Colon,
                Symbol::LeftAngle,
                Symbol::RightAngle,
            ])
    }
}

/// Strips the delimiters of icons and titles.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchitectureValueConverter {
    common: CommonValueConverter,
}

impl ValueConverter for ArchitectureValueConverter {
    fn convert(&self, token: &PositionedToken<'_>) -> Result<Value, Diagnostic> {
        let text = token.text;
        let delimiters = match token.kind {
            TokenKind::ArchTextIcon => Some(("(\"", "\")")),
            TokenKind::ArchIcon => Some(("(", ")")),
            TokenKind::ArchTitle => Some(("[", "]")),
            _ => None,
        };
        match delimiters {
            Some((open, close)) => Ok(Value::Text(
                text.strip_prefix(open)
                    .and_then(|inner| inner.strip_suffix(close))
                    .unwrap_or(text)
                    .trim()
                    .to_string(),
            )),
            None => self.common.convert(token),
        }
    }
}

#[derive(Debug, Default)]
pub struct ArchitectureGrammar {
    tokens: ArchitectureTokens,
    converter: ArchitectureValueConverter,
}

enum Statement {
    Common(CommonStatement),
    Group(ArchGroup),
    Service(ArchService),
    Junction(ArchJunction),
    Edge(ArchEdge),
}

impl Grammar for ArchitectureGrammar {
    type Ast = Architecture;
    type Tokens = ArchitectureTokens;
    type Converter = ArchitectureValueConverter;

    fn tokens(&self) -> &ArchitectureTokens {
        &self.tokens
    }

    fn converter(&self) -> &ArchitectureValueConverter {
        &self.converter
    }

    fn rules(&self, input: &mut Input<'_>, cx: &mut ParseContext<'_>) -> Option<Architecture> {
        let converter = cx.converter();
        cx.header(input, |input| {
            one_of_keywords(
                input,
                &[Keyword::ArchitectureBeta, Keyword::Architecture],
                "architecture-beta",
            )
        })?;
        let mut architecture = Architecture::default();
        for statement in cx.statements(input, |input| statement(input, converter)) {
            match statement {
                Statement::Common(common) => architecture.meta.apply(common),
                Statement::Group(group) => architecture.groups.push(group),
                Statement::Service(service) => architecture.services.push(service),
                Statement::Junction(junction) => architecture.junctions.push(junction),
                Statement::Edge(edge) => architecture.edges.push(edge),
            }
        }
        Some(architecture)
    }
}

fn statement<'src>(input: &mut Input<'src>, converter: &dyn ValueConverter) -> IResult<Statement> {
    match peek_kind(input) {
        Some(kind) if starts_common(kind) => {
            common_statement(input, converter).map(Statement::Common)
        }
        Some(TokenKind::Keyword(Keyword::Group)) => group(input, converter).map(Statement::Group),
        Some(TokenKind::Keyword(Keyword::Service)) => {
            service(input, converter).map(Statement::Service)
        }
        Some(TokenKind::Keyword(Keyword::Junction)) => {
            junction(input, converter).map(Statement::Junction)
        }
        Some(TokenKind::Identifier) => edge(input, converter).map(Statement::Edge),
        _ => Err(expected("group, service, junction or edge")),
    }
}

fn identifier<'src>(
    input: &mut Input<'src>,
    converter: &dyn ValueConverter,
    label: &'static str,
) -> IResult<String> {
    text(input, converter, TokenKind::Identifier, label).map(|id| id.into_inner())
}

/// Parse an optional token of `kind` as text
fn opt_text<'src>(
    input: &mut Input<'src>,
    converter: &dyn ValueConverter,
    kind: TokenKind,
) -> IResult<Option<String>> {
    if peek_kind(input) != Some(kind) {
        return Ok(None);
    }
    text(input, converter, kind, "text").map(|text| Some(text.into_inner()))
}

/// Parse an optional `in parent`
fn parent<'src>(input: &mut Input<'src>, converter: &dyn ValueConverter) -> IResult<Option<String>> {
    opt(preceded(keyword(Keyword::In), |input: &mut Input<'src>| {
        identifier(input, converter, "parent group id")
    }))
    .parse_next(input)
}

/// Parse `group id [(icon)] [[title]] [in parent]`
fn group<'src>(input: &mut Input<'src>, converter: &dyn ValueConverter) -> IResult<ArchGroup> {
    keyword(Keyword::Group).parse_next(input)?;
    let id = identifier(input, converter, "group id")?;
    let icon = opt_text(input, converter, TokenKind::ArchIcon)?;
    let title = opt_text(input, converter, TokenKind::ArchTitle)?;
    let parent = parent(input, converter)?;
    eol(input)?;
    Ok(ArchGroup {
        id,
        icon,
        title,
        parent,
    })
}

/// Parse `service id [("text") | (icon)] [[title]] [in parent]`
fn service<'src>(input: &mut Input<'src>, converter: &dyn ValueConverter) -> IResult<ArchService> {
    keyword(Keyword::Service).parse_next(input)?;
    let id = identifier(input, converter, "service id")?;
    let icon_text = opt_text(input, converter, TokenKind::ArchTextIcon)?;
    let icon = match icon_text {
        Some(_) => None,
        None => opt_text(input, converter, TokenKind::ArchIcon)?,
    };
    let title = opt_text(input, converter, TokenKind::ArchTitle)?;
    let parent = parent(input, converter)?;
    eol(input)?;
    Ok(ArchService {
        id,
        icon,
        icon_text,
        title,
        parent,
    })
}

/// Parse `junction id [in parent]`
fn junction<'src>(input: &mut Input<'src>, converter: &dyn ValueConverter) -> IResult<ArchJunction> {
    keyword(Keyword::Junction).parse_next(input)?;
    let id = identifier(input, converter, "junction id")?;
    let parent = parent(input, converter)?;
    eol(input)?;
    Ok(ArchJunction { id, parent })
}

fn direction<'src>(input: &mut Input<'src>) -> IResult<ArchDirection> {
    any.verify_map(|token: &PositionedToken<'_>| match token.kind {
        TokenKind::Identifier => ArchDirection::from_letter(token.text),
        _ => None,
    })
    .context(Context::Label("direction L, R, T or B"))
    .parse_next(input)
}

fn group_modifier<'src>(input: &mut Input<'src>) -> IResult<bool> {
    opt(symbol(Symbol::GroupModifier))
        .map(|modifier| modifier.is_some())
        .parse_next(input)
}

/// Parse `-- ` or `-[title]-`
fn edge_line<'src>(
    input: &mut Input<'src>,
    converter: &dyn ValueConverter,
) -> IResult<Option<String>> {
    if peek_kind(input) == Some(TokenKind::Symbol(Symbol::DoubleMinus)) {
        symbol(Symbol::DoubleMinus).parse_next(input)?;
        return Ok(None);
    }
    symbol(Symbol::Minus).parse_next(input)?;
    let title = text(input, converter, TokenKind::ArchTitle, "edge title")?;
    symbol(Symbol::Minus).parse_next(input)?;
    Ok(Some(title.into_inner()))
}

/// Parse `lhs[{group}]:DIR [<]--[>] DIR:rhs[{group}]`
fn edge<'src>(input: &mut Input<'src>, converter: &dyn ValueConverter) -> IResult<ArchEdge> {
    let lhs_id = identifier(input, converter, "service id")?;
    let lhs_group = group_modifier(input)?;
    symbol(Symbol::Colon).parse_next(input)?;
    let lhs_dir = direction(input)?;
    let lhs_into = opt(symbol(Symbol::LeftAngle)).parse_next(input)?.is_some();
    let title = edge_line(input, converter)?;
    let rhs_into = opt(symbol(Symbol::RightAngle)).parse_next(input)?.is_some();
    let rhs_dir = direction(input)?;
    symbol(Symbol::Colon).parse_next(input)?;
    let rhs_id = identifier(input, converter, "service id")?;
    let rhs_group = group_modifier(input)?;
    eol(input)?;
    Ok(ArchEdge {
        lhs_id,
        lhs_group,
        lhs_dir,
        lhs_into,
        title,
        rhs_into,
        rhs_dir,
        rhs_id,
        rhs_group,
    })
}
