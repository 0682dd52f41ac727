//! Title and accessibility statements accepted by every grammar.

use crate::{
    ast::TitleAndAccessibilities,
    converter::ValueConverter,
    parser::{IResult, Input, eol, expected, peek_kind, text},
    tokens::TokenKind,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CommonStatement {
    Title(String),
    AccTitle(String),
    AccDescr(String),
}

/// Returns `true` if a token of `kind` opens a common statement.
pub(crate) fn starts_common(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Title | TokenKind::AccTitle | TokenKind::AccDescr
    )
}

/// Parse `title ...`, `accTitle: ...` or `accDescr ...` up to the end of line
pub(crate) fn common_statement<'src>(
    input: &mut Input<'src>,
    converter: &dyn ValueConverter,
) -> IResult<CommonStatement> {
    let statement = match peek_kind(input) {
        Some(TokenKind::Title) => {
            CommonStatement::Title(text(input, converter, TokenKind::Title, "title")?.into_inner())
        }
        Some(TokenKind::AccTitle) => CommonStatement::AccTitle(
            text(input, converter, TokenKind::AccTitle, "accTitle")?.into_inner(),
        ),
        Some(TokenKind::AccDescr) => CommonStatement::AccDescr(
            text(input, converter, TokenKind::AccDescr, "accDescr")?.into_inner(),
        ),
        _ => return Err(expected("title or accessibility statement")),
    };
    eol(input)?;
    Ok(statement)
}

impl TitleAndAccessibilities {
    /// Records a statement; a repeated statement replaces the earlier one.
    pub(crate) fn apply(&mut self, statement: CommonStatement) {
        match statement {
            CommonStatement::Title(title) => self.title = Some(title),
            CommonStatement::AccTitle(title) => self.acc_title = Some(title),
            CommonStatement::AccDescr(descr) => self.acc_descr = Some(descr),
        }
    }
}
