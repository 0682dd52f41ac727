//! `timeline` with `section` lines and `period : event : event` lines.

use winnow::{Parser as _, combinator::repeat};

use crate::{
    ast::{Timeline, TimelinePeriod, TimelineSection},
    converter::{CommonValueConverter, Value, ValueConverter},
    error::{Diagnostic, ErrorCode},
    grammar::common::{CommonStatement, common_statement, starts_common},
    lexer::{TokenBuilder, TokenRule, TokenSet, matchers},
    parser::{Grammar, IResult, Input, ParseContext, eol, expected, keyword, peek_kind, text},
    span::{Span, Spanned},
    tokens::{Keyword, PositionedToken, TokenKind},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineTokens;

impl TokenBuilder for TimelineTokens {
    fn build_tokens(&self) -> TokenSet {
        TokenSet::common_hidden()
            .keywords(&[Keyword::Timeline])
            .title_and_accessibilities()
            .rule(TokenRule::new(TokenKind::SectionTitle, matchers::section_title()))
            // `section` with no title after it
            .rule(TokenRule::keyword(Keyword::Section))
            .rule(TokenRule::new(TokenKind::PeriodEvent, matchers::period_event()))
            .rule(TokenRule::new(TokenKind::PeriodTitle, matchers::period_title()))
    }
}

/// Strips the `section` keyword and the `:` of events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineValueConverter {
    common: CommonValueConverter,
}

impl ValueConverter for TimelineValueConverter {
    fn convert(&self, token: &PositionedToken<'_>) -> Result<Value, Diagnostic> {
        let text = token.text;
        match token.kind {
            TokenKind::SectionTitle => Ok(Value::Text(
                text.trim_start_matches("section").trim().to_string(),
            )),
            TokenKind::PeriodTitle => Ok(Value::Text(text.trim().to_string())),
            TokenKind::PeriodEvent => Ok(Value::Text(
                text.trim_start_matches(':').trim().to_string(),
            )),
            _ => self.common.convert(token),
        }
    }
}

#[derive(Debug, Default)]
pub struct TimelineGrammar {
    tokens: TimelineTokens,
    converter: TimelineValueConverter,
}

enum Statement {
    Common(CommonStatement),
    Section(String),
    Period(TimelinePeriod),
    /// Events extending the previous period, with the span of the first one
    Continuation(Spanned<Vec<String>>),
}

impl Grammar for TimelineGrammar {
    type Ast = Timeline;
    type Tokens = TimelineTokens;
    type Converter = TimelineValueConverter;

    fn tokens(&self) -> &TimelineTokens {
        &self.tokens
    }

    fn converter(&self) -> &TimelineValueConverter {
        &self.converter
    }

    fn rules(&self, input: &mut Input<'_>, cx: &mut ParseContext<'_>) -> Option<Timeline> {
        let converter = cx.converter();
        cx.header(input, |input| keyword(Keyword::Timeline).void().parse_next(input))?;
        let statements = cx.statements(input, |input| statement(input, converter));

        let mut timeline = Timeline::default();
        for statement in statements {
            match statement {
                Statement::Common(common) => timeline.meta.apply(common),
                Statement::Section(title) => timeline.sections.push(TimelineSection {
                    title: Some(title),
                    periods: Vec::new(),
                }),
                Statement::Period(period) => {
                    if timeline.sections.is_empty() {
                        timeline.sections.push(TimelineSection::default());
                    }
                    if let Some(section) = timeline.sections.last_mut() {
                        section.periods.push(period);
                    }
                }
                Statement::Continuation(events) => {
                    let span = events.span();
                    let period = timeline
                        .sections
                        .last_mut()
                        .and_then(|section| section.periods.last_mut());
                    match period {
                        Some(period) => period.events.extend(events.into_inner()),
                        None => cx.error(orphan_events(span)),
                    }
                }
            }
        }
        Some(timeline)
    }
}

fn orphan_events(span: Span) -> Diagnostic {
    Diagnostic::error("unexpected token: expected a period before its events")
        .with_code(ErrorCode::E100)
        .with_label(span, "no period to extend")
        .with_help("start the line with a period title, as in `2021 : event`")
}

fn statement<'src>(input: &mut Input<'src>, converter: &dyn ValueConverter) -> IResult<Statement> {
    match peek_kind(input) {
        Some(kind) if starts_common(kind) => {
            common_statement(input, converter).map(Statement::Common)
        }
        Some(TokenKind::SectionTitle) => {
            let title = text(input, converter, TokenKind::SectionTitle, "section")?;
            eol(input)?;
            Ok(Statement::Section(title.into_inner()))
        }
        Some(TokenKind::Keyword(Keyword::Section)) => Err(expected("section title")),
        Some(TokenKind::PeriodTitle) => period(input, converter).map(Statement::Period),
        Some(TokenKind::PeriodEvent) => continuation(input, converter).map(Statement::Continuation),
        _ => Err(expected("section or period")),
    }
}

fn event<'src>(input: &mut Input<'src>, converter: &dyn ValueConverter) -> IResult<Spanned<String>> {
    text(input, converter, TokenKind::PeriodEvent, "event")
}

/// Parse `period [: event]*`
fn period<'src>(input: &mut Input<'src>, converter: &dyn ValueConverter) -> IResult<TimelinePeriod> {
    let title = text(input, converter, TokenKind::PeriodTitle, "period")?;
    let events: Vec<Spanned<String>> =
        repeat(0.., |input: &mut Input<'src>| event(input, converter)).parse_next(input)?;
    eol(input)?;
    Ok(TimelinePeriod {
        title: title.into_inner(),
        events: events.into_iter().map(Spanned::into_inner).collect(),
    })
}

/// Parse `(: event)+`
fn continuation<'src>(
    input: &mut Input<'src>,
    converter: &dyn ValueConverter,
) -> IResult<Spanned<Vec<String>>> {
    let events: Vec<Spanned<String>> =
        repeat(1.., |input: &mut Input<'src>| event(input, converter)).parse_next(input)?;
    eol(input)?;
    let span = events
        .iter()
        .map(Spanned::span)
        .reduce(Span::union)
        .unwrap_or_default();
    Ok(Spanned::new(
        events.into_iter().map(Spanned::into_inner).collect(),
        span,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::DiagramParser;

    fn parse(text: &str) -> crate::ParseResult<Timeline> {
        DiagramParser::new(TimelineGrammar::default()).parse(text)
    }

    fn period(title: &str, events: &[&str]) -> TimelinePeriod {
        TimelinePeriod {
            title: title.to_string(),
            events: events.iter().map(|event| event.to_string()).collect(),
        }
    }

    #[test]
    fn test_timeline_sections() {
        let timeline = parse(
            "timeline\n    title History of Social Media\n    section 2000s\n        2002 : LinkedIn\n        2004 : Facebook : Google\n    section 2010s\n        2011 : Snapchat\n",
        )
        .into_result()
        .unwrap();

        assert_eq!(timeline.meta.title.as_deref(), Some("History of Social Media"));
        assert_eq!(
            timeline.sections,
            [
                TimelineSection {
                    title: Some("2000s".to_string()),
                    periods: vec![
                        period("2002", &["LinkedIn"]),
                        period("2004", &["Facebook", "Google"]),
                    ],
                },
                TimelineSection {
                    title: Some("2010s".to_string()),
                    periods: vec![period("2011", &["Snapchat"])],
                },
            ]
        );
    }

    #[test]
    fn test_timeline_periods_before_sections() {
        let timeline = parse("timeline\n2021 : Launch\nsection Later\n2022 : Growth")
            .into_result()
            .unwrap();

        assert_eq!(timeline.sections.len(), 2);
        assert_eq!(timeline.sections[0].title, None);
        assert_eq!(timeline.sections[0].periods, [period("2021", &["Launch"])]);
    }

    #[test]
    fn test_timeline_continuation_lines() {
        let timeline = parse("timeline\n2021 : Launch\n     : Beta : GA\nQ4 %% no events yet\n")
            .into_result()
            .unwrap();

        assert_eq!(
            timeline.sections[0].periods,
            [period("2021", &["Launch", "Beta", "GA"]), period("Q4", &[])]
        );
    }

    #[test]
    fn test_timeline_orphan_continuation() {
        let result = parse("timeline\n  : Lost\n2021 : Found");
        assert_eq!(result.parser_errors.len(), 1);
        let diag = &result.parser_errors[0];
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.primary_span(), Some(Span::new(11..17)));
        assert_eq!(result.value.unwrap().sections[0].periods.len(), 1);
    }

    #[test]
    fn test_timeline_section_without_title() {
        let result = parse("timeline\nsection\n2021 : A");
        assert_eq!(result.parser_errors.len(), 1);
        let diag = &result.parser_errors[0];
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(
            diag.message(),
            "unexpected token `section`: expected section title"
        );
        assert_eq!(diag.primary_span(), Some(Span::new(9..16)));

        let periods: Vec<_> = result.value.unwrap().sections[0]
            .periods
            .iter()
            .map(|period| period.title.clone())
            .collect();
        assert_eq!(periods, ["2021"]);
    }

    #[test]
    fn test_timeline_section_prefixed_period() {
        let timeline = parse("timeline\nsection-a : launch").into_result().unwrap();
        assert_eq!(timeline.sections[0].periods[0].title, "section-a");
    }

    #[test]
    fn test_timeline_missing_header() {
        let result = parse("section 2000s");
        assert!(result.value.is_none());
        assert_eq!(
            result.parser_errors[0].message(),
            "unexpected token `section 2000s`: expected timeline"
        );
    }
}
