//! miette reports for [`MarlinError`].
//!
//! A parse failure becomes one report per diagnostic: every lexer
//! diagnostic first, then every parser diagnostic, each tagged with the
//! stage that produced it. Any other error becomes a single report without
//! source snippets.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceCode, SourceSpan};

use marlin::MarlinError;
use marlin_parser::{
    Span,
    error::{Diagnostic, ErrorCode},
};

/// The pass of the parser that reported a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexer,
    Parser,
}

impl Stage {
    fn as_str(self) -> &'static str {
        match self {
            Stage::Lexer => "lexer",
            Stage::Parser => "parser",
        }
    }

    /// Fallback help for diagnostics that carry none.
    fn help(self, code: Option<ErrorCode>) -> &'static str {
        match (self, code) {
            (_, Some(ErrorCode::E002)) => "close the string with a matching quote on the same line",
            (Stage::Lexer, _) => "remove the characters or quote them as a label",
            (_, Some(ErrorCode::E101)) => "the diagram ends in the middle of a statement",
            (_, Some(ErrorCode::E102 | ErrorCode::E103)) => "correct the value shown",
            (Stage::Parser, _) => "check the statement syntax of this diagram kind",
        }
    }
}

/// One renderable report.
#[derive(Debug)]
pub enum Report<'a> {
    /// A lexer or parser diagnostic shown against the source.
    Parse {
        diag: &'a Diagnostic,
        stage: Stage,
        src: &'a str,
    },
    /// Any other failure.
    Other(&'a MarlinError),
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Parse { diag, .. } => f.write_str(diag.message()),
            Report::Other(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Report<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Report::Parse { .. } => None,
            Report::Other(err) => err.source(),
        }
    }
}

impl MietteDiagnostic for Report<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self {
            Report::Parse { diag, stage, .. } => match diag.code() {
                Some(code) => format!("marlin::{}::{code}", stage.as_str()),
                None => format!("marlin::{}", stage.as_str()),
            },
            Report::Other(err) => match err {
                MarlinError::Io(_) => "marlin::io".to_string(),
                MarlinError::Parse { .. } => "marlin::parse".to_string(),
                MarlinError::Dispatch(_) => "marlin::dispatch".to_string(),
                MarlinError::Layout(_) => "marlin::layout".to_string(),
                MarlinError::Config(_) => "marlin::config".to_string(),
            },
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Report::Parse { diag, stage, .. } => {
                let help = diag.help().unwrap_or_else(|| stage.help(diag.code()));
                Some(Box::new(help))
            }
            Report::Other(MarlinError::Dispatch(_)) => Some(Box::new(
                "pass --kind with one of: info, pie, packet, sankey, timeline, architecture",
            )),
            Report::Other(_) => None,
        }
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        match self {
            Report::Parse { src, .. } => Some(src as &dyn SourceCode),
            Report::Other(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let Report::Parse { diag, .. } = self else {
            return None;
        };
        if diag.labels().is_empty() {
            return None;
        }
        Some(Box::new(diag.labels().iter().map(|label| {
            let message = Some(label.message.clone());
            let span = source_span(label.span);
            if label.primary {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

fn source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Splits `err` into the reports the CLI prints, in order.
pub fn reports(err: &MarlinError) -> Vec<Report<'_>> {
    let MarlinError::Parse { err: parse_err, src } = err else {
        return vec![Report::Other(err)];
    };
    let lexer = parse_err.lexer_errors().iter().map(|diag| (diag, Stage::Lexer));
    let parser = parse_err.parser_errors().iter().map(|diag| (diag, Stage::Parser));
    lexer
        .chain(parser)
        .map(|(diag, stage)| Report::Parse { diag, stage, src })
        .collect()
}

#[cfg(test)]
mod tests {
    use marlin_parser::error::{DispatchError, ParseError};

    use super::*;

    fn code(report: &Report<'_>) -> String {
        report.code().unwrap().to_string()
    }

    fn help(report: &Report<'_>) -> String {
        report.help().unwrap().to_string()
    }

    #[test]
    fn test_lexer_reports_come_first() {
        let lexical = Diagnostic::error("unexpected characters `#`").with_code(ErrorCode::E001);
        let unexpected = Diagnostic::error("unexpected token `#`").with_code(ErrorCode::E100);
        let uncoded = Diagnostic::error("second parser error");
        let parse_err = ParseError::new(vec![lexical], vec![unexpected, uncoded]).unwrap();
        let err = MarlinError::new_parse_error(parse_err, "pie\n#");

        let reports = reports(&err);

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].to_string(), "unexpected characters `#`");
        assert_eq!(code(&reports[0]), "marlin::lexer::E001");
        assert_eq!(code(&reports[1]), "marlin::parser::E100");
        assert_eq!(code(&reports[2]), "marlin::parser");
        assert!(reports.iter().all(|report| report.source_code().is_some()));
    }

    #[test]
    fn test_fallback_help_depends_on_stage() {
        let lexical = Diagnostic::error("unexpected characters `#`").with_code(ErrorCode::E001);
        let unterminated = Diagnostic::error("unterminated string").with_code(ErrorCode::E002);
        let truncated = Diagnostic::error("unexpected end of input").with_code(ErrorCode::E101);
        let range = Diagnostic::error("invalid range").with_code(ErrorCode::E103);
        let err = MarlinError::new_parse_error(
            ParseError::new(vec![lexical, unterminated], vec![truncated, range]).unwrap(),
            "",
        );

        let help: Vec<_> = reports(&err).iter().map(help).collect();
        assert_eq!(
            help,
            [
                "remove the characters or quote them as a label",
                "close the string with a matching quote on the same line",
                "the diagram ends in the middle of a statement",
                "correct the value shown",
            ]
        );
    }

    #[test]
    fn test_own_help_wins() {
        let diag = Diagnostic::error("unexpected token `,`")
            .with_code(ErrorCode::E100)
            .with_help("each section needs a value");
        let err = MarlinError::new_parse_error(ParseError::from(diag), ",");

        assert_eq!(help(&reports(&err)[0]), "each section needs a value");
    }

    #[test]
    fn test_labels_keep_primary_flag() {
        let diag = Diagnostic::error("invalid range: block ends at bit 3 before it starts at bit 8")
            .with_label(Span::new(14..15), "ends before it starts")
            .with_secondary_label(Span::new(12..13), "block starts here");
        let report = Report::Parse {
            diag: &diag,
            stage: Stage::Parser,
            src: "packet-beta\n8-3: \"Flags\"",
        };

        let labels: Vec<_> = report.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("ends before it starts"));
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
        assert_eq!(labels[1].offset(), 12);
    }

    #[test]
    fn test_other_errors_have_no_source() {
        let err = MarlinError::Dispatch(DispatchError::UnknownKind("gantt".to_string()));

        let reports = reports(&err);

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].to_string(), "unknown diagram kind: `gantt`");
        assert_eq!(code(&reports[0]), "marlin::dispatch");
        assert!(reports[0].help().is_some());
        assert!(reports[0].source_code().is_none());
        assert!(reports[0].labels().is_none());
    }
}
