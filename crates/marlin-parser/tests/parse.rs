use marlin_core::kind::DiagramKind;
use marlin_parser::{Diagram, Registry, detect, error::DispatchError, parse, parse_named};
use proptest::prelude::*;

const VALID: [(DiagramKind, &str); 6] = [
    (DiagramKind::Info, "info showInfo\n"),
    (
        DiagramKind::Pie,
        "pie showData\n    title Key elements in Product X\n    \"Calcium\" : 42.96\n    \"Potassium\" : 50.05\n",
    ),
    (
        DiagramKind::Packet,
        "packet-beta\n    title UDP Packet\n    0-15: \"Source Port\"\n    16-31: \"Destination Port\"\n    +16: \"Length\"\n",
    ),
    (
        DiagramKind::Sankey,
        "sankey-beta\n\nAgricultural waste,Bio-conversion,124.729\nBio-conversion,Liquid,0.597\nBio-conversion,Losses,26.862\n",
    ),
    (
        DiagramKind::Timeline,
        "timeline\n    title History of Social Media Platform\n    2002 : LinkedIn\n    2004 : Facebook\n         : Google\n    section Later\n    2005 : YouTube\n",
    ),
    (
        DiagramKind::Architecture,
        "architecture-beta\n    group api(cloud)[API]\n    service db(database)[Database] in api\n    service server(server)[Server] in api\n    db:L -- R:server\n",
    ),
];

#[test]
fn test_every_kind_parses_its_example() {
    for (kind, source) in VALID {
        let diagram = parse(kind, source).unwrap_or_else(|err| panic!("{kind}: {err}"));
        assert_eq!(diagram.kind(), kind);

        let json = serde_json::to_value(&diagram).unwrap();
        assert_eq!(json["$type"], kind.as_str());
        assert_eq!(detect(source), Some(kind));
    }
}

#[test]
fn test_pie_scenario() {
    let diagram = parse(DiagramKind::Pie, "pie\n    \"Dogs\": 50\n    \"Cats\": 50").unwrap();
    let pie = diagram.as_pie().unwrap();

    let sections: Vec<(&str, f64)> = pie
        .sections
        .iter()
        .map(|section| (section.label.as_str(), section.value))
        .collect();
    assert_eq!(sections, [("Dogs", 50.0), ("Cats", 50.0)]);
}

#[test]
fn test_pie_bad_syntax() {
    let result = Registry::global()
        .parser(DiagramKind::Pie)
        .parse("pie\n  bad syntax ####");
    assert!(!result.parser_errors.is_empty());

    let err = parse(DiagramKind::Pie, "pie\n  bad syntax ####").unwrap_err();
    assert_eq!(err.lexer_errors().len(), 3);
    assert!(!err.parser_errors().is_empty());

    let lines: Vec<&str> = err.diagnostics().map(|diag| diag.message()).collect();
    assert_eq!(err.message(), lines.join("\n"));
    assert_eq!(lines[0], "unexpected characters `bad`");
}

#[test]
fn test_truncated_architecture_fails() {
    let err = parse(DiagramKind::Architecture, "architecture-beta group").unwrap_err();
    assert!(err.lexer_errors().is_empty());
    assert_eq!(err.parser_errors().len(), 1);
    assert!(err.to_string().starts_with("parsing failed: unexpected end of input"));
}

#[test]
fn test_missing_header_fails() {
    for (kind, _) in VALID {
        assert!(parse(kind, "flowchart LR").is_err(), "{kind}");
    }
}

#[test]
fn test_sankey_nodes_follow_first_occurrence() {
    let diagram = parse(DiagramKind::Sankey, "sankey-beta\nA,B,10\nB,C,5\nA,C,3").unwrap();
    let ids: Vec<&str> = diagram
        .as_sankey()
        .unwrap()
        .nodes
        .iter()
        .map(|node| node.id.as_str())
        .collect();
    assert_eq!(ids, ["A", "B", "C"]);
}

#[test]
fn test_parse_named() {
    let diagram = parse_named("timeline", "timeline\n2021 : Launch").unwrap();
    assert!(matches!(diagram, Diagram::Timeline(_)));

    let err = parse_named("flowchart", "flowchart LR").unwrap_err();
    assert!(matches!(err, DispatchError::UnknownKind(_)));
}

#[test]
fn test_architecture_labels() {
    let (_, source) = VALID[5];
    let diagram = parse(DiagramKind::Architecture, source).unwrap();
    assert_eq!(diagram.labels(), ["API", "Database", "Server"]);
}

// ===================
// Comment idempotence
// ===================

/// Inserts `comment` after line `line` of `source`, on its own line or at the end of it.
fn with_comment(source: &str, line: usize, comment: &str, own_line: bool) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let line = line % lines.len();
    let mut out = String::new();
    for (index, text) in lines.iter().enumerate() {
        out.push_str(text);
        if index == line {
            if own_line {
                out.push('\n');
                out.push_str(comment);
            } else {
                out.push(' ');
                out.push_str(comment);
            }
        }
        out.push('\n');
    }
    out
}

fn comment_strategy() -> impl Strategy<Value = String> {
    ("[a-z ]{0,12}", any::<bool>()).prop_map(|(text, block)| {
        if block {
            format!("%%* {text} *%%")
        } else {
            format!("%% {text}")
        }
    })
}

fn check_comment_does_not_change_ast(
    example: usize,
    line: usize,
    comment: &str,
    own_line: bool,
) -> Result<(), TestCaseError> {
    let (kind, source) = VALID[example];
    let commented = with_comment(source, line, comment, own_line);

    let expected = parse(kind, source).map_err(|err| TestCaseError::fail(err.to_string()))?;
    let actual = parse(kind, &commented)
        .map_err(|err| TestCaseError::fail(format!("{commented:?}: {err}")))?;
    prop_assert_eq!(actual, expected, "{:?}", commented);
    Ok(())
}

proptest! {
    #[test]
    fn comments_do_not_change_ast(
        example in 0..VALID.len(),
        line in 0usize..16,
        comment in comment_strategy(),
        own_line in any::<bool>(),
    ) {
        check_comment_does_not_change_ast(example, line, &comment, own_line)?;
    }
}
