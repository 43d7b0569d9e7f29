//! Integration tests for parsing resource paths into segment chains.

use odatapath::segment::{
    reverse, NamedValue, Parser, ReverseOptions, ReverseStrategy, SegmentError,
};

#[test]
fn test_parse_then_reverse() {
    let path = Parser::parse("Customers/Orders(Id=5)/$count").unwrap();
    let reversed = reverse(Some(&path)).unwrap();

    let names: Vec<&str> = reversed.iter().map(|s| s.identifier()).collect();
    assert_eq!(names, vec!["$count", "Orders", "Customers"]);
    assert_eq!(
        reversed.next().unwrap().named_values(),
        &[NamedValue::named("Id", "5")]
    );
}

#[test]
fn test_parse_with_iterative_strategy() {
    let options = ReverseOptions {
        strategy: ReverseStrategy::Iterative,
        ..ReverseOptions::default()
    };
    let recursive = Parser::parse("A/B(1)/C/$ref").unwrap();
    let iterative = Parser::parse_with("A/B(1)/C/$ref", &options).unwrap();
    assert_eq!(recursive, iterative);
}

#[test]
fn test_parse_long_path_past_recursion_limit() {
    let text = (0..1000)
        .map(|i| format!("S{}", i))
        .collect::<Vec<_>>()
        .join("/");
    let path = Parser::parse(&text).unwrap();
    assert_eq!(path.len(), 1000);
    assert_eq!(path.identifier(), "S0");
    assert_eq!(path.iter().last().unwrap().identifier(), "S999");
}

#[test]
fn test_parsed_path_displays_as_written() {
    for text in [
        "Customers",
        "Customers('ALFKI')",
        "Customers('ALFKI')/Orders",
        "Orders(Id=5)/$count",
        "Lines(OrderId=1,Line=2)/Product/$value",
        "People('O''Neil')/NS.Employee/Manager/$ref",
    ] {
        assert_eq!(Parser::parse(text).unwrap().to_string(), text);
    }
}

#[test]
fn test_parsed_path_serializes_to_json() {
    let path = Parser::parse("Orders(5)/$count").unwrap();
    let json = serde_json::to_string(&path).unwrap();
    assert_eq!(
        json,
        r#"[{"kind":"regular","identifier":"Orders","named_values":[{"name":null,"value":"5"}]},{"kind":"system","identifier":"$count","named_values":[]}]"#
    );
}

#[test]
fn test_parse_errors_report_position() {
    let err = Parser::parse("Orders(Id=5]").unwrap_err();
    assert_eq!(
        err,
        SegmentError::UnexpectedToken {
            position: 11,
            found: "]".to_string(),
            expected: "',' or ')'".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "Unexpected token ']' at position 11, expected ',' or ')'"
    );
}

#[test]
fn test_unexpected_end_reports_position() {
    let err = Parser::parse("Orders(Id=5").unwrap_err();
    assert_eq!(
        err,
        SegmentError::UnexpectedEnd {
            position: 11,
            expected: "')'".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "Unexpected end of input at position 11, expected ')'"
    );

    assert!(matches!(
        Parser::parse(""),
        Err(SegmentError::UnexpectedEnd { position: 0, .. })
    ));
}
