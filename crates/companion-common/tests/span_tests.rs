use crate::span::{SourceLocation, Span};

#[test]
fn span_bounds() {
    let span = Span::new(4, 3);
    assert_eq!(span.end(), 7);
    assert!(span.contains(4));
    assert!(span.contains(6));
    assert!(!span.contains(7));
    assert!(!span.is_empty());
}

#[test]
fn inverted_bounds_give_empty_span() {
    let span = Span::from_bounds(10, 2);
    assert_eq!(span, Span::new(10, 0));
    assert!(span.is_empty());
    assert!(!span.contains(10));
}

#[test]
fn source_location_flattens_span_fields() {
    let loc: SourceLocation =
        serde_json::from_str(r#"{ "file": "a.cs", "start": 5, "length": 2 }"#).unwrap();
    assert_eq!(loc, SourceLocation::new("a.cs", Span::new(5, 2)));
}

#[test]
fn source_location_file_defaults_to_empty() {
    let loc: SourceLocation = serde_json::from_str(r#"{ "start": 1, "length": 1 }"#).unwrap();
    assert!(loc.file.is_empty());
    assert_eq!(loc.span, Span::new(1, 1));
}
