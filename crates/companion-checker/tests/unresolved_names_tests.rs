use super::*;
use crate::diagnostics::{DiagnosticCategory, diagnostic_codes};
use crate::test_fixtures::{Fixture, by_name, by_type};
use crate::unresolved_names::check_unresolved_companion_names;
use companion_common::SourceLocation;

#[test]
fn test_resolved_names_and_type_refs_are_quiet() {
    let mut fx = Fixture::new();
    let owner = fx.class("Owner");
    let friend = fx.class("Friend");
    fx.restrict_type(owner, vec![by_name("App.Friend")]);
    fx.method(owner, "Run", vec![by_type(friend)]);
    let program = fx.build();

    assert!(check_unresolved_companion_names(&program).is_empty());
}

#[test]
fn test_each_unresolved_occurrence_is_reported() {
    let mut fx = Fixture::new();
    let owner = fx.class("Owner");
    fx.restrict_type(owner, vec![by_name("App.Ghost")]);
    fx.method(owner, "Run", vec![by_name("App.Ghost")]);
    fx.property(
        owner,
        "Value",
        vec![],
        vec![by_name("App.Reader")],
        vec![by_name("App.Writer")],
    );
    let program = fx.build();

    let diagnostics = check_unresolved_companion_names(&program);
    assert_eq!(diagnostics.len(), 4);
    assert!(diagnostics.iter().all(|d| {
        d.category == DiagnosticCategory::Warning
            && d.code == diagnostic_codes::COMPANION_NAME_DOES_NOT_MATCH_ANY_TYPE
    }));
    assert!(
        diagnostics
            .iter()
            .any(|d| d.message_text.contains("'App.Writer'"))
    );
}

#[test]
fn test_warning_is_anchored_at_declaration() {
    let mut builder = ProgramBuilder::new();
    let mut owner = TypeDecl::new("Owner");
    owner.companions = AnnotationList::new(vec![by_name("Missing")]);
    owner.location = Some(SourceLocation::new("Owner.cs", companion_common::Span::new(12, 5)));
    builder.add_type(owner);
    let program = builder.build().expect("valid program");

    let diagnostics = check_unresolved_companion_names(&program);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].file, "Owner.cs");
    assert_eq!((diagnostics[0].start, diagnostics[0].length), (12, 5));
}

#[test]
fn test_unanchored_declaration_reports_empty_location() {
    let mut fx = Fixture::new();
    let owner = fx.class("Owner");
    fx.method(owner, "Run", vec![by_name("Nowhere")]);
    let program = fx.build();

    let diagnostics = check_unresolved_companion_names(&program);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].file, "");
    assert_eq!(diagnostics[0].start, 0);
}
