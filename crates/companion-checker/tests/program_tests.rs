use super::*;
use crate::test_fixtures::{Fixture, by_name, by_type};

const SNAPSHOT: &str = r#"{
    "types": [
        { "name": "Scheduler", "namespace": "App.Core" },
        { "name": "Worker", "namespace": "App.Core" },
        { "name": "Job", "containing_type": 0, "kind": "struct" }
    ],
    "members": [
        {
            "name": "Enqueue",
            "kind": "method",
            "declaring_type": 0,
            "companions": [ { "type": 1 }, { "name": "" }, { "type": 1, "name": "x" } ]
        },
        {
            "name": "State",
            "kind": "property",
            "declaring_type": 0,
            "setter_companions": [ { "name": "App.Core.Worker" } ],
            "location": { "file": "Scheduler.cs", "start": 40, "length": 5 }
        }
    ],
    "units": [
        {
            "file_name": "Client.cs",
            "source_text": "q.Enqueue(); q.State = 1;",
            "nodes": [
                { "kind": "name", "text": "q" },
                { "kind": "name", "text": "Enqueue" },
                { "kind": "member_access", "expression": 0, "name": 1 },
                { "kind": "invocation", "callee": 2 },
                { "kind": "name", "text": "q" },
                { "kind": "name", "text": "State" },
                { "kind": "member_access", "expression": 4, "name": 5 },
                { "kind": "other" },
                { "kind": "assignment", "target": 6, "value": 7 }
            ],
            "references": [
                { "node": 3, "member": 0, "kind": "invocation", "enclosing_type": 2, "location": { "start": 0, "length": 11 } },
                { "node": 5, "member": 1, "kind": "property_reference", "location": { "start": 13, "length": 7 } }
            ]
        }
    ]
}"#;

#[test]
fn test_load_snapshot_from_json() {
    let program = Program::from_json(SNAPSHOT).expect("valid snapshot");

    assert_eq!(program.type_count(), 3);
    assert_eq!(program.member_count(), 2);
    assert_eq!(program.reference_count(), 2);
    assert_eq!(
        program.qualified_name(TypeId(2)).as_deref(),
        Some("App.Core.Scheduler.Job")
    );
    assert_eq!(
        program.type_decl(TypeId(2)).map(|decl| decl.kind),
        Some(TypeKind::Struct)
    );

    let enqueue = program.member_decl(MemberId(0)).expect("member 0");
    assert_eq!(enqueue.companions.as_slice(), &[by_type(TypeId(1))]);

    let state = program.member_decl(MemberId(1)).expect("member 1");
    assert_eq!(
        state.setter_companions.as_slice(),
        &[by_name("App.Core.Worker")]
    );
    assert_eq!(
        state.location.as_ref().map(|loc| loc.file.as_str()),
        Some("Scheduler.cs")
    );

    let unit = &program.units()[0];
    assert_eq!(unit.nodes.len(), 9);
    assert_eq!(unit.nodes.parent(NodeIndex(5)), Some(NodeIndex(6)));
    assert_eq!(unit.references[1].enclosing_type, None);
}

#[test]
fn test_checking_loaded_snapshot() {
    let program = Program::from_json(SNAPSHOT).expect("valid snapshot");
    let output = check_program(&program, CheckerOptions::default());

    // The nested Job is not a companion of Enqueue, and the top-level write
    // to State has no enclosing type.
    let starts: Vec<u32> = output.diagnostics.iter().map(|d| d.start).collect();
    assert_eq!(starts, vec![0, 13]);
    assert!(output.diagnostics.iter().all(|d| d.file == "Client.cs"));
}

#[test]
fn test_json_round_trip_preserves_program() {
    let program = Program::from_json(SNAPSHOT).expect("valid snapshot");
    let text = program.to_json_pretty().expect("serializable");
    let reloaded = Program::from_json(&text).expect("reloads");

    assert_eq!(ProgramData::from(reloaded), ProgramData::from(program));
}

#[test]
fn test_unknown_declaring_type_is_rejected() {
    let mut builder = ProgramBuilder::new();
    builder.add_type(TypeDecl::new("A"));
    builder.add_member(MemberDecl::new("Run", MemberKind::Method, TypeId(3)));
    assert_eq!(
        builder.build().err(),
        Some(ProgramError::UnknownDeclaringType {
            member: MemberId(0),
            declaring_type: TypeId(3),
        })
    );
}

#[test]
fn test_unknown_containing_type_is_rejected() {
    let mut builder = ProgramBuilder::new();
    let mut inner = TypeDecl::new("Inner");
    inner.containing_type = Some(TypeId(9));
    builder.add_type(inner);
    assert_eq!(
        builder.build().err(),
        Some(ProgramError::UnknownContainingType {
            ty: TypeId(0),
            containing_type: TypeId(9),
        })
    );
}

#[test]
fn test_containment_cycle_is_rejected() {
    let mut builder = ProgramBuilder::new();
    let mut a = TypeDecl::new("A");
    a.containing_type = Some(TypeId(1));
    let mut b = TypeDecl::new("B");
    b.containing_type = Some(TypeId(0));
    builder.add_type(a);
    builder.add_type(b);
    assert_eq!(
        builder.build().err(),
        Some(ProgramError::ContainmentCycle { ty: TypeId(0) })
    );
}

#[test]
fn test_accessor_companions_on_method_are_rejected() {
    let mut builder = ProgramBuilder::new();
    let ty = builder.add_type(TypeDecl::new("A"));
    let mut run = MemberDecl::new("Run", MemberKind::Method, ty);
    run.getter_companions = AnnotationList::new(vec![by_type(ty)]);
    builder.add_member(run);
    assert_eq!(
        builder.build().err(),
        Some(ProgramError::AccessorCompanionsOnNonProperty {
            member: MemberId(0),
            kind: MemberKind::Method,
        })
    );
}

#[test]
fn test_validation_error_surfaces_through_json() {
    let json = r#"{ "types": [], "members": [ { "name": "Run", "kind": "method", "declaring_type": 0 } ] }"#;
    let error = Program::from_json(json).expect_err("invalid snapshot");
    assert!(
        error.to_string().contains("unknown type 0"),
        "unexpected error: {error}"
    );
}

#[test]
fn test_invalid_arena_surfaces_through_json() {
    let json = r#"{ "units": [ { "file_name": "a.cs", "nodes": [ { "kind": "parenthesized", "expression": 4 } ] } ] }"#;
    let error = Program::from_json(json).expect_err("invalid arena");
    assert!(error.to_string().contains("does not exist"), "{error}");
}

#[test]
fn test_duplicate_qualified_name_resolves_to_first_type() {
    let mut fx = Fixture::new();
    let first = fx.class("Twin");
    fx.class("Twin");
    let program = fx.build();
    assert_eq!(program.find_type_by_qualified_name("App.Twin"), Some(first));
}

#[test]
fn test_types_and_members_iterators() {
    let mut fx = Fixture::new();
    let a = fx.class("A");
    let b = fx.class("B");
    let run = fx.method(b, "Run", vec![]);
    let program = fx.build();

    let types: Vec<TypeId> = program.types().map(|(id, _)| id).collect();
    assert_eq!(types, vec![a, b]);
    let members: Vec<(MemberId, TypeId)> = program
        .members()
        .map(|(id, decl)| (id, decl.declaring_type))
        .collect();
    assert_eq!(members, vec![(run, b)]);
}
