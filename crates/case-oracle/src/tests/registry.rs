use indexmap::IndexSet;
use pretty_assertions::assert_eq;

use crate::{
    ArgumentLiteral,
    CaseRegistry,
    CaseSpec,
    Declaration,
    OutcomeKind,
    ParamKind,
    RegistryError,
    RoutineId,
    SpecError,
    Tag,
    init_test_tracing,
    tests::env::test_registry,
};

fn case(text: &str) -> CaseSpec {
    match text.parse() {
        Ok(case) => case,
        Err(err) => panic!("`{}` did not parse: {}", text, err),
    }
}

#[test]
fn keeps_registration_order() {
    let _tracing = init_test_tracing!();
    let registry = test_registry();
    let names: Vec<&str> = registry
        .all_routines()
        .map(|entry| entry.id.name.as_str())
        .collect();
    assert_eq!(names, vec!["length", "slice", "positive", "number", "unit"]);
    assert_eq!(registry.len(), 5);
    assert_eq!(registry.case_count(), 11);
}

#[test]
fn lookup_by_identifier_and_name() {
    let registry = test_registry();
    let slice = registry.lookup(&RoutineId::new("slice", 3));
    assert_eq!(slice.map(|entry| entry.cases.len()), Some(3));
    assert!(registry.lookup(&RoutineId::new("slice", 2)).is_none());
    assert!(registry.lookup(&RoutineId::new("missing", 0)).is_none());
    assert_eq!(
        registry.lookup_name("number").map(|entry| entry.id.clone()),
        Some(RoutineId::new("number", 1))
    );
}

#[test]
fn cases_keep_declaration_order() {
    let registry = test_registry();
    let entry = registry.lookup(&RoutineId::new("length", 1));
    let expected: Vec<OutcomeKind> = entry
        .map(|entry| entry.cases.iter().map(|case| case.expected).collect())
        .unwrap_or_default();
    assert_eq!(
        expected,
        vec![OutcomeKind::NullPointer, OutcomeKind::Ok, OutcomeKind::Ok]
    );
}

#[test]
fn re_registration_merges() {
    let _tracing = init_test_tracing!();
    let mut registry = CaseRegistry::new();
    let id = RoutineId::new("getLength", 1);
    registry
        .register(
            id.clone(),
            vec![ParamKind::Str],
            [Tag::new("STRING")],
            vec![case("(null) -> null pointer exception")],
        )
        .map(|_| ())
        .unwrap_or_else(|err| panic!("{}", err));
    registry
        .register(
            id.clone(),
            vec![ParamKind::Str],
            [Tag::new("LOOP"), Tag::new("STRING")],
            vec![case(r#"("") -> ok"#), case(r#"("abc") -> ok"#)],
        )
        .map(|_| ())
        .unwrap_or_else(|err| panic!("{}", err));

    let entry = registry.lookup(&id).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(
        entry.cases,
        vec![
            case("(null) -> null pointer exception"),
            case(r#"("") -> ok"#),
            case(r#"("abc") -> ok"#),
        ]
    );
    assert_eq!(
        entry.tags,
        IndexSet::from([Tag::new("STRING"), Tag::new("LOOP")])
    );
}

#[test]
fn malformed_case_fails_the_build() {
    let declarations = [
        Declaration::new("ok", [ParamKind::Int]).case("(1) -> ok"),
        Declaration::new("broken", [ParamKind::Int])
            .case("(1) -> ok")
            .case("(2) -> maybe"),
    ];
    assert_eq!(
        CaseRegistry::from_declarations(&declarations).unwrap_err(),
        RegistryError::Malformed {
            routine: RoutineId::new("broken", 1),
            index: 1,
            text: "(2) -> maybe".into(),
            source: SpecError::UnknownOutcome("maybe".into()),
        }
    );
}

#[test]
fn arity_mismatch_is_a_spec_error() {
    let declaration = Declaration::new("pair", [ParamKind::Int, ParamKind::Int]).case("(1) -> ok");
    assert_eq!(
        CaseRegistry::new().declare(&declaration).unwrap_err(),
        RegistryError::ArityMismatch {
            routine: RoutineId::new("pair", 2),
            case: "(1) -> ok".into(),
            found: 1,
        }
    );
}

#[test]
fn literal_must_fit_parameter_kind() {
    let mismatches = [
        (ParamKind::Int, "(null) -> ok", "null"),
        (ParamKind::Int, r#"("1") -> ok"#, r#""1""#),
        (ParamKind::Bool, "(1) -> ok", "1"),
        (ParamKind::Char, r#"("c") -> ok"#, r#""c""#),
        (ParamKind::Str, "('c') -> ok", "'c'"),
    ];
    for (param, text, literal) in mismatches {
        let declaration = Declaration::new("f", [param]).case(text);
        assert_eq!(
            CaseRegistry::new().declare(&declaration).unwrap_err(),
            RegistryError::TypeMismatch {
                routine: RoutineId::new("f", 1),
                case: case(text).to_string(),
                position: 0,
                literal: literal.into(),
                expected: param,
            }
        );
    }
}

#[test]
fn null_fits_reference_kinds() {
    for param in [ParamKind::Str, ParamKind::StrArray, ParamKind::IntArray] {
        let declaration = Declaration::new("f", [param]).case("(null) -> null pointer exception");
        assert!(CaseRegistry::new().declare(&declaration).is_ok());
    }
    assert!(ParamKind::Str.accepts(&ArgumentLiteral::Null));
    assert!(!ParamKind::Char.accepts(&ArgumentLiteral::Null));
}

#[test]
fn conflicting_signature_is_rejected() {
    let mut registry = CaseRegistry::new();
    let first = Declaration::new("f", [ParamKind::Int]).case("(1) -> ok");
    let second = Declaration::new("f", [ParamKind::Str]).case("(null) -> ok");
    assert!(registry.declare(&first).is_ok());
    assert_eq!(
        registry.declare(&second).unwrap_err(),
        RegistryError::SignatureConflict {
            routine: RoutineId::new("f", 1),
            existing: vec![ParamKind::Int],
            found: vec![ParamKind::Str],
        }
    );
    assert_eq!(registry.case_count(), 1);
}

#[test]
fn signature_must_match_arity() {
    assert_eq!(
        CaseRegistry::new()
            .register(RoutineId::new("f", 2), vec![ParamKind::Int], [], vec![])
            .unwrap_err(),
        RegistryError::SignatureArity {
            routine: RoutineId::new("f", 2),
            declared: 1,
        }
    );
}

#[test]
fn error_messages_name_the_routine() {
    let declaration = Declaration::new("pair", [ParamKind::Int, ParamKind::Int]).case("(1) -> ok");
    let message = CaseRegistry::new()
        .declare(&declaration)
        .unwrap_err()
        .to_string();
    assert_eq!(
        message,
        "pair/2: case `(1) -> ok` passes 1 arguments, routine takes 2"
    );
}
