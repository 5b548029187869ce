use std::{
    collections::BTreeSet,
    time::Duration,
};

use case_oracle::{
    CaseRegistry,
    Observed,
    Oracle,
    OutcomeKind,
    Report,
    RoutineId,
    Runner,
    Summary,
    Tag,
    Verdict,
    init_test_tracing,
    parse_case,
    scan_source,
};
use pretty_assertions::assert_eq;
use string_cases::{
    declarations,
    registry,
    routine_table,
};

fn fixtures() -> (CaseRegistry, Oracle) {
    (registry().unwrap(), Oracle::new(routine_table()))
}

fn observe(
    oracle: &Oracle,
    routine: &str,
    arity: usize,
    case: &str,
) -> Observed {
    let case = parse_case(case).unwrap();
    oracle.observe(&RoutineId::new(routine, arity), &case.arguments)
}

#[test]
fn every_declaration_has_a_routine() {
    let table = routine_table();
    let declarations = declarations();
    assert_eq!(table.len(), declarations.len());
    for declaration in &declarations {
        assert!(table.contains(&declaration.routine_id()), "{}", declaration.name);
    }
    let registry = registry().unwrap();
    assert_eq!(registry.len(), 50);
    assert_eq!(registry.case_count(), 121);
}

#[test]
fn null_length_is_a_null_pointer() {
    let _tracing = init_test_tracing!();
    let (_, oracle) = fixtures();
    assert_eq!(
        observe(&oracle, "getLength", 1, "(null) -> ok"),
        Observed::from(OutcomeKind::NullPointer)
    );
}

#[test]
fn empty_length_is_ok() {
    let (_, oracle) = fixtures();
    assert_eq!(
        observe(&oracle, "getLength", 1, "(\"\") -> ok"),
        Observed::from(OutcomeKind::Ok)
    );
}

#[test]
fn substring_index_kinds_stay_apart() {
    let (_, oracle) = fixtures();
    assert_eq!(
        observe(&oracle, "getSubstring", 3, "(\"hello\", 2, 1) -> ok"),
        Observed::from(OutcomeKind::IndexRange)
    );
    assert_eq!(
        observe(&oracle, "getSubstring", 3, "(\"hello\", 0, 6) -> ok"),
        Observed::from(OutcomeKind::IndexOutOfBounds)
    );
    // out of bounds wins over an inverted range
    assert_eq!(
        observe(&oracle, "getSubstring", 3, "(\"hello\", 4, 9) -> ok"),
        Observed::from(OutcomeKind::IndexOutOfBounds)
    );
    // a negative end or a start past the receiver is never an inverted range
    assert_eq!(
        observe(&oracle, "getSubstring", 3, "(\"hello\", 0, -1) -> ok"),
        Observed::from(OutcomeKind::IndexOutOfBounds)
    );
    assert_eq!(
        observe(&oracle, "getSubstring", 3, "(\"hello\", 6, 5) -> ok"),
        Observed::from(OutcomeKind::IndexOutOfBounds)
    );
    assert_eq!(
        observe(&oracle, "getSubstring", 3, "(\"hello\", 5, 5) -> ok"),
        Observed::from(OutcomeKind::Ok)
    );
    assert_eq!(
        observe(&oracle, "getCharAt", 2, "(\"seventeen\", 9) -> ok"),
        Observed::from(OutcomeKind::IndexOutOfBounds)
    );
}

#[test]
fn decimal_text_is_a_number_format_failure() {
    let (_, oracle) = fixtures();
    assert_eq!(
        observe(&oracle, "parseToInt", 1, "(\"12.3\") -> ok"),
        Observed::from(OutcomeKind::NumberFormat)
    );
}

#[test]
fn tag_index_selects_by_tag() {
    let (registry, _) = fixtures();
    let loop_id = RoutineId::new("repeatStringLoop", 1);
    let with_loop = registry.routines_with_tag(&Tag::from("LOOP"));
    assert!(with_loop.contains(&&loop_id));
    assert_eq!(
        with_loop.iter().map(|id| id.name.as_str()).collect::<Vec<_>>(),
        vec![
            "repeatStringLoop",
            "repeatStringLoopBounded",
            "buildStringWithLength",
        ]
    );
    let with_call = registry.routines_with_tag(&Tag::from("CALL"));
    assert!(!with_call.contains(&&loop_id));
    assert_eq!(with_call, vec![&RoutineId::new("stringBuilderConcat", 0)]);

    let counts: Vec<(&str, usize)> = registry
        .tag_counts()
        .into_iter()
        .map(|(tag, count)| (tag.as_str(), count))
        .collect();
    assert_eq!(counts, vec![("STRING", 33), ("LOOP", 3), ("CALL", 1)]);
}

#[test]
fn every_outcome_kind_is_observed() {
    let (registry, oracle) = fixtures();
    let observed: BTreeSet<OutcomeKind> = registry
        .all_routines()
        .flat_map(|entry| {
            entry
                .cases
                .iter()
                .filter_map(|case| oracle.observe(&entry.id, &case.arguments).outcome())
                .collect::<Vec<_>>()
        })
        .collect();
    assert_eq!(
        observed,
        BTreeSet::from([
            OutcomeKind::Ok,
            OutcomeKind::AssertionError,
            OutcomeKind::NullPointer,
            OutcomeKind::IndexOutOfBounds,
            OutcomeKind::IndexRange,
            OutcomeKind::NumberFormat,
        ])
    );
}

/// Declared cases whose routine body does something else.
fn known_mismatches() -> Vec<(&'static str, usize, OutcomeKind)> {
    vec![
        ("parseToInt", 0, OutcomeKind::NumberFormat),
        ("assertValidEmail", 11, OutcomeKind::Ok),
        ("concatWithLengthParameter", 0, OutcomeKind::AssertionError),
        ("conditionalConcat", 1, OutcomeKind::Ok),
        ("buildStringWithLength", 1, OutcomeKind::Ok),
        ("prefixAndLengthCheck", 0, OutcomeKind::AssertionError),
        ("repeatWithLength", 1, OutcomeKind::Ok),
        ("multiParameterStringLength", 1, OutcomeKind::Ok),
    ]
}

fn mismatches(report: &Report) -> Vec<(&str, usize, OutcomeKind)> {
    report
        .failures()
        .filter_map(|row| match &row.verdict {
            Verdict::Fail { observed, .. } => observed
                .outcome()
                .map(|outcome| (row.routine.name.as_str(), row.case_index, outcome)),
            Verdict::Pass => None,
        })
        .collect()
}

#[test]
fn full_run_only_fails_known_mismatches() {
    let _tracing = init_test_tracing!();
    let (registry, oracle) = fixtures();
    let report = Runner::new(&registry, oracle).run();
    assert_eq!(
        report.summary,
        Summary {
            total: 121,
            passed: 113,
            mismatched: 8,
            infrastructure: 0,
        }
    );
    assert_eq!(mismatches(&report), known_mismatches());
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn parallel_and_isolated_runs_agree() {
    let (registry, oracle) = fixtures();
    let serial = Runner::new(&registry, oracle.clone()).run();
    let parallel = Runner::new(&registry, oracle.clone()).threads(4).run();
    let isolated = Runner::new(&registry, oracle.with_timeout(Duration::from_secs(10)))
        .threads(2)
        .run();
    assert_eq!(serial, parallel);
    assert_eq!(serial, isolated);
}

#[test]
fn evaluation_is_idempotent() {
    let (registry, oracle) = fixtures();
    for entry in registry.all_routines() {
        for case in &entry.cases {
            assert_eq!(oracle.evaluate(entry, case), oracle.evaluate(entry, case));
        }
    }
}

#[test]
fn tagged_run_covers_loop_routines_only() {
    let (registry, oracle) = fixtures();
    let report = Runner::new(&registry, oracle).with_tag(Tag::from("LOOP")).run();
    assert_eq!(report.summary.total, 6);
    assert_eq!(
        mismatches(&report),
        vec![("buildStringWithLength", 1, OutcomeKind::Ok)]
    );
}

const ANNOTATED: &str = r#"
public class Strings {

    @Case("(null) -> null pointer exception")
    @Case("(\"\") -> ok")
    @Case("(\"hello\") -> ok")
    public static int getLength(String s) {
        return s.length();
    }

    @Case("(1) -> ok")
    @Case("(0) -> assertion error")
    @Tag({ STRING, LOOP })
    public static void repeatStringLoop(int times) {
        assert times > 0;
    }

    public static String concatenate(String a, String b) {
        return a + b;
    }
}
"#;

#[test]
fn scanned_source_matches_built_in_declarations() {
    let scanned = scan_source(ANNOTATED).unwrap();
    let built_in = declarations();
    let expected: Vec<_> = ["getLength", "repeatStringLoop"]
        .iter()
        .filter_map(|name| built_in.iter().find(|d| d.name == *name).cloned())
        .collect();
    assert_eq!(scanned, expected);

    let registry = CaseRegistry::from_declarations(&scanned).unwrap();
    let report = Runner::new(&registry, Oracle::new(routine_table())).run();
    assert!(report.summary.all_passed(), "{}", report);
}
