use pretty_assertions::assert_eq;

use crate::{
    ArgumentLiteral::{
        self,
        *,
    },
    CaseSpec,
    OutcomeKind,
    SpecError,
    parse_case,
};

fn parsed(text: &str) -> CaseSpec {
    match parse_case(text) {
        Ok(case) => case,
        Err(err) => panic!("`{}` did not parse: {}", text, err),
    }
}

#[test]
fn parses_mixed_arguments() {
    assert_eq!(
        parsed(r#"("hello", 2, 1) -> index range exception"#),
        CaseSpec::new(
            [Str("hello".into()), Int(2), Int(1)],
            OutcomeKind::IndexRange
        )
    );
    assert_eq!(
        parsed("(true, false, 'x', -7, null) -> ok"),
        CaseSpec::new(
            [Bool(true), Bool(false), Char('x'), Int(-7), Null],
            OutcomeKind::Ok
        )
    );
}

#[test]
fn empty_argument_list() {
    assert_eq!(parsed("() -> ok"), CaseSpec::new([], OutcomeKind::Ok));
    assert_eq!(parsed("(  )->ok"), CaseSpec::new([], OutcomeKind::Ok));
}

#[test]
fn null_is_not_empty_string_or_zero() {
    let null = parsed("(null) -> ok").arguments;
    let empty = parsed(r#"("") -> ok"#).arguments;
    let zero = parsed("(0) -> ok").arguments;
    assert_eq!(null, vec![Null]);
    assert_eq!(empty, vec![Str(String::new())]);
    assert_eq!(zero, vec![Int(0)]);
    assert_ne!(null, empty);
    assert_ne!(null, zero);
    assert!(null[0].is_null());
    assert!(!empty[0].is_null());
}

#[test]
fn string_escapes() {
    assert_eq!(
        parsed(r#"("a\"b\\c", "tab\there") -> ok"#).arguments,
        vec![Str("a\"b\\c".into()), Str("tab\there".into())]
    );
    assert_eq!(parsed(r"('\'') -> ok").arguments, vec![Char('\'')]);
}

#[test]
fn integer_bounds() {
    assert_eq!(
        parsed("(-2147483648, 2147483647) -> ok").arguments,
        vec![Int(i32::MIN), Int(i32::MAX)]
    );
    assert_eq!(
        parse_case("(2147483648) -> ok"),
        Err(SpecError::IntegerOutOfRange {
            text: "2147483648".into(),
            offset: 1,
        })
    );
}

#[test]
fn outcome_tokens_are_whole_and_case_insensitive() {
    assert_eq!(
        parsed("(1) -> Null  Pointer Exception").expected,
        OutcomeKind::NullPointer
    );
    assert_eq!(
        parse_case("(1) -> index"),
        Err(SpecError::UnknownOutcome("index".into()))
    );
    assert_eq!(
        parse_case("(1) -> ok ok"),
        Err(SpecError::UnknownOutcome("ok ok".into()))
    );
}

#[test]
fn malformed_text_reports_position() {
    let cases: Vec<(&str, SpecError)> = vec![
        (
            "1) -> ok",
            SpecError::Unexpected {
                found: '1',
                offset: 0,
                expected: "'('",
            },
        ),
        (
            r#"("abc) -> ok"#,
            SpecError::Unterminated {
                what: "string",
                offset: 1,
            },
        ),
        (
            "(1, ) -> ok",
            SpecError::Unexpected {
                found: ')',
                offset: 4,
                expected: "a literal",
            },
        ),
        (
            "(1 -> ok",
            SpecError::Unexpected {
                found: '-',
                offset: 3,
                expected: "',' or ')'",
            },
        ),
        (
            "(maybe) -> ok",
            SpecError::UnknownLiteral {
                word: "maybe".into(),
                offset: 1,
            },
        ),
        (
            "(-) -> ok",
            SpecError::Unexpected {
                found: ')',
                offset: 2,
                expected: "a digit",
            },
        ),
        (
            r#"("\q") -> ok"#,
            SpecError::BadEscape {
                escape: 'q',
                offset: 2,
            },
        ),
        ("('ab') -> ok", SpecError::BadChar { offset: 1 }),
        ("('') -> ok", SpecError::BadChar { offset: 1 }),
        (
            "(1)",
            SpecError::UnexpectedEnd {
                expected: "'->'",
            },
        ),
    ];
    for (text, expected) in cases {
        assert_eq!(parse_case(text), Err(expected), "parsing `{}`", text);
    }
}

#[test]
fn canonical_text_round_trips() {
    for text in [
        "() -> ok",
        "(null) -> null pointer exception",
        r#"("") -> ok"#,
        r#"("hello", 0, 6) -> index out of bounds"#,
        r#"("say \"hi\"", "back\\slash") -> assertion error"#,
        "(true, 'c', -1) -> number format exception",
        r#"("a\nb", '\'') -> index range exception"#,
    ] {
        let case = parsed(text);
        assert_eq!(case.to_string(), text);
        assert_eq!(parsed(&case.to_string()), case);
    }
}

#[test]
fn rendering_normalizes_spacing_and_case() {
    let case = parsed(r#"  (  "x" ,1 )  ->   INDEX Out Of Bounds "#);
    assert_eq!(case.to_string(), r#"("x", 1) -> index out of bounds"#);
    assert_eq!(case.render_arguments(), r#"("x", 1)"#);
}

#[test]
fn literal_conversions() {
    assert_eq!(ArgumentLiteral::from(Some("a")), Str("a".into()));
    assert_eq!(ArgumentLiteral::from(None::<&str>), Null);
    assert_eq!(ArgumentLiteral::from(3), Int(3));
}
