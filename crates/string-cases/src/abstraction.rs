//! Routines over string constants for finite-height string analysis:
//! concatenation, length, prefixes, substrings and loops that grow a string.
//!
//! Each one ends in an assertion about the string it built.

use case_oracle::{
    ArgsExt,
    ArgumentLiteral,
    Raised,
    Value,
};
use tracing::trace;

use crate::java::{
    check,
    length,
    substring,
    verify,
};

type Outcome = Result<Value, Raised>;

pub fn empty_string(_: &[ArgumentLiteral]) -> Outcome {
    verify(length("") == 0, "s.length() == 0")
}

pub fn single_char_string(_: &[ArgumentLiteral]) -> Outcome {
    verify(length("a") == 1, "s.length() == 1")
}

pub fn multi_char_string(_: &[ArgumentLiteral]) -> Outcome {
    verify(length("hello") == 5, "s.length() == 5")
}

fn concat_has_length(
    s1: &str,
    s2: &str,
    expected: i32,
) -> Outcome {
    let result = format!("{}{}", s1, s2);
    verify(length(&result) == expected, "result.length() == expected")
}

pub fn concat_empty_strings(_: &[ArgumentLiteral]) -> Outcome {
    concat_has_length("", "", 0)
}

pub fn concat_empty_with_non_empty(_: &[ArgumentLiteral]) -> Outcome {
    concat_has_length("", "hello", 5)
}

pub fn concat_non_empty_with_empty(_: &[ArgumentLiteral]) -> Outcome {
    concat_has_length("hello", "", 5)
}

pub fn concat_two_non_empty_strings(_: &[ArgumentLiteral]) -> Outcome {
    concat_has_length("hello", "world", 10)
}

pub fn concat_multiple_strings(_: &[ArgumentLiteral]) -> Outcome {
    let result = ["a", "b", "c"].concat();
    verify(length(&result) == 3, "result.length() == 3")
}

pub fn concat_with_length_parameter(args: &[ArgumentLiteral]) -> Outcome {
    concat_has_length("cat", "dog", args.int_at(0)?)
}

pub fn assert_string_length(args: &[ArgumentLiteral]) -> Outcome {
    let expected = args.int_at(0)?;
    verify(length("hello") == expected, "s.length() == expectedLen")
}

pub fn assert_concat_length(args: &[ArgumentLiteral]) -> Outcome {
    concat_has_length("hello", "world", args.int_at(0)?)
}

pub fn assert_empty_string_length(args: &[ArgumentLiteral]) -> Outcome {
    let n = args.int_at(0)?;
    verify(length("") == n, "s.length() == n")
}

pub fn check_prefix(_: &[ArgumentLiteral]) -> Outcome {
    verify("carpet".starts_with("car"), "s.startsWith(\"car\")")
}

pub fn check_non_prefix(_: &[ArgumentLiteral]) -> Outcome {
    verify(!"carpet".starts_with("dog"), "!s.startsWith(\"dog\")")
}

pub fn check_single_char_prefix(_: &[ArgumentLiteral]) -> Outcome {
    verify("hello".starts_with('h'), "s.startsWith(\"h\")")
}

pub fn check_full_string_as_prefix(_: &[ArgumentLiteral]) -> Outcome {
    verify("hello".starts_with("hello"), "s.startsWith(\"hello\")")
}

pub fn check_empty_string_prefix(_: &[ArgumentLiteral]) -> Outcome {
    verify("hello".starts_with(""), "s.startsWith(\"\")")
}

/// Both branches keep the `hello` prefix.
pub fn conditional_concat(args: &[ArgumentLiteral]) -> Outcome {
    let suffix = if args.bool_at(0)? { "world" } else { "xyz" };
    let result = format!("hello{}", suffix);
    verify(result.starts_with("hello"), "result.startsWith(\"hello\")")
}

pub fn conditional_length(args: &[ArgumentLiteral]) -> Outcome {
    let n = args.int_at(0)?;
    if n == 5 {
        verify(length("hello") == n, "s.length() == n")
    } else {
        verify(false, "unreachable branch")
    }
}

pub fn repeat_string_loop(args: &[ArgumentLiteral]) -> Outcome {
    let times = args.int_at(0)?;
    check(times > 0, "times > 0")?;
    let mut s = String::from("a");
    for _ in 0..times {
        s.push('b');
    }
    trace!(%s, "repeated");
    verify(length(&s) >= 1, "s.length() >= 1")
}

pub fn repeat_string_loop_bounded(args: &[ArgumentLiteral]) -> Outcome {
    let times = args.int_at(0)?;
    check(times > 0, "times > 0")?;
    let mut s = String::from("x");
    let mut len = 1;
    for _ in 0..times {
        s.push('y');
        len += 1;
    }
    verify(len == times + 1, "length == times + 1")
}

pub fn build_string_with_length(args: &[ArgumentLiteral]) -> Outcome {
    let target = args.int_at(0)?;
    check(target > 0, "targetLen > 0")?;
    let s: String = (0..target).map(|_| 'x').collect();
    verify(length(&s) == target, "s.length() == targetLen")
}

pub fn substring_from_start(_: &[ArgumentLiteral]) -> Outcome {
    let sub = substring("hello", 0, 3)?;
    verify(length(&sub) == 3, "sub.length() == 3")
}

pub fn substring_from_middle(_: &[ArgumentLiteral]) -> Outcome {
    let sub = substring("hello", 1, 4)?;
    verify(length(&sub) == 3, "sub.length() == 3")
}

pub fn substring_full_string(_: &[ArgumentLiteral]) -> Outcome {
    let sub = substring("hello", 0, 5)?;
    verify(sub == "hello", "sub.equals(s)")
}

pub fn string_equality(_: &[ArgumentLiteral]) -> Outcome {
    let (s1, s2) = ("hello", String::from("hello"));
    verify(s1 == s2, "s1.equals(s2)")
}

pub fn string_inequality(_: &[ArgumentLiteral]) -> Outcome {
    let (s1, s2) = ("hello", "world");
    verify(s1 != s2, "!s1.equals(s2)")
}

pub fn concat_and_compare(_: &[ArgumentLiteral]) -> Outcome {
    let result = format!("{}{}", "hello", "world");
    verify(result == "helloworld", "result.equals(\"helloworld\")")
}

pub fn chained_concat(_: &[ArgumentLiteral]) -> Outcome {
    let result = ["a", "b", "c"].concat();
    check(length(&result) == 3, "result.length() == 3")?;
    verify(result.starts_with('a'), "result.startsWith(\"a\")")
}

pub fn prefix_and_length_check(args: &[ArgumentLiteral]) -> Outcome {
    let expected = args.int_at(0)?;
    let result = format!("{}{}", "car", "pet");
    check(length(&result) == expected, "result.length() == expectedLen")?;
    verify(result.starts_with("car"), "result.startsWith(\"car\")")
}

/// Helper called through [`string_builder_concat`]; it has no cases of its own.
fn join(
    a: &str,
    b: &str,
) -> String {
    format!("{}{}", a, b)
}

pub fn string_builder_concat(_: &[ArgumentLiteral]) -> Outcome {
    let result = join("Hello", "World");
    verify(length(&result) == 10, "result.length() == 10")
}

pub fn repeat_with_length(args: &[ArgumentLiteral]) -> Outcome {
    let len = args.int_at(0)?;
    let mut result = String::from("x");
    for _ in 1..len {
        result.push('x');
    }
    verify(length(&result) == len, "result.length() == len")
}

pub fn null_check_prevented(_: &[ArgumentLiteral]) -> Outcome {
    let s = Some("notNull");
    verify(s.is_some(), "s != null")
}

pub fn empty_string_after_conditional(_: &[ArgumentLiteral]) -> Outcome {
    let s = "";
    verify(length(s) == 0, "s.length() == 0")
}

pub fn prefix_of_empty_string(_: &[ArgumentLiteral]) -> Outcome {
    verify("".starts_with(""), "s.startsWith(\"\")")
}

/// Grows `s` from its first char until it is `len` chars long.
fn grown(
    first: char,
    len: i32,
) -> String {
    std::iter::repeat_n(first, len.max(1) as usize).collect()
}

pub fn multi_parameter_string_length(args: &[ArgumentLiteral]) -> Outcome {
    let (len1, len2) = (args.int_at(0)?, args.int_at(1)?);
    let (s1, s2) = (grown('a', len1), grown('b', len2));
    check(length(&s1) == len1, "s1.length() == len1")?;
    verify(length(&s2) == len2, "s2.length() == len2")
}
