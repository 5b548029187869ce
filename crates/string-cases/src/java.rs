//! `java.lang.String` semantics the fixtures rely on
//!
//! Lengths and indices count `char`s; every fixture string is ASCII, where
//! that agrees with UTF-16 code units.

use case_oracle::{
    ArgsExt,
    ArgumentLiteral,
    Raised,
    SignalKind,
    Value,
};
use regex::Regex;

/// String argument used as a method receiver; `null` raises.
pub fn receiver(
    args: &[ArgumentLiteral],
    index: usize,
) -> Result<&str, Raised> {
    args.str_at(index)?.ok_or_else(|| {
        Raised::null_pointer(format!("argument {} is null", index))
    })
}

pub fn length(s: &str) -> i32 {
    s.chars().count() as i32
}

/// `assert condition;`
pub fn check(
    condition: bool,
    what: &str,
) -> Result<(), Raised> {
    if condition {
        Ok(())
    } else {
        Err(Raised::assertion(what))
    }
}

/// A `void` routine whose last statement is `assert condition;`.
pub fn verify(
    condition: bool,
    what: &str,
) -> Result<Value, Raised> {
    check(condition, what).map(|()| Value::Void)
}

pub fn char_at(
    s: &str,
    index: i32,
) -> Result<char, Raised> {
    usize::try_from(index)
        .ok()
        .and_then(|i| s.chars().nth(i))
        .ok_or_else(|| {
            Raised::out_of_bounds(format!(
                "Index {} out of bounds for length {}",
                index,
                length(s)
            ))
        })
}

/// Either bound outside `[0, length]` is reported before an inverted range.
pub fn substring(
    s: &str,
    start: i32,
    end: i32,
) -> Result<String, Raised> {
    let len = length(s);
    let in_bounds = |index: i32| (0..=len).contains(&index);
    if !in_bounds(start) || !in_bounds(end) {
        return Err(Raised::out_of_bounds(format!(
            "begin {}, end {}, length {}",
            start, end, len
        )));
    }
    if start > end {
        return Err(Raised::inverted_range(format!(
            "begin {}, end {}, length {}",
            start, end, len
        )));
    }
    Ok(s.chars()
        .skip(start as usize)
        .take((end - start) as usize)
        .collect())
}

/// `Integer.parseInt(s)`; a `null` input is a number format failure, not a
/// null dereference.
pub fn parse_int(s: Option<&str>) -> Result<i32, Raised> {
    let s = s.ok_or_else(|| Raised::number_format("Cannot parse null string: null"))?;
    s.parse()
        .map_err(|_| Raised::number_format(format!("For input string: \"{}\"", s)))
}

fn pattern(regex: &str) -> Result<Regex, Raised> {
    Regex::new(regex).map_err(|err| Raised::new(SignalKind::PatternSyntax, err.to_string()))
}

/// `s.split(regex)`: no leading empty piece from a zero-width match at the
/// start, trailing empty pieces removed.
pub fn split(
    s: &str,
    regex: &str,
) -> Result<Vec<String>, Raised> {
    if s.is_empty() {
        return Ok(vec![String::new()]);
    }
    let re = pattern(regex)?;
    let mut pieces = Vec::new();
    let mut last = 0;
    for found in re.find_iter(s) {
        if found.end() == 0 {
            continue;
        }
        pieces.push(&s[last..found.start()]);
        last = found.end();
    }
    if pieces.is_empty() {
        return Ok(vec![s.to_string()]);
    }
    pieces.push(&s[last..]);
    while pieces.last().is_some_and(|piece| piece.is_empty()) {
        pieces.pop();
    }
    Ok(pieces.into_iter().map(str::to_string).collect())
}

/// `s.matches(regex)`: the whole input has to match.
pub fn matches(
    s: &str,
    regex: &str,
) -> Result<bool, Raised> {
    let re = pattern(&format!("^(?:{})$", regex))?;
    Ok(re.is_match(s))
}

/// `s.trim()` strips every char up to and including U+0020.
pub fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c <= ' ')
}
