//! Single-call string routines: each body is one `String` method applied to
//! the arguments.

use case_oracle::{
    ArgsExt,
    ArgumentLiteral,
    Raised,
    Value,
};
use tracing::debug;

use crate::java::{
    self,
    receiver,
};

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9_+.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";

pub fn get_length(args: &[ArgumentLiteral]) -> Result<Value, Raised> {
    Ok(Value::Int(java::length(receiver(args, 0)?)))
}

pub fn assert_not_empty(args: &[ArgumentLiteral]) -> Result<Value, Raised> {
    let s = args.str_at(0)?;
    java::verify(s.is_some_and(|s| !s.is_empty()), "s != null && !s.isEmpty()")
}

/// `s1.concat(s2)` dereferences both sides.
pub fn concatenate(args: &[ArgumentLiteral]) -> Result<Value, Raised> {
    let (s1, s2) = (receiver(args, 0)?, receiver(args, 1)?);
    Ok(Value::Str(format!("{}{}", s1, s2)))
}

pub fn get_char_at(args: &[ArgumentLiteral]) -> Result<Value, Raised> {
    let s = receiver(args, 0)?;
    java::char_at(s, args.int_at(1)?).map(Value::Char)
}

pub fn get_substring(args: &[ArgumentLiteral]) -> Result<Value, Raised> {
    let s = receiver(args, 0)?;
    let (start, end) = (args.int_at(1)?, args.int_at(2)?);
    java::substring(s, start, end).map(Value::Str)
}

pub fn check_contains(args: &[ArgumentLiteral]) -> Result<Value, Raised> {
    let (s, substr) = (receiver(args, 0)?, receiver(args, 1)?);
    Ok(Value::Bool(s.contains(substr)))
}

pub fn parse_to_int(args: &[ArgumentLiteral]) -> Result<Value, Raised> {
    java::parse_int(args.str_at(0)?).map(Value::Int)
}

/// `s1.equals(s2)`: only the receiver has to be present.
pub fn compare_strings(args: &[ArgumentLiteral]) -> Result<Value, Raised> {
    let s1 = receiver(args, 0)?;
    Ok(Value::Bool(args.str_at(1)? == Some(s1)))
}

pub fn split_string(args: &[ArgumentLiteral]) -> Result<Value, Raised> {
    let (s, delimiter) = (receiver(args, 0)?, receiver(args, 1)?);
    let pieces = java::split(s, delimiter)?;
    debug!(?pieces, "split");
    Ok(Value::StrArray(pieces))
}

pub fn to_lower_case(args: &[ArgumentLiteral]) -> Result<Value, Raised> {
    Ok(Value::Str(receiver(args, 0)?.to_lowercase()))
}

pub fn to_upper_case(args: &[ArgumentLiteral]) -> Result<Value, Raised> {
    Ok(Value::Str(receiver(args, 0)?.to_uppercase()))
}

/// Literal replacement of every occurrence.
pub fn replace_string(args: &[ArgumentLiteral]) -> Result<Value, Raised> {
    let s = receiver(args, 0)?;
    let (target, replacement) = (receiver(args, 1)?, receiver(args, 2)?);
    Ok(Value::Str(s.replace(target, replacement)))
}

pub fn trim_string(args: &[ArgumentLiteral]) -> Result<Value, Raised> {
    Ok(Value::Str(java::trim(receiver(args, 0)?).to_string()))
}

pub fn assert_valid_email(args: &[ArgumentLiteral]) -> Result<Value, Raised> {
    let valid = match args.str_at(0)? {
        Some(email) => java::matches(email, EMAIL_PATTERN)?,
        None => false,
    };
    java::verify(valid, "email != null && email.matches(emailRegex)")
}
