//! Argument literals and the case grammar
//!
//! ```text
//! case    := "(" [ arg ("," arg)* ] ")" "->" outcome
//! arg     := "null" | "true" | "false" | integer | string | char
//! ```
//!
//! Strings are double-quoted with `\"`, `\\`, `\'`, `\n`, `\t` and `\r`
//! escapes; chars are single-quoted and hold exactly one character.

use std::{
    fmt,
    iter::Peekable,
    str::{
        CharIndices,
        FromStr,
    },
};

use itertools::Itertools;
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    error::SpecError,
    outcome::OutcomeKind,
};

/// A single positional argument of a case.
///
/// `Null` is its own value: it never compares equal to `Str("")` or `Int(0)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ArgumentLiteral {
    Int(i32),
    Bool(bool),
    Str(String),
    Char(char),
    Null,
}

impl ArgumentLiteral {
    pub fn is_null(&self) -> bool {
        matches!(self, ArgumentLiteral::Null)
    }
}

impl From<i32> for ArgumentLiteral {
    fn from(value: i32) -> Self {
        ArgumentLiteral::Int(value)
    }
}
impl From<bool> for ArgumentLiteral {
    fn from(value: bool) -> Self {
        ArgumentLiteral::Bool(value)
    }
}
impl From<char> for ArgumentLiteral {
    fn from(value: char) -> Self {
        ArgumentLiteral::Char(value)
    }
}
impl From<&str> for ArgumentLiteral {
    fn from(value: &str) -> Self {
        ArgumentLiteral::Str(value.to_string())
    }
}
impl<T: Into<ArgumentLiteral>> From<Option<T>> for ArgumentLiteral {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ArgumentLiteral::Null)
    }
}

fn write_escaped(
    f: &mut fmt::Formatter<'_>,
    c: char,
    quote: char,
) -> fmt::Result {
    match c {
        '\\' => f.write_str("\\\\"),
        '\n' => f.write_str("\\n"),
        '\t' => f.write_str("\\t"),
        '\r' => f.write_str("\\r"),
        c if c == quote => write!(f, "\\{}", c),
        c => write!(f, "{}", c),
    }
}

impl fmt::Display for ArgumentLiteral {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ArgumentLiteral::Int(value) => write!(f, "{}", value),
            ArgumentLiteral::Bool(value) => write!(f, "{}", value),
            ArgumentLiteral::Null => f.write_str("null"),
            ArgumentLiteral::Str(text) => {
                f.write_str("\"")?;
                for c in text.chars() {
                    write_escaped(f, c, '"')?;
                }
                f.write_str("\"")
            },
            ArgumentLiteral::Char(c) => {
                f.write_str("'")?;
                write_escaped(f, *c, '\'')?;
                f.write_str("'")
            },
        }
    }
}

/// One declared case: positional arguments and the expected outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseSpec {
    pub arguments: Vec<ArgumentLiteral>,
    pub expected: OutcomeKind,
}

impl CaseSpec {
    pub fn new(
        arguments: impl IntoIterator<Item = ArgumentLiteral>,
        expected: OutcomeKind,
    ) -> Self {
        Self {
            arguments: arguments.into_iter().collect(),
            expected,
        }
    }

    /// Argument tuple only, e.g. `("hello", 2, 1)`.
    pub fn render_arguments(&self) -> String {
        format!("({})", self.arguments.iter().join(", "))
    }
}

impl fmt::Display for CaseSpec {
    /// Canonical case text; parsing it yields an equal `CaseSpec`.
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} -> {}", self.render_arguments(), self.expected.token())
    }
}

impl FromStr for CaseSpec {
    type Err = SpecError;
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_case(text)
    }
}

/// Parse the body of a case declaration.
pub fn parse_case(text: &str) -> Result<CaseSpec, SpecError> {
    let mut parser = CaseParser::new(text);
    parser.skip_whitespace();
    parser.expect('(', "'('")?;
    let arguments = parser.arguments()?;
    parser.skip_whitespace();
    parser.expect('-', "'->'")?;
    parser.expect('>', "'->'")?;
    let expected = parser.rest().parse()?;
    Ok(CaseSpec {
        arguments,
        expected,
    })
}

struct CaseParser<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> CaseParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|&(offset, _)| offset)
            .unwrap_or(self.text.len())
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.chars.next();
        }
    }

    fn expect(
        &mut self,
        wanted: char,
        expected: &'static str,
    ) -> Result<(), SpecError> {
        match self.chars.next() {
            Some((_, c)) if c == wanted => Ok(()),
            Some((offset, found)) => Err(SpecError::Unexpected {
                found,
                offset,
                expected,
            }),
            None => Err(SpecError::UnexpectedEnd { expected }),
        }
    }

    fn rest(&mut self) -> &'a str {
        let text = self.text;
        let start = self.offset();
        while self.chars.next().is_some() {}
        &text[start..]
    }

    fn arguments(&mut self) -> Result<Vec<ArgumentLiteral>, SpecError> {
        let mut arguments = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.chars.next();
            return Ok(arguments);
        }
        loop {
            self.skip_whitespace();
            arguments.push(self.literal()?);
            self.skip_whitespace();
            match self.chars.next() {
                Some((_, ',')) => continue,
                Some((_, ')')) => break,
                Some((offset, found)) =>
                    return Err(SpecError::Unexpected {
                        found,
                        offset,
                        expected: "',' or ')'",
                    }),
                None =>
                    return Err(SpecError::UnexpectedEnd {
                        expected: "',' or ')'",
                    }),
            }
        }
        Ok(arguments)
    }

    fn literal(&mut self) -> Result<ArgumentLiteral, SpecError> {
        let offset = self.offset();
        match self.peek() {
            Some('"') => self.string().map(ArgumentLiteral::Str),
            Some('\'') => self.character(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.integer(),
            Some(c) if c.is_alphabetic() => {
                let word = self.take_while(|c| c.is_alphanumeric() || c == '_');
                match word {
                    "null" => Ok(ArgumentLiteral::Null),
                    "true" => Ok(ArgumentLiteral::Bool(true)),
                    "false" => Ok(ArgumentLiteral::Bool(false)),
                    other => Err(SpecError::UnknownLiteral {
                        word: other.to_string(),
                        offset,
                    }),
                }
            },
            Some(found) => Err(SpecError::Unexpected {
                found,
                offset,
                expected: "a literal",
            }),
            None => Err(SpecError::UnexpectedEnd {
                expected: "a literal",
            }),
        }
    }

    fn take_while(
        &mut self,
        pred: impl Fn(char) -> bool,
    ) -> &'a str {
        let text = self.text;
        let start = self.offset();
        while self.peek().is_some_and(&pred) {
            self.chars.next();
        }
        let end = self.offset();
        &text[start..end]
    }

    fn integer(&mut self) -> Result<ArgumentLiteral, SpecError> {
        let start = self.offset();
        if self.peek() == Some('-') {
            self.chars.next();
        }
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return match self.chars.next() {
                Some((offset, found)) => Err(SpecError::Unexpected {
                    found,
                    offset,
                    expected: "a digit",
                }),
                None => Err(SpecError::UnexpectedEnd {
                    expected: "a digit",
                }),
            };
        }
        let end = self.offset();
        let text = &self.text[start..end];
        text.parse::<i32>()
            .map(ArgumentLiteral::Int)
            .map_err(|_| SpecError::IntegerOutOfRange {
                text: text.to_string(),
                offset: start,
            })
    }

    /// Next character of a quoted literal, with escapes resolved.
    /// `None` when the closing quote is reached.
    fn quoted_char(
        &mut self,
        quote: char,
        what: &'static str,
        start: usize,
    ) -> Result<Option<char>, SpecError> {
        match self.chars.next() {
            None => Err(SpecError::Unterminated {
                what,
                offset: start,
            }),
            Some((_, c)) if c == quote => Ok(None),
            Some((offset, '\\')) => match self.chars.next() {
                Some((_, '"')) => Ok(Some('"')),
                Some((_, '\'')) => Ok(Some('\'')),
                Some((_, '\\')) => Ok(Some('\\')),
                Some((_, 'n')) => Ok(Some('\n')),
                Some((_, 't')) => Ok(Some('\t')),
                Some((_, 'r')) => Ok(Some('\r')),
                Some((_, escape)) => Err(SpecError::BadEscape { escape, offset }),
                None => Err(SpecError::Unterminated {
                    what,
                    offset: start,
                }),
            },
            Some((_, c)) => Ok(Some(c)),
        }
    }

    fn string(&mut self) -> Result<String, SpecError> {
        let start = self.offset();
        self.chars.next();
        let mut text = String::new();
        while let Some(c) = self.quoted_char('"', "string", start)? {
            text.push(c);
        }
        Ok(text)
    }

    fn character(&mut self) -> Result<ArgumentLiteral, SpecError> {
        let start = self.offset();
        self.chars.next();
        let first = self.quoted_char('\'', "char", start)?;
        match first {
            Some(c) => match self.quoted_char('\'', "char", start)? {
                None => Ok(ArgumentLiteral::Char(c)),
                Some(_) => Err(SpecError::BadChar { offset: start }),
            },
            None => Err(SpecError::BadChar { offset: start }),
        }
    }
}
