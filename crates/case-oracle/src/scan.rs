//! Annotation scanner
//!
//! Extracts [`Declaration`]s from annotated fixture source:
//!
//! ```text
//! @Case("(\"hello\", 2, 1) -> index range exception")
//! @Tag({ STRING, LOOP })
//! public static String getSubstring(String s, int start, int end) {
//! ```
//!
//! Annotations attach to the next method header. Methods without a `@Case`
//! are helpers and are skipped.

use thiserror::Error;
use tracing::{
    debug,
    trace,
};

use crate::{
    error::SpecError,
    registry::Declaration,
    routine::ParamKind,
    tags::Tag,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("line {line}: unterminated string in annotation")]
    UnterminatedString { line: usize },
    #[error("line {line}: @Case needs a string argument")]
    MissingCaseText { line: usize },
    #[error("line {line}: {source}")]
    Spec {
        line: usize,
        #[source]
        source: SpecError,
    },
    #[error("line {line}: cannot read method header `{text}`")]
    MalformedHeader { line: usize, text: String },
    #[error("line {line}: annotations are not followed by a method")]
    Dangling { line: usize },
}

/// Annotations collected since the last method header.
#[derive(Debug, Default)]
struct Pending {
    first_line: usize,
    cases: Vec<String>,
    tags: Vec<Tag>,
}

impl Pending {
    fn is_empty(&self) -> bool {
        self.cases.is_empty() && self.tags.is_empty()
    }
}

/// Scan source text for annotated methods, in source order.
pub fn scan_source(source: &str) -> Result<Vec<Declaration>, ScanError> {
    let mut declarations = Vec::new();
    let mut pending = Pending::default();
    let mut in_block_comment = false;

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if in_block_comment {
            in_block_comment = !text.contains("*/");
            continue;
        }
        if text.starts_with("/*") {
            in_block_comment = !text.contains("*/");
            continue;
        }
        if text.is_empty() || text.starts_with("//") {
            continue;
        }
        if pending.is_empty() {
            pending.first_line = line;
        }
        if let Some(rest) = text.strip_prefix("@Case") {
            let case = case_text(rest, line)?;
            trace!(line, %case, "case annotation");
            pending.cases.push(case);
        } else if let Some(rest) = text.strip_prefix("@Tag") {
            pending.tags.extend(tag_list(rest, line)?);
        } else if text.starts_with('@') {
            // unrelated annotation
        } else if pending.cases.is_empty() {
            pending = Pending::default();
        } else if text.contains('(') {
            let (name, params) = method_header(text, line)?;
            let pending = std::mem::take(&mut pending);
            debug!(line, %name, cases = pending.cases.len(), "scanned routine");
            declarations.push(Declaration {
                name,
                params,
                tags: pending.tags,
                cases: pending.cases,
            });
        } else {
            return Err(ScanError::MalformedHeader {
                line,
                text: text.to_string(),
            });
        }
    }
    if pending.is_empty() {
        Ok(declarations)
    } else {
        Err(ScanError::Dangling {
            line: pending.first_line,
        })
    }
}

/// `("...")` after `@Case`, with Java string escapes resolved.
fn case_text(
    rest: &str,
    line: usize,
) -> Result<String, ScanError> {
    let body = rest
        .trim_start()
        .strip_prefix('(')
        .map(str::trim_start)
        .and_then(|r| r.strip_prefix('"'))
        .ok_or(ScanError::MissingCaseText { line })?;
    let mut chars = body.chars();
    let mut text = String::new();
    loop {
        match chars.next() {
            None => return Err(ScanError::UnterminatedString { line }),
            Some('"') => break,
            Some('\\') => match chars.next() {
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some('r') => text.push('\r'),
                Some(escaped @ ('"' | '\\' | '\'')) => text.push(escaped),
                Some(escape) =>
                    return Err(ScanError::Spec {
                        line,
                        source: SpecError::BadEscape {
                            escape,
                            offset: body.len() - chars.as_str().len() - escape.len_utf8() - 1,
                        },
                    }),
                None => return Err(ScanError::UnterminatedString { line }),
            },
            Some(c) => text.push(c),
        }
    }
    if chars.as_str().trim_start().starts_with(')') {
        Ok(text)
    } else {
        Err(ScanError::MissingCaseText { line })
    }
}

/// `({ A, B })` or `(A)` after `@Tag`.
fn tag_list(
    rest: &str,
    line: usize,
) -> Result<Vec<Tag>, ScanError> {
    let inner = rest
        .trim()
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .ok_or_else(|| ScanError::Spec {
            line,
            source: SpecError::BadTag(rest.trim().to_string()),
        })?;
    let inner = inner.trim();
    let inner = inner
        .strip_prefix('{')
        .and_then(|r| r.strip_suffix('}'))
        .unwrap_or(inner);
    inner
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<Tag>()
                .map_err(|source| ScanError::Spec { line, source })
        })
        .collect()
}

/// Name and parameter kinds of `... name(Type a, Type b) {`.
fn method_header(
    text: &str,
    line: usize,
) -> Result<(String, Vec<ParamKind>), ScanError> {
    let malformed = || ScanError::MalformedHeader {
        line,
        text: text.to_string(),
    };
    let (head, tail) = text.split_once('(').ok_or_else(malformed)?;
    let name = head
        .split_whitespace()
        .last()
        .filter(|name| {
            name.chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
        .ok_or_else(malformed)?;
    let (params, _) = tail.split_once(')').ok_or_else(malformed)?;
    let params = params
        .split(',')
        .map(str::trim)
        .filter(|param| !param.is_empty())
        .map(|param| {
            let words: Vec<&str> = param
                .split_whitespace()
                .filter(|word| *word != "final")
                .collect();
            match words.split_last() {
                Some((_, ty)) if !ty.is_empty() => ty
                    .concat()
                    .parse::<ParamKind>()
                    .map_err(|source| ScanError::Spec { line, source }),
                _ => Err(malformed()),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((name.to_string(), params))
}
