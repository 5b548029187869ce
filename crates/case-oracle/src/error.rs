//! Specification errors raised while building the registry
//!
//! Every variant here is fatal: a broken fixture stops the run before any
//! routine is evaluated.

use itertools::Itertools;
use thiserror::Error;

use crate::routine::{
    ParamKind,
    RoutineId,
};

/// Malformed case text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("unexpected end of case text, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("unexpected {found:?} at offset {offset}, expected {expected}")]
    Unexpected {
        found: char,
        offset: usize,
        expected: &'static str,
    },

    #[error("unknown literal `{word}` at offset {offset}")]
    UnknownLiteral { word: String, offset: usize },

    #[error("integer literal `{text}` at offset {offset} does not fit in 32 bits")]
    IntegerOutOfRange { text: String, offset: usize },

    #[error("unsupported escape `\\{escape}` at offset {offset}")]
    BadEscape { escape: char, offset: usize },

    #[error("unterminated {what} literal starting at offset {offset}")]
    Unterminated { what: &'static str, offset: usize },

    #[error("char literal at offset {offset} must hold exactly one character")]
    BadChar { offset: usize },

    #[error("unknown outcome `{0}`")]
    UnknownOutcome(String),

    #[error("invalid tag `{0}`")]
    BadTag(String),

    #[error("unknown parameter type `{0}`")]
    UnknownParamType(String),
}

/// Errors from populating the [`CaseRegistry`](crate::CaseRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{routine}: case #{index} `{text}`: {source}")]
    Malformed {
        routine: RoutineId,
        index: usize,
        text: String,
        #[source]
        source: SpecError,
    },

    #[error("{routine}: declares {declared} parameter kinds for arity {}", .routine.arity)]
    SignatureArity {
        routine: RoutineId,
        declared: usize,
    },

    #[error("{routine}: re-registered with parameters ({}) instead of ({})", render_params(.found), render_params(.existing))]
    SignatureConflict {
        routine: RoutineId,
        existing: Vec<ParamKind>,
        found: Vec<ParamKind>,
    },

    #[error("{routine}: case `{case}` passes {found} arguments, routine takes {}", .routine.arity)]
    ArityMismatch {
        routine: RoutineId,
        case: String,
        found: usize,
    },

    #[error("{routine}: case `{case}` argument {position} `{literal}` does not fit parameter type {expected}")]
    TypeMismatch {
        routine: RoutineId,
        case: String,
        position: usize,
        literal: String,
        expected: ParamKind,
    },
}

fn render_params(params: &[ParamKind]) -> String {
    params.iter().join(", ")
}
