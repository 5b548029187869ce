//! The routine-invocation capability
//!
//! The oracle never resolves routines itself; it asks an [`Invoke`]
//! implementation to call a routine by identifier. [`RoutineTable`] is the
//! plain function-pointer implementation used by the fixture crates.

use std::{
    fmt,
    str::FromStr,
};

use derive_new::new;
use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;
use tracing::trace;

use crate::{
    error::SpecError,
    literal::ArgumentLiteral,
    outcome::{
        Raised,
        SignalKind,
    },
};

/// A routine is identified by its name and formal parameter count.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, new,
)]
pub struct RoutineId {
    #[new(into)]
    pub name: String,
    pub arity: usize,
}

impl fmt::Display for RoutineId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// Formal parameter type of a routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Int,
    Bool,
    Char,
    Str,
    IntArray,
    BoolArray,
    CharArray,
    StrArray,
}

impl ParamKind {
    /// Reference parameters accept `null`.
    pub fn is_reference(self) -> bool {
        !matches!(self, ParamKind::Int | ParamKind::Bool | ParamKind::Char)
    }

    pub fn accepts(
        self,
        literal: &ArgumentLiteral,
    ) -> bool {
        match literal {
            ArgumentLiteral::Null => self.is_reference(),
            ArgumentLiteral::Int(_) => self == ParamKind::Int,
            ArgumentLiteral::Bool(_) => self == ParamKind::Bool,
            ArgumentLiteral::Char(_) => self == ParamKind::Char,
            ArgumentLiteral::Str(_) => self == ParamKind::Str,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            ParamKind::Int => "int",
            ParamKind::Bool => "boolean",
            ParamKind::Char => "char",
            ParamKind::Str => "String",
            ParamKind::IntArray => "int[]",
            ParamKind::BoolArray => "boolean[]",
            ParamKind::CharArray => "char[]",
            ParamKind::StrArray => "String[]",
        })
    }
}

impl FromStr for ParamKind {
    type Err = SpecError;
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let compact = compact.strip_prefix("java.lang.").unwrap_or(&compact);
        Ok(match compact {
            "int" => ParamKind::Int,
            "boolean" => ParamKind::Bool,
            "char" => ParamKind::Char,
            "String" => ParamKind::Str,
            "int[]" => ParamKind::IntArray,
            "boolean[]" => ParamKind::BoolArray,
            "char[]" => ParamKind::CharArray,
            "String[]" => ParamKind::StrArray,
            _ => return Err(SpecError::UnknownParamType(text.trim().to_string())),
        })
    }
}

/// Value returned by a routine that completed normally.
///
/// The oracle only logs it; the contract is the control-flow outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Void,
    Int(i32),
    Bool(bool),
    Char(char),
    Str(String),
    StrArray(Vec<String>),
}

/// Captured result of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Normal(Value),
    Raised(Raised),
}

impl From<Result<Value, Raised>> for Completion {
    fn from(result: Result<Value, Raised>) -> Self {
        match result {
            Ok(value) => Completion::Normal(value),
            Err(raised) => Completion::Raised(raised),
        }
    }
}

/// The call itself could not be made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    #[error("no routine registered as {0}")]
    MissingRoutine(RoutineId),
    #[error("{routine} called with {found} arguments")]
    ArityMismatch { routine: RoutineId, found: usize },
}

/// Look up a routine by identifier and call it.
pub trait Invoke: Send + Sync {
    fn invoke(
        &self,
        routine: &RoutineId,
        arguments: &[ArgumentLiteral],
    ) -> Result<Completion, InvokeError>;
}

pub type RoutineFn = fn(&[ArgumentLiteral]) -> Result<Value, Raised>;

/// Function-pointer dispatch table.
#[derive(Clone, Default)]
pub struct RoutineTable {
    routines: IndexMap<RoutineId, RoutineFn>,
}

impl fmt::Debug for RoutineTable {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_set().entries(self.routines.keys()).finish()
    }
}

impl RoutineTable {
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        arity: usize,
        routine: RoutineFn,
    ) -> &mut Self {
        self.routines.insert(RoutineId::new(name, arity), routine);
        self
    }
    pub fn contains(
        &self,
        routine: &RoutineId,
    ) -> bool {
        self.routines.contains_key(routine)
    }
    pub fn len(&self) -> usize {
        self.routines.len()
    }
    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }
}

impl Invoke for RoutineTable {
    fn invoke(
        &self,
        routine: &RoutineId,
        arguments: &[ArgumentLiteral],
    ) -> Result<Completion, InvokeError> {
        let call = self
            .routines
            .get(routine)
            .ok_or_else(|| InvokeError::MissingRoutine(routine.clone()))?;
        if arguments.len() != routine.arity {
            return Err(InvokeError::ArityMismatch {
                routine: routine.clone(),
                found: arguments.len(),
            });
        }
        trace!(%routine, "dispatching");
        Ok(call(arguments).into())
    }
}

/// Typed access to positional arguments inside a routine body.
///
/// A literal of the wrong kind raises [`SignalKind::ClassCast`], which the
/// taxonomy deliberately leaves unclassified.
pub trait ArgsExt {
    /// `None` for a `null` argument.
    fn str_at(
        &self,
        index: usize,
    ) -> Result<Option<&str>, Raised>;
    fn int_at(
        &self,
        index: usize,
    ) -> Result<i32, Raised>;
    fn bool_at(
        &self,
        index: usize,
    ) -> Result<bool, Raised>;
    fn char_at(
        &self,
        index: usize,
    ) -> Result<char, Raised>;
}

fn cast_error(
    index: usize,
    wanted: &str,
    found: Option<&ArgumentLiteral>,
) -> Raised {
    let found = found
        .map(ToString::to_string)
        .unwrap_or_else(|| "nothing".to_string());
    Raised::new(
        SignalKind::ClassCast,
        format!("argument {} expected {}, got {}", index, wanted, found),
    )
}

impl ArgsExt for [ArgumentLiteral] {
    fn str_at(
        &self,
        index: usize,
    ) -> Result<Option<&str>, Raised> {
        match self.get(index) {
            Some(ArgumentLiteral::Str(text)) => Ok(Some(text.as_str())),
            Some(ArgumentLiteral::Null) => Ok(None),
            other => Err(cast_error(index, "String", other)),
        }
    }
    fn int_at(
        &self,
        index: usize,
    ) -> Result<i32, Raised> {
        match self.get(index) {
            Some(ArgumentLiteral::Int(value)) => Ok(*value),
            other => Err(cast_error(index, "int", other)),
        }
    }
    fn bool_at(
        &self,
        index: usize,
    ) -> Result<bool, Raised> {
        match self.get(index) {
            Some(ArgumentLiteral::Bool(value)) => Ok(*value),
            other => Err(cast_error(index, "boolean", other)),
        }
    }
    fn char_at(
        &self,
        index: usize,
    ) -> Result<char, Raised> {
        match self.get(index) {
            Some(ArgumentLiteral::Char(value)) => Ok(*value),
            other => Err(cast_error(index, "char", other)),
        }
    }
}
