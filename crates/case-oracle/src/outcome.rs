//! Outcome taxonomy and the runtime signals mapped onto it

use std::{
    any::Any,
    fmt,
    str::FromStr,
};

use serde::{
    Deserialize,
    Serialize,
};
use strum::{
    EnumIter,
    IntoEnumIterator,
    IntoStaticStr,
};

use crate::error::SpecError;

/// The closed set of domain outcomes a case may declare.
///
/// `Display` renders the taxonomy name (`INDEX_RANGE`), [`OutcomeKind::token`]
/// the lowercase token used in case text (`index range exception`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    IntoStaticStr,
    strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Ok,
    AssertionError,
    NullPointer,
    IndexOutOfBounds,
    IndexRange,
    NumberFormat,
}

impl OutcomeKind {
    /// Canonical case-text token.
    pub fn token(self) -> &'static str {
        match self {
            OutcomeKind::Ok => "ok",
            OutcomeKind::AssertionError => "assertion error",
            OutcomeKind::NullPointer => "null pointer exception",
            OutcomeKind::IndexOutOfBounds => "index out of bounds",
            OutcomeKind::IndexRange => "index range exception",
            OutcomeKind::NumberFormat => "number format exception",
        }
    }
}

impl FromStr for OutcomeKind {
    type Err = SpecError;

    /// Whole-token match, case-insensitive, with whitespace runs collapsed.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let normalized = text
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        OutcomeKind::iter()
            .find(|kind| kind.token() == normalized)
            .ok_or_else(|| SpecError::UnknownOutcome(text.trim().to_string()))
    }
}

/// The structural cause of a signal raised by a routine under test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// An `assert` in the routine did not hold.
    AssertionFailed,
    /// A member was accessed through an absent receiver.
    NullDereference,
    /// A single index outside `[0, length)`, or a range bound outside the receiver.
    IndexOutOfDomain,
    /// A range with `start > end` on an otherwise in-bounds receiver.
    InvertedRange,
    /// Text that does not parse as a number.
    MalformedNumber,
    ArithmeticFault,
    ClassCast,
    ArrayStore,
    /// A pattern argument that is not a valid regular expression.
    PatternSyntax,
    /// A panic that did not carry a [`Raised`] payload.
    Foreign,
}

/// Total mapping from signal kinds onto the taxonomy.
///
/// `None` marks an unclassified failure. Extending the taxonomy means adding an
/// arm here, never widening an existing one.
pub fn classify_signal(kind: &SignalKind) -> Option<OutcomeKind> {
    match kind {
        SignalKind::AssertionFailed => Some(OutcomeKind::AssertionError),
        SignalKind::NullDereference => Some(OutcomeKind::NullPointer),
        SignalKind::IndexOutOfDomain => Some(OutcomeKind::IndexOutOfBounds),
        SignalKind::InvertedRange => Some(OutcomeKind::IndexRange),
        SignalKind::MalformedNumber => Some(OutcomeKind::NumberFormat),
        SignalKind::ArithmeticFault => None,
        SignalKind::ClassCast => None,
        SignalKind::ArrayStore => None,
        SignalKind::PatternSyntax => None,
        SignalKind::Foreign => None,
    }
}

/// A signal raised by a routine under test.
///
/// Routines usually return it as `Err(Raised)`. Code that cannot propagate a
/// `Result` (deep recursion, callbacks) may [`raise`](Raised::raise) it instead;
/// the oracle's capture boundary recovers the payload from the unwind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Raised {
    pub kind: SignalKind,
    pub detail: String,
}

impl Raised {
    pub fn new(
        kind: SignalKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
    pub fn assertion(detail: impl Into<String>) -> Self {
        Self::new(SignalKind::AssertionFailed, detail)
    }
    pub fn null_pointer(detail: impl Into<String>) -> Self {
        Self::new(SignalKind::NullDereference, detail)
    }
    pub fn out_of_bounds(detail: impl Into<String>) -> Self {
        Self::new(SignalKind::IndexOutOfDomain, detail)
    }
    pub fn inverted_range(detail: impl Into<String>) -> Self {
        Self::new(SignalKind::InvertedRange, detail)
    }
    pub fn number_format(detail: impl Into<String>) -> Self {
        Self::new(SignalKind::MalformedNumber, detail)
    }

    /// Unwind with this signal as the panic payload.
    pub fn raise(self) -> ! {
        std::panic::panic_any(self)
    }

    /// Recover a signal from a caught panic payload.
    ///
    /// Payloads that are not a `Raised` become [`SignalKind::Foreign`], which
    /// has no taxonomy mapping.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        match payload.downcast::<Raised>() {
            Ok(raised) => *raised,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                Self::new(SignalKind::Foreign, message)
            },
        }
    }
}

impl fmt::Display for Raised {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.detail)
    }
}

impl std::error::Error for Raised {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tokens_parse_case_insensitively() {
        assert_eq!(
            "Index Range   Exception".parse::<OutcomeKind>(),
            Ok(OutcomeKind::IndexRange)
        );
        assert_eq!(" OK ".parse::<OutcomeKind>(), Ok(OutcomeKind::Ok));
    }

    #[test]
    fn tokens_are_not_prefix_matched() {
        assert!("index".parse::<OutcomeKind>().is_err());
        assert!("index out of bounds exception".parse::<OutcomeKind>().is_err());
        assert!("null pointer".parse::<OutcomeKind>().is_err());
    }

    #[test]
    fn every_kind_round_trips_through_its_token() {
        for kind in OutcomeKind::iter() {
            assert_eq!(kind.token().parse::<OutcomeKind>(), Ok(kind));
        }
    }

    #[test]
    fn index_kinds_stay_distinct() {
        assert_eq!(
            classify_signal(&SignalKind::IndexOutOfDomain),
            Some(OutcomeKind::IndexOutOfBounds)
        );
        assert_eq!(
            classify_signal(&SignalKind::InvertedRange),
            Some(OutcomeKind::IndexRange)
        );
    }

    #[test]
    fn unmapped_signals_stay_unclassified() {
        for kind in [
            SignalKind::ArithmeticFault,
            SignalKind::ClassCast,
            SignalKind::ArrayStore,
            SignalKind::PatternSyntax,
            SignalKind::Foreign,
        ] {
            assert_eq!(classify_signal(&kind), None);
        }
    }

    #[test]
    fn display_uses_taxonomy_names() {
        assert_eq!(OutcomeKind::NullPointer.to_string(), "NULL_POINTER");
        assert_eq!(OutcomeKind::Ok.to_string(), "OK");
    }

    #[test]
    fn foreign_panic_payload_keeps_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        let raised = Raised::from_panic(payload);
        assert_eq!(raised.kind, SignalKind::Foreign);
        assert_eq!(raised.detail, "boom");
    }
}
