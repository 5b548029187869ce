//! Case-specification parser and execution oracle.
//!
//! Routines under test declare cases such as `("hello", 2, 1) -> index range exception`.
//! The registry parses and type-checks those declarations once, and the oracle invokes
//! each routine through the [`Invoke`] capability, classifies what it observed and
//! compares it against the declared outcome.

pub mod config;
pub mod error;
pub mod literal;
pub mod oracle;
pub mod outcome;
pub mod registry;
pub mod report;
pub mod routine;
pub mod scan;
pub mod tags;

// Logging utilities (tracing setup, panic hook)
pub mod logging;

#[cfg(any(test, feature = "test-api"))]
pub mod tests;

pub use crate::{
    config::{
        ConfigError,
        EvalConfig,
        LoggingConfig,
        OracleConfig,
    },
    error::{
        RegistryError,
        SpecError,
    },
    literal::{
        ArgumentLiteral,
        CaseSpec,
        parse_case,
    },
    oracle::{
        EvalSettings,
        Observed,
        Oracle,
        Verdict,
    },
    outcome::{
        OutcomeKind,
        Raised,
        SignalKind,
        classify_signal,
    },
    registry::{
        CaseRegistry,
        Declaration,
        RoutineEntry,
    },
    report::{
        Report,
        Row,
        Runner,
        Summary,
    },
    routine::{
        ArgsExt,
        Completion,
        Invoke,
        InvokeError,
        ParamKind,
        RoutineFn,
        RoutineId,
        RoutineTable,
        Value,
    },
    scan::{
        ScanError,
        scan_source,
    },
    tags::Tag,
};
