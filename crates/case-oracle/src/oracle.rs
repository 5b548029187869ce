//! Execution oracle
//!
//! Invokes a routine with a case's arguments under a capture boundary,
//! classifies what happened and compares it against the declared outcome.
//!
//! Without a timeout or stack size the call runs inline under
//! [`catch_unwind`](std::panic::catch_unwind). Otherwise it runs on its own
//! thread and the oracle waits up to the deadline; a worker that overruns is
//! detached and only ever owns its own copy of the arguments.

use std::{
    fmt,
    panic::{
        self,
        AssertUnwindSafe,
    },
    sync::{
        Arc,
        mpsc::{
            self,
            RecvTimeoutError,
        },
    },
    thread,
    time::Duration,
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    instrument,
    trace,
    warn,
};

use crate::{
    literal::{
        ArgumentLiteral,
        CaseSpec,
    },
    logging::install_panic_hook,
    outcome::{
        OutcomeKind,
        Raised,
        SignalKind,
        classify_signal,
    },
    registry::RoutineEntry,
    routine::{
        Completion,
        Invoke,
        InvokeError,
        RoutineId,
    },
};

/// What the oracle saw for one call.
///
/// Only [`Observed::Outcome`] belongs to the taxonomy; the other variants are
/// infrastructure failures and never compare equal to a declared outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Observed {
    Outcome { outcome: OutcomeKind },
    Timeout { limit_ms: u64 },
    Unclassified { signal: SignalKind, detail: String },
    Uninvokable { reason: String },
}

impl Observed {
    pub fn outcome(&self) -> Option<OutcomeKind> {
        match self {
            Observed::Outcome { outcome } => Some(*outcome),
            _ => None,
        }
    }
    pub fn is_infrastructure(&self) -> bool {
        self.outcome().is_none()
    }
}

impl From<OutcomeKind> for Observed {
    fn from(outcome: OutcomeKind) -> Self {
        Observed::Outcome { outcome }
    }
}

impl fmt::Display for Observed {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Observed::Outcome { outcome } => write!(f, "{}", outcome),
            Observed::Timeout { limit_ms } =>
                write!(f, "TIMEOUT after {}ms", limit_ms),
            Observed::Unclassified { signal, detail } =>
                write!(f, "UNCLASSIFIED {:?}: {}", signal, detail),
            Observed::Uninvokable { reason } =>
                write!(f, "UNINVOKABLE: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail {
        observed: Observed,
        expected: OutcomeKind,
    },
}

impl Verdict {
    pub fn compare(
        observed: Observed,
        expected: OutcomeKind,
    ) -> Self {
        if observed.outcome() == Some(expected) {
            Verdict::Pass
        } else {
            Verdict::Fail { observed, expected }
        }
    }
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
    /// Failed for a reason outside the taxonomy.
    pub fn is_infrastructure_failure(&self) -> bool {
        matches!(self, Verdict::Fail { observed, .. } if observed.is_infrastructure())
    }
}

impl fmt::Display for Verdict {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail { observed, expected } =>
                write!(f, "FAIL (observed {}, expected {})", observed, expected),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalSettings {
    pub timeout: Option<Duration>,
    pub stack_size: Option<usize>,
}

impl EvalSettings {
    fn isolated(&self) -> bool {
        self.timeout.is_some() || self.stack_size.is_some()
    }
}

/// Evaluates cases through an [`Invoke`] capability.
///
/// Holds no per-evaluation state, so one oracle can be shared across threads.
#[derive(Clone)]
pub struct Oracle {
    invoker: Arc<dyn Invoke>,
    settings: EvalSettings,
}

impl fmt::Debug for Oracle {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Oracle")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Oracle {
    pub fn new(invoker: impl Invoke + 'static) -> Self {
        Self::from_shared(Arc::new(invoker))
    }
    pub fn from_shared(invoker: Arc<dyn Invoke>) -> Self {
        install_panic_hook();
        Self {
            invoker,
            settings: EvalSettings::default(),
        }
    }
    pub fn with_settings(
        mut self,
        settings: EvalSettings,
    ) -> Self {
        self.settings = settings;
        self
    }
    pub fn with_timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.settings.timeout = Some(timeout);
        self
    }
    pub fn with_stack_size(
        mut self,
        bytes: usize,
    ) -> Self {
        self.settings.stack_size = Some(bytes);
        self
    }
    pub fn settings(&self) -> &EvalSettings {
        &self.settings
    }

    /// Evaluate one declared case of `entry`.
    #[instrument(level = "debug", skip_all, fields(routine = %entry.id, case = %case))]
    pub fn evaluate(
        &self,
        entry: &RoutineEntry,
        case: &CaseSpec,
    ) -> Verdict {
        let observed = self.observe(&entry.id, &case.arguments);
        let verdict = Verdict::compare(observed, case.expected);
        debug!(%verdict, "evaluated");
        verdict
    }

    /// Call `routine` once and classify the result.
    pub fn observe(
        &self,
        routine: &RoutineId,
        arguments: &[ArgumentLiteral],
    ) -> Observed {
        let captured = if self.settings.isolated() {
            self.call_isolated(routine, arguments)
        } else {
            capture(self.invoker.as_ref(), routine, arguments.to_vec())
        };
        match captured {
            Ok(completion) => classify(completion),
            Err(Captured::Uninvokable(reason)) => {
                warn!(%routine, %reason, "routine could not be invoked");
                Observed::Uninvokable { reason }
            },
            Err(Captured::TimedOut(limit)) => {
                warn!(%routine, limit_ms = limit.as_millis() as u64, "evaluation timed out");
                Observed::Timeout {
                    limit_ms: limit.as_millis() as u64,
                }
            },
        }
    }

    fn call_isolated(
        &self,
        routine: &RoutineId,
        arguments: &[ArgumentLiteral],
    ) -> Result<Completion, Captured> {
        let (sender, receiver) = mpsc::channel();
        let invoker = Arc::clone(&self.invoker);
        let id = routine.clone();
        let arguments = arguments.to_vec();
        let dispatch = tracing::dispatcher::get_default(|dispatch| dispatch.clone());

        let mut builder = thread::Builder::new().name(format!("case {}", routine));
        if let Some(bytes) = self.settings.stack_size {
            builder = builder.stack_size(bytes);
        }
        builder
            .spawn(move || {
                let captured = tracing::dispatcher::with_default(&dispatch, || {
                    capture(invoker.as_ref(), &id, arguments)
                });
                // the receiver is gone once the deadline passed
                sender.send(captured).ok();
            })
            .map_err(|err| {
                Captured::Uninvokable(format!("failed to spawn evaluation thread: {}", err))
            })?;

        let received = match self.settings.timeout {
            Some(limit) => receiver.recv_timeout(limit).map_err(|err| match err {
                RecvTimeoutError::Timeout => Captured::TimedOut(limit),
                RecvTimeoutError::Disconnected => disconnected(),
            }),
            None => receiver.recv().map_err(|_| disconnected()),
        };
        received?
    }
}

enum Captured {
    Uninvokable(String),
    TimedOut(Duration),
}

impl From<InvokeError> for Captured {
    fn from(err: InvokeError) -> Self {
        Captured::Uninvokable(err.to_string())
    }
}

fn disconnected() -> Captured {
    Captured::Uninvokable("evaluation thread ended without a result".to_string())
}

/// The capture boundary: surrounds the whole call, including unwinds raised
/// from arbitrarily deep inside the routine.
fn capture(
    invoker: &dyn Invoke,
    routine: &RoutineId,
    arguments: Vec<ArgumentLiteral>,
) -> Result<Completion, Captured> {
    match panic::catch_unwind(AssertUnwindSafe(|| invoker.invoke(routine, &arguments))) {
        Ok(result) => Ok(result?),
        Err(payload) => Ok(Completion::Raised(Raised::from_panic(payload))),
    }
}

fn classify(completion: Completion) -> Observed {
    match completion {
        Completion::Normal(value) => {
            trace!(?value, "returned normally");
            OutcomeKind::Ok.into()
        },
        Completion::Raised(Raised { kind, detail }) => match classify_signal(&kind) {
            Some(outcome) => {
                trace!(signal = ?kind, %detail, %outcome, "classified signal");
                outcome.into()
            },
            None => {
                warn!(signal = ?kind, %detail, "unclassified signal");
                Observed::Unclassified {
                    signal: kind,
                    detail,
                }
            },
        },
    }
}
