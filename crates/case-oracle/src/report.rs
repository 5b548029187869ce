//! Running every selected case and reporting the verdicts
//!
//! Rows always come back in registration order, one per (routine, case),
//! however many worker threads evaluated them.

use std::{
    fmt,
    sync::atomic::{
        AtomicUsize,
        Ordering,
    },
    thread,
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    info,
    instrument,
};

use crate::{
    literal::CaseSpec,
    oracle::{
        Oracle,
        Verdict,
    },
    registry::{
        CaseRegistry,
        RoutineEntry,
    },
    routine::RoutineId,
    tags::Tag,
};

/// One evaluated case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub routine: RoutineId,
    pub case_index: usize,
    pub case: CaseSpec,
    pub verdict: Verdict,
}

impl fmt::Display for Row {
    /// `[PASS] getLength(null) -> null pointer exception`
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let status = if self.verdict.is_pass() { "PASS" } else { "FAIL" };
        write!(f, "[{}] {}{}", status, self.routine.name, self.case)?;
        match &self.verdict {
            Verdict::Pass => Ok(()),
            Verdict::Fail { observed, .. } => write!(f, " (observed {})", observed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    /// Failures where a domain outcome differed from the declared one
    pub mismatched: usize,
    /// Timeouts, unclassified signals and routines that could not be invoked
    pub infrastructure: usize,
}

impl Summary {
    fn tally<'a>(verdicts: impl IntoIterator<Item = &'a Verdict>) -> Self {
        verdicts
            .into_iter()
            .fold(Self::default(), |mut summary, verdict| {
                summary.total += 1;
                if verdict.is_pass() {
                    summary.passed += 1;
                } else if verdict.is_infrastructure_failure() {
                    summary.infrastructure += 1;
                } else {
                    summary.mismatched += 1;
                }
                summary
            })
    }

    /// Share of passing cases; an empty run counts as fully passing.
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.passed as f64 / self.total as f64
        }
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

impl fmt::Display for Summary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{}/{} passed ({:.1}%), {} mismatched, {} infrastructure failures",
            self.passed,
            self.total,
            self.pass_rate() * 100.0,
            self.mismatched,
            self.infrastructure,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub rows: Vec<Row>,
    pub summary: Summary,
}

impl Report {
    pub fn new(rows: Vec<Row>) -> Self {
        let summary = Summary::tally(rows.iter().map(|row| &row.verdict));
        Self { rows, summary }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| !row.verdict.is_pass())
    }

    /// 0 when everything passed, 2 on any infrastructure failure, else 1.
    pub fn exit_code(&self) -> i32 {
        if self.summary.infrastructure > 0 {
            2
        } else if self.summary.mismatched > 0 {
            1
        } else {
            0
        }
    }
}

impl fmt::Display for Report {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{}", row)?;
        }
        write!(f, "{}", self.summary)
    }
}

/// Evaluates the registry's cases with an [`Oracle`].
#[derive(Debug)]
pub struct Runner<'r> {
    registry: &'r CaseRegistry,
    oracle: Oracle,
    threads: usize,
    tag: Option<Tag>,
}

struct Job<'r> {
    entry: &'r RoutineEntry,
    case_index: usize,
    case: &'r CaseSpec,
}

impl<'r> Runner<'r> {
    pub fn new(
        registry: &'r CaseRegistry,
        oracle: Oracle,
    ) -> Self {
        Self {
            registry,
            oracle,
            threads: 1,
            tag: None,
        }
    }

    /// Worker threads; `0` is treated as `1`.
    pub fn threads(
        mut self,
        threads: usize,
    ) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Only run routines carrying `tag`.
    pub fn with_tag(
        mut self,
        tag: impl Into<Option<Tag>>,
    ) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn selected(&self) -> Vec<&'r RoutineEntry> {
        self.registry
            .all_routines()
            .filter(|entry| self.tag.as_ref().is_none_or(|tag| entry.has_tag(tag)))
            .collect()
    }

    #[instrument(level = "info", skip(self), fields(threads = self.threads, tag = ?self.tag))]
    pub fn run(&self) -> Report {
        let jobs: Vec<Job<'r>> = self
            .selected()
            .into_iter()
            .flat_map(|entry| {
                entry
                    .cases
                    .iter()
                    .enumerate()
                    .map(move |(case_index, case)| Job {
                        entry,
                        case_index,
                        case,
                    })
            })
            .collect();

        let rows = if self.threads == 1 || jobs.len() < 2 {
            jobs.iter().map(|job| self.run_job(job)).collect()
        } else {
            self.run_parallel(&jobs)
        };
        let report = Report::new(rows);
        info!(summary = %report.summary, "run finished");
        report
    }

    fn run_parallel(
        &self,
        jobs: &[Job<'r>],
    ) -> Vec<Row> {
        let next = AtomicUsize::new(0);
        let workers = self.threads.min(jobs.len());
        let mut indexed: Vec<(usize, Row)> = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for _ in 0..workers {
                handles.push(scope.spawn(|| {
                    let mut done = Vec::new();
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(job) = jobs.get(index) else {
                            break done;
                        };
                        done.push((index, self.run_job(job)));
                    }
                }));
            }
            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        });
        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, row)| row).collect()
    }

    fn run_job(
        &self,
        job: &Job<'_>,
    ) -> Row {
        Row {
            routine: job.entry.id.clone(),
            case_index: job.case_index,
            case: job.case.clone(),
            verdict: self.oracle.evaluate(job.entry, job.case),
        }
    }
}
