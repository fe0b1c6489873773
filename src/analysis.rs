//! The two analysis modes: classify given evidence, or run a program and
//! classify how it died.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::classifier::{self, FailureReport};
use crate::input::AnalysisInput;
use crate::scanner::{self, LogContext, ScanOptions};
use crate::signals;
use crate::supervisor::{LaunchError, ProcessOutcome, RunSpec, EXIT_COMMAND_NOT_FOUND};

/// Result of a direct analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Validated inputs.
    pub input: AnalysisInput,
    /// How the log contributed.
    pub log: LogContext,
    /// The classification.
    pub report: FailureReport,
}

/// Classify already-validated direct evidence.
pub fn analyze(input: &AnalysisInput, opts: &ScanOptions) -> Analysis {
    let log = scanner::scan_context(input.log_path.as_deref(), opts);
    let report = classifier::classify(input.signal, input.errno, log.flags());

    Analysis {
        input: input.clone(),
        log,
        report,
    }
}

/// Caller-facing verdict on how a supervised program ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// Exit code 0.
    CleanExit,
    /// Never executed, or exit code 127.
    CommandNotFound {
        /// Exec error text when the spawn itself failed.
        reason: Option<String>,
    },
    /// Non-zero exit other than 127.
    FailureExit {
        /// Exit code.
        code: i32,
    },
    /// Killed by a signal.
    Signaled {
        /// Signal number.
        signal: i32,
        /// Whether a core was dumped.
        core_dumped: bool,
        /// Whether the signal is in the catalog.
        supported: bool,
    },
    /// Neither exit nor signal was reported.
    Indeterminate,
}

impl Termination {
    /// Derive the verdict from a raw outcome.
    pub fn from_outcome(outcome: &ProcessOutcome) -> Self {
        match outcome {
            ProcessOutcome::NotLaunched { reason } => Self::CommandNotFound {
                reason: Some(reason.clone()),
            },
            ProcessOutcome::Exited { code: 0 } => Self::CleanExit,
            ProcessOutcome::Exited {
                code: EXIT_COMMAND_NOT_FOUND,
            } => Self::CommandNotFound { reason: None },
            ProcessOutcome::Exited { code } => Self::FailureExit { code: *code },
            ProcessOutcome::Signaled {
                signal,
                core_dumped,
            } => Self::Signaled {
                signal: *signal,
                core_dumped: *core_dumped,
                supported: signals::lookup_signal(*signal).is_some(),
            },
            ProcessOutcome::Indeterminate => Self::Indeterminate,
        }
    }

    /// Whether the target failed in a way worth classifying.
    pub fn failure_detected(&self) -> bool {
        matches!(self, Self::FailureExit { .. } | Self::Signaled { .. })
    }
}

/// Result of a supervised run.
#[derive(Debug, Clone, Serialize)]
pub struct SupervisedRun {
    /// What was run.
    pub spec: RunSpec,
    /// Raw termination state.
    pub outcome: ProcessOutcome,
    /// Verdict derived from the outcome.
    pub termination: Termination,
    /// How the log contributed.
    pub log: LogContext,
    /// Present only when a failure was detected.
    pub report: Option<FailureReport>,
}

/// Run `spec` to completion, then classify its termination.
///
/// # Errors
///
/// Returns [`LaunchError`] when the process could not be created or waited on.
pub fn supervise(
    spec: &RunSpec,
    log_path: Option<&Path>,
    opts: &ScanOptions,
) -> Result<SupervisedRun, LaunchError> {
    let outcome = spec.run()?;
    Ok(conclude(spec, outcome, log_path, opts))
}

/// Classify an observed outcome. The log is scanned after the run ends.
pub fn conclude(
    spec: &RunSpec,
    outcome: ProcessOutcome,
    log_path: Option<&Path>,
    opts: &ScanOptions,
) -> SupervisedRun {
    let termination = Termination::from_outcome(&outcome);
    let log = scanner::scan_context(log_path, opts);

    let report = match &termination {
        Termination::Signaled { signal, .. } => {
            Some(classifier::classify(Some(*signal), None, log.flags()))
        }
        Termination::FailureExit { .. } => Some(classifier::classify(None, None, log.flags())),
        Termination::CleanExit
        | Termination::CommandNotFound { .. }
        | Termination::Indeterminate => None,
    };

    info!(
        program = %spec.program,
        termination = ?termination,
        classified = report.is_some(),
        "supervised run concluded"
    );

    SupervisedRun {
        spec: spec.clone(),
        outcome,
        termination,
        log,
        report,
    }
}
