//! Ordered, short-circuiting failure classification rules.
//!
//! Evidence is ranked by specificity: signal first, then errno, then log
//! keywords. The first rule that fires decides the report. Errno rules work
//! from the raw code rather than the [`crate::errno`] category label.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::scanner::{self, LogScanResult, ScanOptions};
use crate::signals;

const ROOT_CAUSE_MEMORY_CORRUPTION: &str =
    "Invalid memory access - null pointer dereference or buffer overflow";
const ROOT_CAUSE_RESOURCE_EXHAUSTION: &str = "System resource limit exceeded";
const ROOT_CAUSE_TIMING_RACE: &str = "Concurrency issue - race condition or deadlock";
const ROOT_CAUSE_ABORT: &str = "Assertion failure or abnormal termination (abort)";
const ROOT_CAUSE_BAD_ADDRESS_SIGNAL: &str = "Invalid memory access - bad address (EFAULT)";
const ROOT_CAUSE_BAD_ADDRESS_ERRNO: &str = "Invalid memory address passed to system call (EFAULT)";
const ROOT_CAUSE_INVALID_ARGUMENT: &str = "Invalid argument passed to system call (EINVAL)";
const ROOT_CAUSE_BROKEN_PIPE: &str = "Broken pipe - write to closed file descriptor (EPIPE)";
const ROOT_CAUSE_INSUFFICIENT: &str = "Insufficient information to determine root cause";

const STEPS_MEMORY: &str = "\
1. Run with valgrind: valgrind --leak-check=full <program>
2. Use AddressSanitizer: gcc -fsanitize=address <sources>
3. Check stack traces with gdb: gdb <program> core
4. Review pointer arithmetic and array bounds";

const STEPS_INVALID_STATE: &str = "\
1. Review assertion failures and abort conditions
2. Check function preconditions and state validation
3. Enable core dumps: ulimit -c unlimited
4. Use strace to trace system calls";

const STEPS_RESOURCE: &str = "\
1. Check memory limits: ulimit -v
2. Monitor resource usage: top, ps aux
3. Review memory allocation patterns
4. Check for memory leaks with valgrind --leak-check=full";

const STEPS_TIMING: &str = "\
1. Review thread synchronization (mutexes, semaphores)
2. Use thread sanitizer: gcc -fsanitize=thread <sources>
3. Add logging around critical sections
4. Check for deadlock patterns in code";

const STEPS_NEED_EVIDENCE: &str = "Provide signal number (-s) or errno value (-e) for analysis";

/// Coarse failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// Invalid memory access, corruption, bad pointers.
    MemoryCorruption,
    /// Violated precondition, assertion, arithmetic fault.
    InvalidState,
    /// Memory or other system limit exhausted.
    ResourceExhaustion,
    /// Race, deadlock or hang.
    TimingRace,
}

impl FailureCategory {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::MemoryCorruption => "Memory Corruption",
            Self::InvalidState => "Invalid State",
            Self::ResourceExhaustion => "Resource Exhaustion",
            Self::TimingRace => "Timing/Race",
        }
    }

    /// Fixed remediation checklist for this category.
    pub fn remediation(self) -> &'static str {
        match self {
            Self::MemoryCorruption => STEPS_MEMORY,
            Self::InvalidState => STEPS_INVALID_STATE,
            Self::ResourceExhaustion => STEPS_RESOURCE,
            Self::TimingRace => STEPS_TIMING,
        }
    }
}

/// Which signal/errno inputs are present.
///
/// The weak log rules only apply to [`DirectEvidence::Absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectEvidence {
    /// Neither signal nor errno was given.
    Absent,
    /// Only a signal.
    Signal(i32),
    /// Only an errno value.
    Errno(i32),
    /// Both.
    SignalAndErrno {
        /// Signal number.
        signal: i32,
        /// Errno value.
        errno: i32,
    },
}

impl DirectEvidence {
    /// Combine the optional inputs. An errno of `0` means "not provided".
    pub fn from_parts(signal: Option<i32>, errno: Option<i32>) -> Self {
        match (signal, errno.filter(|&code| code != 0)) {
            (None, None) => Self::Absent,
            (Some(signal), None) => Self::Signal(signal),
            (None, Some(errno)) => Self::Errno(errno),
            (Some(signal), Some(errno)) => Self::SignalAndErrno { signal, errno },
        }
    }

    /// Signal number, if present.
    pub fn signal(self) -> Option<i32> {
        match self {
            Self::Signal(signal) | Self::SignalAndErrno { signal, .. } => Some(signal),
            Self::Absent | Self::Errno(_) => None,
        }
    }

    /// Errno value, if present.
    pub fn errno(self) -> Option<i32> {
        match self {
            Self::Errno(errno) | Self::SignalAndErrno { errno, .. } => Some(errno),
            Self::Absent | Self::Signal(_) => None,
        }
    }
}

/// What a report was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Basis {
    /// A catalogued signal rule fired.
    Signal {
        /// Signal number.
        code: i32,
    },
    /// An errno rule fired.
    Errno {
        /// Errno value.
        code: i32,
    },
    /// A log keyword rule fired.
    LogKeywords,
    /// A signal was given but is not catalogued, and nothing else matched.
    UnsupportedSignal {
        /// Signal number.
        code: i32,
    },
    /// No rule matched.
    Insufficient,
}

/// Outcome of one classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    /// Assigned category. A placeholder when the report is inconclusive.
    pub category: FailureCategory,
    /// Root-cause statement.
    pub root_cause: String,
    /// Remediation checklist.
    pub remediation: &'static str,
    /// Evidence the report rests on.
    pub basis: Basis,
}

impl FailureReport {
    fn from_rule(category: FailureCategory, root_cause: &str, basis: Basis) -> Self {
        Self {
            category,
            root_cause: root_cause.to_owned(),
            remediation: category.remediation(),
            basis,
        }
    }

    /// `true` when a specific rule assigned the category.
    pub fn is_conclusive(&self) -> bool {
        matches!(
            self.basis,
            Basis::Signal { .. } | Basis::Errno { .. } | Basis::LogKeywords
        )
    }
}

/// Classify a failure from its signal, errno and log flags. Never fails.
pub fn classify(signal: Option<i32>, errno: Option<i32>, log: LogScanResult) -> FailureReport {
    let evidence = DirectEvidence::from_parts(signal, errno);

    let report = signal_rule(evidence)
        .or_else(|| errno_rule(evidence))
        .or_else(|| log_rule(evidence, log))
        .unwrap_or_else(|| fallback(evidence));

    debug!(
        category = ?report.category,
        basis = ?report.basis,
        conclusive = report.is_conclusive(),
        "classification complete"
    );
    report
}

/// Scan the optional log, then classify.
///
/// An unreadable log is treated as no log.
pub fn evaluate(
    signal: Option<i32>,
    errno: Option<i32>,
    log_path: Option<&Path>,
    opts: &ScanOptions,
) -> FailureReport {
    let log = scanner::scan_context(log_path, opts).flags();
    classify(signal, errno, log)
}

/// Rules 1-3.
fn signal_rule(evidence: DirectEvidence) -> Option<FailureReport> {
    let entry = signals::lookup_signal(evidence.signal()?)?;
    let basis = Basis::Signal { code: entry.code };

    let report = match entry.code {
        libc::SIGSEGV | libc::SIGBUS => {
            let root_cause = if evidence.errno() == Some(libc::EFAULT) {
                ROOT_CAUSE_BAD_ADDRESS_SIGNAL
            } else {
                entry.description
            };
            FailureReport::from_rule(FailureCategory::MemoryCorruption, root_cause, basis)
        }
        libc::SIGFPE => {
            FailureReport::from_rule(FailureCategory::InvalidState, entry.description, basis)
        }
        libc::SIGABRT => {
            FailureReport::from_rule(FailureCategory::InvalidState, ROOT_CAUSE_ABORT, basis)
        }
        _ => return None,
    };
    Some(report)
}

/// Rules 4-6.
fn errno_rule(evidence: DirectEvidence) -> Option<FailureReport> {
    let code = evidence.errno()?;
    let basis = Basis::Errno { code };

    let (category, root_cause) = match code {
        libc::ENOMEM => (
            FailureCategory::ResourceExhaustion,
            ROOT_CAUSE_RESOURCE_EXHAUSTION,
        ),
        libc::EFAULT => (
            FailureCategory::MemoryCorruption,
            ROOT_CAUSE_BAD_ADDRESS_ERRNO,
        ),
        libc::EINVAL => (FailureCategory::InvalidState, ROOT_CAUSE_INVALID_ARGUMENT),
        libc::EPIPE => (FailureCategory::InvalidState, ROOT_CAUSE_BROKEN_PIPE),
        _ => return None,
    };
    Some(FailureReport::from_rule(category, root_cause, basis))
}

/// Rules 7-9. Resource and memory keywords only count without direct evidence.
fn log_rule(evidence: DirectEvidence, log: LogScanResult) -> Option<FailureReport> {
    let (category, root_cause) = if log.timeout {
        (FailureCategory::TimingRace, ROOT_CAUSE_TIMING_RACE)
    } else if evidence != DirectEvidence::Absent {
        return None;
    } else if log.resource {
        (
            FailureCategory::ResourceExhaustion,
            ROOT_CAUSE_RESOURCE_EXHAUSTION,
        )
    } else if log.memory {
        (
            FailureCategory::MemoryCorruption,
            ROOT_CAUSE_MEMORY_CORRUPTION,
        )
    } else {
        return None;
    };
    Some(FailureReport::from_rule(
        category,
        root_cause,
        Basis::LogKeywords,
    ))
}

/// Rule 10.
fn fallback(evidence: DirectEvidence) -> FailureReport {
    let (root_cause, basis) = match evidence.signal() {
        Some(code) => (
            format!(
                "Unsupported {}: no classification rule applies",
                signals::signal_label(code)
            ),
            Basis::UnsupportedSignal { code },
        ),
        None => (ROOT_CAUSE_INSUFFICIENT.to_owned(), Basis::Insufficient),
    };

    FailureReport {
        category: FailureCategory::MemoryCorruption,
        root_cause,
        remediation: STEPS_NEED_EVIDENCE,
        basis,
    }
}
