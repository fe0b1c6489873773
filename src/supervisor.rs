//! Launch a target program, block until it terminates, and normalise how it ended.
//!
//! There is no timeout and no polling: the calling thread waits for the
//! child's full lifetime.

use std::io;
use std::process::{Command, ExitStatus};

use serde::Serialize;
use tracing::{debug, info, warn};

/// Exit code shells and exec wrappers use for "program could not be executed".
///
/// A target that legitimately exits with 127 is indistinguishable from one
/// that was never found.
pub const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// Program and arguments for one supervised run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSpec {
    /// Program to execute, resolved through `PATH` when not a path.
    pub program: String,
    /// Arguments, in order, not including the program itself.
    pub args: Vec<String>,
}

impl RunSpec {
    /// Build a spec from a program and its arguments.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Run this spec via [`run_and_monitor`].
    ///
    /// # Errors
    ///
    /// See [`run_and_monitor`].
    pub fn run(&self) -> Result<ProcessOutcome, LaunchError> {
        run_and_monitor(&self.program, &self.args)
    }
}

/// How a supervised process ended. Exactly one state applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProcessOutcome {
    /// The target could not be started (missing, not executable).
    NotLaunched {
        /// OS error text from the failed exec.
        reason: String,
    },
    /// The process called exit.
    Exited {
        /// Exit status code.
        code: i32,
    },
    /// The process was killed by a signal.
    Signaled {
        /// Terminating signal number.
        signal: i32,
        /// Whether the kernel reported a core dump.
        core_dumped: bool,
    },
    /// The OS reported neither an exit nor a terminating signal.
    Indeterminate,
}

impl ProcessOutcome {
    /// `true` when the target was never found or could not be executed,
    /// including the exit-127 convention.
    pub fn is_command_not_found(&self) -> bool {
        match self {
            Self::NotLaunched { .. } => true,
            Self::Exited { code } => *code == EXIT_COMMAND_NOT_FOUND,
            Self::Signaled { .. } | Self::Indeterminate => false,
        }
    }
}

/// The process-creation or wait primitive itself failed.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// Process creation failed for reasons other than the target itself.
    #[error("failed to create process for '{program}': {source}")]
    Spawn {
        /// Program that was being launched.
        program: String,
        /// Underlying OS error.
        source: io::Error,
    },
    /// Waiting on a running child failed.
    #[error("failed to wait for '{program}' (pid {pid}): {source}")]
    Wait {
        /// Program that was running.
        program: String,
        /// Child process id.
        pid: u32,
        /// Underlying OS error.
        source: io::Error,
    },
}

/// Run `program` with `args` to completion and report how it terminated.
///
/// A target that cannot be found or executed is reported as
/// [`ProcessOutcome::NotLaunched`], not as an error.
///
/// # Errors
///
/// Returns [`LaunchError`] when the OS cannot create the child at all
/// (e.g. process table or memory exhaustion) or when waiting on it fails.
pub fn run_and_monitor(program: &str, args: &[String]) -> Result<ProcessOutcome, LaunchError> {
    info!(program, ?args, "launching target");

    let mut child = match Command::new(program).args(args).spawn() {
        Ok(child) => child,
        Err(e) if target_cannot_start(&e) => {
            warn!(program, error = %e, "target could not be executed");
            return Ok(ProcessOutcome::NotLaunched {
                reason: e.to_string(),
            });
        }
        Err(source) => {
            return Err(LaunchError::Spawn {
                program: program.to_owned(),
                source,
            })
        }
    };

    let pid = child.id();
    debug!(pid, "target running, waiting for termination");

    let status = child.wait().map_err(|source| LaunchError::Wait {
        program: program.to_owned(),
        pid,
        source,
    })?;

    let outcome = outcome_from_status(status);
    info!(pid, ?outcome, "target terminated");
    Ok(outcome)
}

/// Normalise an OS exit status.
pub fn outcome_from_status(status: ExitStatus) -> ProcessOutcome {
    if let Some(code) = status.code() {
        return ProcessOutcome::Exited { code };
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            return ProcessOutcome::Signaled {
                signal,
                core_dumped: status.core_dumped(),
            };
        }
    }

    ProcessOutcome::Indeterminate
}

/// Spawn failures caused by the target rather than by the system.
fn target_cannot_start(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
    ) || matches!(err.raw_os_error(), Some(code) if code == libc::ENOEXEC || code == libc::ENOTDIR)
}
