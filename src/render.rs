//! Plain-text rendering of analysis results.

use std::fmt::Write as _;

use crate::analysis::{Analysis, SupervisedRun, Termination};
use crate::classifier::{Basis, FailureReport};
use crate::errno;
use crate::scanner::{LogContext, LogScanResult};
use crate::signals;

const RULE: &str = "================================";

/// Render one failure report block.
pub fn render_report(report: &FailureReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Failure Analysis Report ===");
    let _ = writeln!(out);
    if report.is_conclusive() {
        let _ = writeln!(out, "Failure Type: {}", report.category.label());
    } else {
        let _ = writeln!(out, "Failure Type: {}", inconclusive_label(report.basis));
    }
    let _ = writeln!(out, "Root Cause:   {}", report.root_cause);
    let _ = writeln!(out, "Evidence:     {}", describe_basis(report.basis));
    let _ = writeln!(out);
    let _ = writeln!(out, "Debug Steps:");
    let _ = writeln!(out, "{}", report.remediation);
    let _ = writeln!(out, "{RULE}");
    out
}

/// Render a direct analysis.
pub fn render_analysis(analysis: &Analysis) -> String {
    let mut out = render_report(&analysis.report);
    let _ = writeln!(out, "Log:          {}", describe_log(&analysis.log));
    out
}

/// Render a supervised run: termination summary, then the report if any.
pub fn render_run(run: &SupervisedRun) -> String {
    let mut out = String::new();
    let mut command = run.spec.program.clone();
    for arg in &run.spec.args {
        command.push(' ');
        command.push_str(arg);
    }

    let _ = writeln!(out, "=== Termination Summary ===");
    let _ = writeln!(out);
    let _ = writeln!(out, "Command:      {command}");
    let _ = writeln!(out, "Outcome:      {}", describe_termination(&run.termination));
    let _ = writeln!(out, "Log:          {}", describe_log(&run.log));
    let _ = writeln!(out, "{RULE}");

    if let Some(report) = &run.report {
        let _ = writeln!(out);
        out.push_str(&render_report(report));
    }
    out
}

/// One-line description of a termination verdict.
pub fn describe_termination(termination: &Termination) -> String {
    match termination {
        Termination::CleanExit => "exited with code 0 - no failure detected".to_owned(),
        Termination::CommandNotFound { reason: Some(reason) } => {
            format!("command not found ({reason})")
        }
        Termination::CommandNotFound { reason: None } => {
            "command not found (exit code 127)".to_owned()
        }
        Termination::FailureExit { code } => format!("exited with code {code} - failure"),
        Termination::Signaled {
            signal,
            core_dumped,
            supported,
        } => {
            let mut text = if *supported {
                format!(
                    "terminated by {} (signal {signal})",
                    signals::signal_label(*signal)
                )
            } else {
                format!("terminated by signal {signal}")
            };
            if *core_dumped {
                text.push_str(", core dumped");
            }
            if !*supported {
                text.push_str(" - unsupported signal");
            }
            text
        }
        Termination::Indeterminate => "unknown termination (indeterminate status)".to_owned(),
    }
}

fn inconclusive_label(basis: Basis) -> &'static str {
    match basis {
        Basis::UnsupportedSignal { .. } => "Unknown (unsupported signal)",
        _ => "Unknown (insufficient information)",
    }
}

fn describe_basis(basis: Basis) -> String {
    match basis {
        Basis::Signal { code } => format!("signal {} ({code})", signals::signal_label(code)),
        Basis::Errno { code } => format!(
            "errno {} ({code}, {})",
            errno::errno_name(code).unwrap_or("unknown"),
            errno::map_errno(code)
        ),
        Basis::LogKeywords => "log keywords".to_owned(),
        Basis::UnsupportedSignal { code } => format!("unsupported signal {code}"),
        Basis::Insufficient => "none".to_owned(),
    }
}

fn describe_log(log: &LogContext) -> String {
    match log {
        LogContext::NotProvided => "not provided".to_owned(),
        LogContext::Scanned { flags } => {
            let hits = flag_names(flags);
            if hits.is_empty() {
                "scanned, no keywords matched".to_owned()
            } else {
                format!("scanned, matched: {}", hits.join(", "))
            }
        }
        LogContext::Unreadable { error } => format!("unreadable ({error})"),
    }
}

fn flag_names(flags: &LogScanResult) -> Vec<&'static str> {
    [
        (flags.segfault, "segfault"),
        (flags.memory, "memory"),
        (flags.timeout, "timeout"),
        (flags.resource, "resource"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .collect()
}
