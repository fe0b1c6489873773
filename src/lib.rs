//! Rule-based post-mortem classifier for crashed native programs.
//!
//! Combines a termination signal, an errno value and keyword evidence from a
//! log into one categorised failure report with a remediation checklist. Can
//! also launch a target program and classify how it terminated.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Direct and supervised analysis modes.
pub mod analysis;
/// Ordered failure classification rules.
pub mod classifier;
/// Configuration loading and validation.
pub mod config;
/// Errno catalog.
pub mod errno;
/// Boundary validation of raw inputs.
pub mod input;
/// Logging setup.
pub mod logging;
/// Text rendering of reports and run summaries.
pub mod render;
/// Log keyword scanning.
pub mod scanner;
/// Signal catalog.
pub mod signals;
/// Child process launch and termination monitoring.
pub mod supervisor;
