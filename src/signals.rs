//! Catalog of the termination signals the classifier has rules for.
//!
//! Codes come from `libc` so the table matches the host platform's numbering
//! (SIGBUS is 7 on Linux but 10 on the BSDs).

use serde::Serialize;

/// One recognised termination signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalEntry {
    /// Platform signal number.
    pub code: i32,
    /// Symbolic name, e.g. `SIGSEGV`.
    pub name: &'static str,
    /// Short human-readable description.
    pub description: &'static str,
}

static SIGNALS: [SignalEntry; 4] = [
    SignalEntry {
        code: libc::SIGSEGV,
        name: "SIGSEGV",
        description: "Segmentation fault - invalid memory access",
    },
    SignalEntry {
        code: libc::SIGABRT,
        name: "SIGABRT",
        description: "Abort signal - abnormal termination",
    },
    SignalEntry {
        code: libc::SIGBUS,
        name: "SIGBUS",
        description: "Bus error - invalid memory access alignment",
    },
    SignalEntry {
        code: libc::SIGFPE,
        name: "SIGFPE",
        description: "Floating-point exception - arithmetic error",
    },
];

/// Look up a signal in the catalog.
///
/// `None` means the signal is outside the supported set. That is a valid
/// outcome, not an error.
pub fn lookup_signal(code: i32) -> Option<&'static SignalEntry> {
    SIGNALS.iter().find(|entry| entry.code == code)
}

/// All catalog entries, in table order.
pub fn catalog() -> &'static [SignalEntry] {
    &SIGNALS
}

/// Display label for any signal code: the catalog name, or `signal N`.
pub fn signal_label(code: i32) -> String {
    match lookup_signal(code) {
        Some(entry) => entry.name.to_owned(),
        None => format!("signal {code}"),
    }
}
