//! Errno catalog: maps the recognised error codes to a category label.
//!
//! The classifier does not consume these labels. It re-derives its
//! structured category from the raw code; the label is for display.

use serde::Serialize;

/// Coarse category an errno value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrnoCategory {
    /// EFAULT.
    MemoryCorruption,
    /// EINVAL, EPIPE.
    InvalidState,
    /// ENOMEM.
    ResourceExhaustion,
    /// Anything outside the recognised set.
    Unknown,
}

impl ErrnoCategory {
    /// Categorise a raw errno value. Total over all integers.
    pub fn of(code: i32) -> Self {
        match code {
            libc::EFAULT => Self::MemoryCorruption,
            libc::EINVAL | libc::EPIPE => Self::InvalidState,
            libc::ENOMEM => Self::ResourceExhaustion,
            _ => Self::Unknown,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::MemoryCorruption => "Memory Corruption",
            Self::InvalidState => "Invalid State",
            Self::ResourceExhaustion => "Resource Exhaustion",
            Self::Unknown => "Unknown Error",
        }
    }
}

/// Map an errno value to its category label (`"Unknown Error"` if unrecognised).
pub fn map_errno(code: i32) -> &'static str {
    ErrnoCategory::of(code).label()
}

/// Symbolic name for a recognised errno value.
pub fn errno_name(code: i32) -> Option<&'static str> {
    match code {
        libc::EFAULT => Some("EFAULT"),
        libc::EINVAL => Some("EINVAL"),
        libc::ENOMEM => Some("ENOMEM"),
        libc::EPIPE => Some("EPIPE"),
        _ => None,
    }
}
