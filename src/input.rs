//! Boundary validation for raw analysis inputs.
//!
//! The core trusts its optional inputs; everything out of range is rejected
//! here before classification runs.

use std::path::PathBuf;

use serde::Serialize;

/// Highest signal number accepted.
pub const MAX_SIGNAL: i32 = 64;
/// Highest errno value accepted.
pub const MAX_ERRNO: i32 = 255;

/// Rejected boundary input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Signal outside `1..=64`.
    #[error("invalid signal number: {0} (valid range: 1-{MAX_SIGNAL})")]
    SignalOutOfRange(i32),
    /// Errno outside `0..=255`.
    #[error("invalid errno value: {0} (valid range: 0-{MAX_ERRNO})")]
    ErrnoOutOfRange(i32),
    /// Nothing to analyse.
    #[error("at least one of signal, errno or log file must be provided")]
    NoInput,
}

/// Validated direct-analysis input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisInput {
    /// Terminating signal, if known.
    pub signal: Option<i32>,
    /// Errno value, if known. Never `Some(0)`.
    pub errno: Option<i32>,
    /// Log artifact to scan.
    pub log_path: Option<PathBuf>,
}

impl AnalysisInput {
    /// Validate raw inputs. An errno of `0` means "not provided".
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for out-of-range values or when all three
    /// inputs are absent.
    pub fn new(
        signal: Option<i32>,
        errno: Option<i32>,
        log_path: Option<PathBuf>,
    ) -> Result<Self, ValidationError> {
        let signal = signal.map(validate_signal).transpose()?;
        let errno = errno.map(validate_errno).transpose()?.flatten();

        if signal.is_none() && errno.is_none() && log_path.is_none() {
            return Err(ValidationError::NoInput);
        }

        Ok(Self {
            signal,
            errno,
            log_path,
        })
    }
}

/// Check a signal number is in `1..=64`.
///
/// # Errors
///
/// Returns [`ValidationError::SignalOutOfRange`] otherwise.
pub fn validate_signal(signal: i32) -> Result<i32, ValidationError> {
    if (1..=MAX_SIGNAL).contains(&signal) {
        Ok(signal)
    } else {
        Err(ValidationError::SignalOutOfRange(signal))
    }
}

/// Check an errno value is in `0..=255`, mapping `0` to absent.
///
/// # Errors
///
/// Returns [`ValidationError::ErrnoOutOfRange`] otherwise.
pub fn validate_errno(errno: i32) -> Result<Option<i32>, ValidationError> {
    match errno {
        0 => Ok(None),
        1..=MAX_ERRNO => Ok(Some(errno)),
        _ => Err(ValidationError::ErrnoOutOfRange(errno)),
    }
}
