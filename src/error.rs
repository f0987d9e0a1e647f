//! Error types for the runguard CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for runguard operations.
///
/// Each variant maps to a reserved exit code so callers can branch on
/// "busy" (lock timeout) vs "broken" (usage or runtime failure) without
/// parsing stderr. Reserved outcome codes that are not failures of runguard
/// itself (deadline exceeded, cleanup failure) are returned as ordinary
/// exit codes by the command handlers, not as errors.
#[derive(Error, Debug)]
pub enum GuardError {
    /// Invalid arguments or flag values.
    #[error("{0}")]
    Usage(String),

    /// The lock could not be acquired before the configured timeout.
    #[error("Lock acquisition timed out: {0}")]
    LockTimeout(String),

    /// A runtime operation failed (spawn, filesystem, signal delivery).
    #[error("{0}")]
    Runtime(String),
}

impl GuardError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            GuardError::Usage(_) => exit_codes::USAGE_ERROR,
            GuardError::LockTimeout(_) => exit_codes::LOCK_TIMEOUT,
            GuardError::Runtime(_) => 1,
        }
    }
}

/// Result type alias for runguard operations.
pub type Result<T> = std::result::Result<T, GuardError>;
