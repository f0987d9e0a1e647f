//! Command implementations for runguard.
//!
//! The dispatcher routes CLI commands to their handlers. Handlers return
//! the exit code to report, which is usually the wrapped command's own
//! code; reserved codes (73, 124, 70) mark supervision outcomes.

mod cleanup;
mod lock;
mod timeout;

use crate::cli::Command;
use crate::error::{GuardError, Result};
use std::time::Duration;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<i32> {
    match command {
        Command::Lock(args) => lock::cmd_lock(args),
        Command::Timeout(args) => timeout::cmd_timeout(args),
        Command::Cleanup(args) => cleanup::cmd_cleanup(args),
    }
}

/// Convert a seconds flag into a Duration, rejecting negatives, zero
/// where zero has no defined meaning, and values a Duration cannot hold.
fn seconds_arg(flag: &str, value: f64, zero_allowed: bool) -> Result<Duration> {
    if !value.is_finite() || value < 0.0 {
        return Err(GuardError::Usage(format!(
            "{} must be a non-negative number of seconds, got {}",
            flag, value
        )));
    }
    if value == 0.0 && !zero_allowed {
        return Err(GuardError::Usage(format!(
            "{} must be strictly positive",
            flag
        )));
    }
    Duration::try_from_secs_f64(value)
        .map_err(|_| GuardError::Usage(format!("{} is out of range: {}", flag, value)))
}
