//! Cleanup coordinator: ordered, one-shot, LIFO teardown around a command.
//!
//! Cleanup actions accumulate before the command starts and run exactly
//! once, in reverse registration order, whether the command exits normally,
//! fails, or is interrupted by INT/TERM/HUP. The same teardown code path
//! serves both the happy path and the signal path, so the two can never
//! diverge.
//!
//! # Exit code precedence
//!
//! 1. command failed (including death by a forwarded signal) -> its code,
//!    even when teardown also failed;
//! 2. command exited zero but teardown failed -> reserved code 70;
//! 3. command exited zero while a signal was received -> 128 + signal;
//! 4. otherwise -> the command's code unchanged.
//!
//! This distinguishes "successful operation with leaked teardown" from both
//! full success and primary failure.

mod signals;
mod stack;

#[cfg(test)]
mod tests;

pub use signals::SignalForwarder;
pub use stack::{CleanupStack, read_cleanup_file};

use crate::error::{GuardError, Result};
use crate::exit_codes;
use crate::process::{exit_code_of, spawn_command};

/// Run a command with registered cleanup actions.
///
/// Teardown runs even when the command cannot be spawned: the registered
/// actions typically release resources created before this call.
pub fn run_with_cleanup(actions: Vec<String>, argv: &[String]) -> Result<i32> {
    let stack = CleanupStack::new(actions);

    // Handlers go in before the spawn so a signal landing in that window
    // is held for the child instead of killing us and skipping teardown.
    let forwarder = SignalForwarder::install()?;

    let mut child = match spawn_command(argv) {
        Ok(child) => child,
        Err(e) => {
            stack.run();
            return Err(e);
        }
    };
    forwarder.set_child(child.id());

    let status = match child.wait() {
        Ok(status) => status,
        Err(e) => {
            stack.run();
            return Err(GuardError::Runtime(format!(
                "failed to wait for command: {}",
                e
            )));
        }
    };

    // Teardown runs while the forwarder is still installed, so a late
    // signal is recorded (and harmlessly forwarded to the reaped pid)
    // instead of killing us mid-teardown.
    let cleanup_ok = stack.run();
    let received = forwarder.last_signal();
    drop(forwarder);

    let child_code = exit_code_of(status);
    let code = if child_code == exit_codes::SUCCESS && !cleanup_ok {
        exit_codes::CLEANUP_FAILURE
    } else if child_code == exit_codes::SUCCESS && let Some(sig) = received {
        exit_codes::SIGNAL_BASE + sig
    } else {
        child_code
    };

    Ok(code)
}
