//! Timeout supervisor: run a child command under a wall-clock deadline.
//!
//! The waiting thread doubles as the watchdog: it polls the child against
//! the deadline, and on expiry escalates from the configured signal to an
//! unconditional kill after the grace period. Whichever of child-exit and
//! deadline happens first wins; signaling a pid that has already exited is
//! a benign no-op, since the liveness check and the signal send are not
//! atomic.

use crate::error::{GuardError, Result};
use crate::logging::log_line;
use crate::process::{exit_code_of, send_signal, spawn_command};
use nix::sys::signal::Signal;
use std::process::Child;
use std::time::{Duration, Instant};

/// Delay between child liveness polls.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Configuration for a supervised run.
#[derive(Debug, Clone)]
pub struct DeadlineConfig {
    /// Wall-clock budget for the child. Must be strictly positive.
    pub timeout: Duration,

    /// Signal sent when the deadline fires.
    pub signal: Signal,

    /// How long to wait after the soft signal before the unconditional
    /// kill. Zero escalates immediately.
    pub grace: Duration,
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            signal: Signal::SIGTERM,
            grace: Duration::from_secs(10),
        }
    }
}

/// Result of a supervised run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineOutcome {
    /// The child finished on its own; carries its real exit code
    /// (or 128+signal if it died from an unrelated signal).
    Completed(i32),

    /// The deadline fired and the child was terminated.
    ///
    /// Reported to callers as the reserved code 124 so it can never be
    /// confused with an ordinary child exit.
    DeadlineExceeded,
}

/// Run a command under a deadline with signal escalation.
pub fn run_with_deadline(config: &DeadlineConfig, argv: &[String]) -> Result<DeadlineOutcome> {
    if config.timeout.is_zero() {
        return Err(GuardError::Usage(
            "--timeout must be strictly positive".to_string(),
        ));
    }

    let mut child = spawn_command(argv)?;
    let start = Instant::now();

    loop {
        match try_wait(&mut child)? {
            Some(status) => return Ok(DeadlineOutcome::Completed(exit_code_of(status))),
            None if start.elapsed() >= config.timeout => {
                terminate(&mut child, config)?;
                return Ok(DeadlineOutcome::DeadlineExceeded);
            }
            None => std::thread::sleep(POLL_INTERVAL),
        }
    }
}

/// Escalate: soft signal, wait out the grace period, then SIGKILL.
fn terminate(child: &mut Child, config: &DeadlineConfig) -> Result<()> {
    log_line(
        "timeout",
        &format!(
            "deadline of {:.1}s exceeded, sending {} to pid {}",
            config.timeout.as_secs_f64(),
            config.signal,
            child.id()
        ),
    );
    send_signal(child.id(), config.signal)?;

    let grace_start = Instant::now();
    while grace_start.elapsed() < config.grace {
        if try_wait(child)?.is_some() {
            return Ok(());
        }
        std::thread::sleep(POLL_INTERVAL.min(config.grace));
    }

    if try_wait(child)?.is_none() {
        log_line(
            "timeout",
            &format!(
                "pid {} survived {:.1}s grace period, killing",
                child.id(),
                config.grace.as_secs_f64()
            ),
        );
        // kill() is SIGKILL on Unix; an already-exited child is fine.
        let _ = child.kill();
        child.wait().map_err(|e| {
            GuardError::Runtime(format!("failed to reap killed child: {}", e))
        })?;
    }

    Ok(())
}

fn try_wait(child: &mut Child) -> Result<Option<std::process::ExitStatus>> {
    child.try_wait().map_err(|e| {
        GuardError::Runtime(format!("failed to check child status: {}", e))
    })
}
