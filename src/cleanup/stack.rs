//! The ordered cleanup stack and its one-shot LIFO runner.

use crate::error::{GuardError, Result};
use crate::logging::log_line;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};

/// Ordered list of teardown commands with a one-shot runner.
///
/// Actions are command strings, split with shell-words and executed
/// directly (no shell). They run in reverse registration order, mirroring
/// structured resource unwinding: the most recently created resource is
/// released first.
#[derive(Debug)]
pub struct CleanupStack {
    actions: Vec<String>,
    ran: AtomicBool,
    all_ok: AtomicBool,
}

impl CleanupStack {
    /// Create a stack from actions in registration order.
    pub fn new(actions: Vec<String>) -> Self {
        Self {
            actions,
            ran: AtomicBool::new(false),
            all_ok: AtomicBool::new(true),
        }
    }

    /// Run the teardown sequence exactly once; re-running is a silent
    /// no-op that reports the first run's result.
    ///
    /// Every action executes even if an earlier one fails. Each failure is
    /// logged individually and aggregated into the returned flag, so a
    /// partial teardown still attempts every step. Returns true when all
    /// actions succeeded.
    pub fn run(&self) -> bool {
        if self.ran.swap(true, Ordering::SeqCst) {
            return self.all_ok.load(Ordering::SeqCst);
        }

        let mut failures = 0usize;
        for action in self.actions.iter().rev() {
            if let Err(e) = run_action(action) {
                failures += 1;
                log_line("cleanup", &format!("action '{}' failed: {}", action, e));
            }
        }

        if failures > 0 {
            log_line(
                "cleanup",
                &format!(
                    "{} of {} cleanup actions failed",
                    failures,
                    self.actions.len()
                ),
            );
            self.all_ok.store(false, Ordering::SeqCst);
        }

        failures == 0
    }
}

/// Execute a single cleanup action, mapping any failure to a message.
fn run_action(action: &str) -> std::result::Result<(), String> {
    let args = shell_words::split(action)
        .map_err(|e| format!("could not parse command: {}", e))?;

    let (program, rest) = args
        .split_first()
        .ok_or_else(|| "empty command".to_string())?;

    let status = Command::new(program)
        .args(rest)
        .status()
        .map_err(|e| format!("failed to execute: {}", e))?;

    if status.success() {
        Ok(())
    } else {
        Err(format!("exited with {:?}", status.code()))
    }
}

/// Read cleanup actions from a file, one command per line.
///
/// Blank lines and `#` comments are skipped. Line order is registration
/// order, so the last line of the file runs first.
pub fn read_cleanup_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| {
        GuardError::Usage(format!(
            "failed to read cleanup file '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
