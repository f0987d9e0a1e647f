//! Child process plumbing shared by the three supervisors.
//!
//! Covers spawning a command from argv, decoding an exit status into the
//! code reported to callers, signal-name parsing for `--signal`, and the
//! pid liveness probe used for stale-lock detection.

use crate::error::{GuardError, Result};
use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use std::os::unix::process::ExitStatusExt;
use std::process::{Child, Command, ExitStatus};

use crate::exit_codes;

/// Spawn a command from argv form (no shell involved).
///
/// stdin/stdout/stderr are inherited so the wrapped command behaves as if
/// it were invoked directly.
pub fn spawn_command(argv: &[String]) -> Result<Child> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| GuardError::Usage("no command given after '--'".to_string()))?;

    Command::new(program).args(args).spawn().map_err(|e| {
        GuardError::Runtime(format!(
            "failed to execute '{}': {}\n\
             Fix: ensure the command is installed and in PATH.",
            program, e
        ))
    })
}

/// Decode an exit status into the code we report for the child.
///
/// Normal exits pass the code through unchanged; a signal death maps to
/// 128 + signal number per POSIX shell convention.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        code
    } else if let Some(sig) = status.signal() {
        exit_codes::SIGNAL_BASE + sig
    } else {
        // Neither exited nor signaled; should not happen after wait().
        1
    }
}

/// Parse a signal name such as `TERM`, `SIGTERM`, or `int`.
pub fn parse_signal(name: &str) -> Result<Signal> {
    let upper = name.to_uppercase();
    let full = if upper.starts_with("SIG") {
        upper
    } else {
        format!("SIG{}", upper)
    };

    full.parse::<Signal>()
        .map_err(|_| GuardError::Usage(format!("unknown signal name '{}'", name)))
}

/// Send a signal to a pid, treating "no such process" as a benign no-op.
///
/// The liveness check and the send are not atomic: the target may exit in
/// between, and that race is expected rather than an error.
pub fn send_signal(pid: u32, signal: Signal) -> Result<()> {
    match kill(Pid::from_raw(pid as i32), signal) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(GuardError::Runtime(format!(
            "failed to send {} to pid {}: {}",
            signal, pid, e
        ))),
    }
}

/// Probe whether a process is alive using the no-op signal.
///
/// EPERM means the pid exists under another user and the probe was denied;
/// that is treated as alive so a live cross-user owner's lock is never
/// reclaimed out from under it.
pub fn pid_is_alive(pid: u32) -> bool {
    match kill(Pid::from_raw(pid as i32), None) {
        Ok(()) => true,
        Err(Errno::ESRCH) => false,
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn spawn_and_decode_normal_exit() {
        let mut child = spawn_command(&["true".to_string()]).unwrap();
        let status = child.wait().unwrap();
        assert_eq!(exit_code_of(status), 0);

        let mut child = spawn_command(&["sh".to_string(), "-c".to_string(), "exit 3".to_string()])
            .unwrap();
        let status = child.wait().unwrap();
        assert_eq!(exit_code_of(status), 3);
    }

    #[test]
    fn spawn_missing_program_fails() {
        let result = spawn_command(&["definitely-not-a-real-binary-xyz".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn spawn_empty_argv_is_usage_error() {
        let result = spawn_command(&[]);
        assert!(matches!(result, Err(GuardError::Usage(_))));
    }

    #[test]
    fn signal_death_maps_to_128_plus_signal() {
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        send_signal(child.id(), Signal::SIGKILL).unwrap();
        let status = child.wait().unwrap();
        assert_eq!(exit_code_of(status), exit_codes::SIGNAL_BASE + 9);
    }

    #[test]
    fn parse_signal_accepts_short_and_long_names() {
        assert_eq!(parse_signal("TERM").unwrap(), Signal::SIGTERM);
        assert_eq!(parse_signal("SIGTERM").unwrap(), Signal::SIGTERM);
        assert_eq!(parse_signal("int").unwrap(), Signal::SIGINT);
        assert_eq!(parse_signal("Kill").unwrap(), Signal::SIGKILL);
    }

    #[test]
    fn parse_signal_rejects_garbage() {
        assert!(matches!(parse_signal("BOGUS"), Err(GuardError::Usage(_))));
    }

    #[test]
    fn signaling_a_dead_pid_is_a_no_op() {
        let mut child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();
        // The pid is reaped; ESRCH must be swallowed.
        send_signal(pid, Signal::SIGTERM).unwrap();
    }

    #[test]
    fn pid_probe_detects_own_process() {
        assert!(pid_is_alive(std::process::id()));
    }

    #[test]
    fn pid_probe_detects_reaped_child() {
        let mut child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();
        assert!(!pid_is_alive(pid));
    }
}
