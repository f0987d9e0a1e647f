//! Exit code constants for the runguard CLI.
//!
//! Reserved codes are chosen so callers can branch on "busy" vs "broken"
//! without parsing stderr:
//! - 0: success (the wrapped command's own code is passed through otherwise)
//! - 2: usage error (bad flags, missing command)
//! - 70: cleanup failed while the wrapped command succeeded
//! - 73: lock acquisition timed out
//! - 124: deadline exceeded
//!
//! A child terminated by signal N is reported as 128 + N per POSIX shell
//! convention.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Usage error: bad arguments, invalid flag values, or no command given.
pub const USAGE_ERROR: i32 = 2;

/// Teardown failed after the wrapped command itself exited zero.
pub const CLEANUP_FAILURE: i32 = 70;

/// The lock could not be acquired before the configured timeout.
pub const LOCK_TIMEOUT: i32 = 73;

/// The wrapped command exceeded its wall-clock deadline.
pub const DEADLINE_EXCEEDED: i32 = 124;

/// Base added to the signal number when a child dies from a signal.
pub const SIGNAL_BASE: i32 = 128;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USAGE_ERROR,
            CLEANUP_FAILURE,
            LOCK_TIMEOUT,
            DEADLINE_EXCEEDED,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn reserved_codes_match_cli_contract() {
        assert_eq!(CLEANUP_FAILURE, 70);
        assert_eq!(LOCK_TIMEOUT, 73);
        assert_eq!(DEADLINE_EXCEEDED, 124);
    }

    #[test]
    fn signal_exits_follow_posix_convention() {
        // SIGTERM = 15 -> 143, SIGINT = 2 -> 130
        assert_eq!(SIGNAL_BASE + 15, 143);
        assert_eq!(SIGNAL_BASE + 2, 130);
    }
}
