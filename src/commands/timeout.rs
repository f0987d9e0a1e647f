//! The `timeout` subcommand: run a command under a wall-clock deadline.

use super::seconds_arg;
use crate::cli::TimeoutArgs;
use crate::error::Result;
use crate::exit_codes;
use crate::process::parse_signal;
use crate::supervisor::{DeadlineConfig, DeadlineOutcome, run_with_deadline};

pub fn cmd_timeout(args: TimeoutArgs) -> Result<i32> {
    let config = DeadlineConfig {
        timeout: seconds_arg("--timeout", args.timeout, false)?,
        signal: parse_signal(&args.signal)?,
        grace: seconds_arg("--grace", args.grace, true)?,
    };

    match run_with_deadline(&config, &args.command)? {
        DeadlineOutcome::Completed(code) => Ok(code),
        DeadlineOutcome::DeadlineExceeded => Ok(exit_codes::DEADLINE_EXCEEDED),
    }
}
