//! The `lock` subcommand: run a command while holding an exclusive lock.

use super::seconds_arg;
use crate::cli::LockArgs;
use crate::error::Result;
use crate::locks::{LockConfig, run_locked};

pub fn cmd_lock(args: LockArgs) -> Result<i32> {
    let config = LockConfig {
        path: args.lock_file,
        timeout: seconds_arg("--timeout", args.timeout, true)?,
        poll_interval: seconds_arg("--poll-interval", args.poll_interval, false)?,
        stale_after: seconds_arg("--stale-after", args.stale_after, true)?,
    };

    run_locked(&config, &args.command)
}
