//! CLI argument parsing for runguard.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.
//!
//! All three subcommands take the wrapped command after `--`, argv-style,
//! so no shell is involved in running it.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Runguard: filesystem locking and process-lifecycle supervision.
///
/// Three independent, composable command-runners for coordinating
/// independently-invoked automation scripts:
/// - `lock`: exclusive named lock with stale recovery
/// - `timeout`: wall-clock deadline with signal escalation
/// - `cleanup`: ordered one-shot LIFO teardown on exit or signal
#[derive(Parser, Debug)]
#[command(name = "runguard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for runguard.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command while holding an exclusive filesystem lock.
    ///
    /// Acquisition atomically creates the lock directory; on contention
    /// the lock is polled until it frees, the timeout elapses (exit 73),
    /// or the current holder is judged stale and reclaimed.
    Lock(LockArgs),

    /// Run a command under a wall-clock deadline.
    ///
    /// On expiry the child receives the configured signal, then an
    /// unconditional kill after the grace period; exit code 124 is
    /// reserved for "deadline exceeded".
    Timeout(TimeoutArgs),

    /// Run a command with registered teardown actions.
    ///
    /// Teardown runs exactly once, in reverse registration order, on
    /// normal exit or on INT/TERM/HUP. Exit code 70 is reserved for
    /// "cleanup failed while the command succeeded".
    Cleanup(CleanupArgs),
}

/// Arguments for the `lock` subcommand.
#[derive(clap::Args, Debug)]
pub struct LockArgs {
    /// Path of the lock directory.
    #[arg(long = "lock-file", value_name = "PATH")]
    pub lock_file: PathBuf,

    /// Seconds to wait for acquisition (0 = wait indefinitely).
    #[arg(long, value_name = "SEC", default_value_t = 0.0)]
    pub timeout: f64,

    /// Seconds between acquisition attempts while the lock is held.
    #[arg(long = "poll-interval", value_name = "SEC", default_value_t = 1.0)]
    pub poll_interval: f64,

    /// Reclaim a lock older than this whose owner is dead (0 = never).
    #[arg(long = "stale-after", value_name = "SEC", default_value_t = 0.0)]
    pub stale_after: f64,

    /// Command to run while holding the lock.
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Arguments for the `timeout` subcommand.
#[derive(clap::Args, Debug)]
pub struct TimeoutArgs {
    /// Wall-clock budget in seconds (fractional allowed, must be > 0).
    #[arg(long, value_name = "SEC")]
    pub timeout: f64,

    /// Signal sent when the deadline fires (e.g. TERM, SIGINT, HUP).
    #[arg(long, value_name = "NAME", default_value = "TERM")]
    pub signal: String,

    /// Seconds between the soft signal and the unconditional kill
    /// (0 = kill immediately).
    #[arg(long, value_name = "SEC", default_value_t = 10.0)]
    pub grace: f64,

    /// Command to supervise.
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Arguments for the `cleanup` subcommand.
#[derive(clap::Args, Debug)]
pub struct CleanupArgs {
    /// Teardown command, repeatable; later registrations run first.
    #[arg(long = "cleanup", value_name = "CMD", action = ArgAction::Append)]
    pub cleanup: Vec<String>,

    /// File of teardown commands, one per line (# comments allowed),
    /// registered after any --cleanup flags.
    #[arg(long = "cleanup-file", value_name = "PATH")]
    pub cleanup_file: Option<PathBuf>,

    /// Command to run before teardown.
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
