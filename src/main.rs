//! Runguard: filesystem locking and process-lifecycle supervision for
//! independently-invoked automation scripts.
//!
//! This is the main entry point for the `runguard` CLI. It parses
//! arguments, dispatches to the appropriate command handler, and converts
//! the result into the process exit code. The wrapped command's own code
//! passes through unchanged; reserved codes mark supervision outcomes
//! (73 lock timeout, 124 deadline exceeded, 70 cleanup failure).

mod cleanup;
mod cli;
mod commands;
mod error;
mod exit_codes;
mod locks;
mod logging;
mod process;
mod supervisor;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli.command) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            // Human-readable report on stderr; the exit code is the
            // machine-readable contract.
            eprintln!("Error: {}", err);
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}
