//! Timestamped, component-tagged log lines on stderr.
//!
//! Supervision outcomes are reported through exit codes; these lines exist
//! for operators reading logs after the fact. They are independent of the
//! machine-readable exit code and never go to stdout, which belongs to the
//! wrapped command.

use chrono::{SecondsFormat, Utc};

/// Write one `[timestamp] [component] message` line to stderr.
pub fn log_line(component: &str, message: &str) {
    eprintln!(
        "[{}] [{}] {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        component,
        message
    );
}
