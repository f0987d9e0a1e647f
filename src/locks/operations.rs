//! Lock acquisition and the locked-command runner.

use super::guard::{LockGuard, remove_lock_dir};
use super::metadata::LockMetadata;
use crate::error::{GuardError, Result};
use crate::logging::log_line;
use crate::process::{exit_code_of, pid_is_alive, spawn_command};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Configuration for acquiring a lock.
#[derive(Debug, Clone)]
pub struct LockConfig {
    /// Path of the lock directory.
    pub path: PathBuf,

    /// How long to wait for acquisition. Zero means wait indefinitely.
    pub timeout: Duration,

    /// Delay between acquisition attempts while the lock is held.
    pub poll_interval: Duration,

    /// Age threshold for stale-lock recovery. Zero disables recovery.
    pub stale_after: Duration,
}

/// Acquire the lock, waiting and reclaiming stale locks per the config.
///
/// Acquisition is an atomic create-if-absent `mkdir` on the lock path.
/// On success the holder metadata is written and an RAII guard returned.
/// While the lock is held by someone else:
/// - with `stale_after` enabled, a lock whose recorded owner is dead and
///   whose age exceeds the threshold is removed and acquisition retried
///   immediately, without consuming a poll delay;
/// - otherwise the caller sleeps `poll_interval` between attempts until a
///   non-zero `timeout` elapses, which fails with the dedicated
///   lock-timeout error.
///
/// There is no reentrancy protection: a process acquiring a path it
/// already holds will wait on itself.
pub fn acquire(config: &LockConfig) -> Result<LockGuard> {
    if let Some(parent) = config.path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            GuardError::Runtime(format!(
                "failed to create lock parent directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let start = Instant::now();
    loop {
        match fs::create_dir(&config.path) {
            Ok(()) => {
                let guard = LockGuard::new(config.path.clone());
                LockMetadata::for_current_process().write_to(&config.path)?;
                return Ok(guard);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if !config.stale_after.is_zero() && reclaim_if_stale(config)? {
                    continue;
                }

                if config.timeout.is_zero() {
                    std::thread::sleep(config.poll_interval);
                    continue;
                }

                let elapsed = start.elapsed();
                if elapsed >= config.timeout {
                    return Err(GuardError::LockTimeout(format!(
                        "lock '{}' still held after {:.1}s{}",
                        config.path.display(),
                        config.timeout.as_secs_f64(),
                        holder_summary(&config.path)
                    )));
                }

                // Never sleep past the deadline; expiry should land near
                // the configured timeout, not a poll interval later.
                std::thread::sleep(config.poll_interval.min(config.timeout - elapsed));
            }
            Err(e) => {
                return Err(GuardError::Runtime(format!(
                    "failed to acquire lock '{}': {}",
                    config.path.display(),
                    e
                )));
            }
        }
    }
}

/// Acquire the lock, run the command, and release on every exit path.
///
/// Returns the wrapped command's exit code. The guard releases the lock
/// whether the command exits zero, non-zero, or the wait itself fails.
pub fn run_locked(config: &LockConfig, argv: &[String]) -> Result<i32> {
    let _guard = acquire(config)?;

    let mut child = spawn_command(argv)?;
    let status = child.wait().map_err(|e| {
        GuardError::Runtime(format!("failed to wait for locked command: {}", e))
    })?;

    Ok(exit_code_of(status))
}

/// Remove the lock if it is stale; returns true when acquisition should be
/// retried immediately (lock removed, or found already gone).
///
/// Staleness requires both a dead owner and a lock older than
/// `stale_after`. The age floor covers a holder that crashed, or is still
/// running, between `mkdir` and the metadata write; for that reason a lock
/// with unreadable metadata is also reclaimed once it is over-age. A live
/// owner is never reclaimed regardless of age.
fn reclaim_if_stale(config: &LockConfig) -> Result<bool> {
    let age = match lock_age(&config.path) {
        Some(age) => age,
        // Gone between our failed mkdir and now; retry at once.
        None => return Ok(true),
    };

    if age < config.stale_after {
        return Ok(false);
    }

    match LockMetadata::from_lock_dir(&config.path) {
        Ok(meta) if pid_is_alive(meta.pid) => return Ok(false),
        Ok(meta) => {
            log_line(
                "lock",
                &format!(
                    "reclaiming stale lock '{}' (owner pid {} on {} is dead, age {})",
                    config.path.display(),
                    meta.pid,
                    meta.host,
                    meta.age_string()
                ),
            );
        }
        Err(_) => {
            log_line(
                "lock",
                &format!(
                    "reclaiming stale lock '{}' (metadata unreadable, over age threshold)",
                    config.path.display()
                ),
            );
        }
    }

    // Another waiter may have removed it first; that still counts as
    // reclaimed for us.
    remove_lock_dir(&config.path).map_err(|e| {
        GuardError::Runtime(format!(
            "failed to remove stale lock '{}': {}",
            config.path.display(),
            e
        ))
    })?;

    Ok(true)
}

/// Age of the lock directory by filesystem mtime; None if the lock is gone.
fn lock_age(path: &Path) -> Option<Duration> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    Some(modified.elapsed().unwrap_or(Duration::ZERO))
}

/// Describe the current holder for the timeout error message, best effort.
fn holder_summary(path: &Path) -> String {
    match LockMetadata::from_lock_dir(path) {
        Ok(meta) => format!(
            "\nHolder: pid {} on {} (created {} ago)",
            meta.pid,
            meta.host,
            meta.age_string()
        ),
        Err(_) => String::new(),
    }
}
