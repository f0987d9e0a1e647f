//! RAII lock guard implementation.

use crate::error::{GuardError, Result};
use crate::logging::log_line;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// RAII guard for a lock directory.
///
/// When dropped, the lock directory is removed. A directory that is already
/// gone is a silent no-op: stale recovery allows any waiter to delete the
/// lock, so "already released" is an expected state, not an error. Other
/// removal failures log a warning but never panic.
#[derive(Debug)]
pub struct LockGuard {
    /// Path to the lock directory.
    path: PathBuf,

    /// Whether the lock has been released manually.
    released: bool,
}

impl LockGuard {
    /// Create a new lock guard for the given path.
    pub(super) fn new(path: PathBuf) -> Self {
        Self {
            path,
            released: false,
        }
    }

    /// Get the path to the lock directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Manually release the lock.
    ///
    /// This is useful when you want to release the lock before the guard
    /// goes out of scope, and want to handle errors explicitly.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        remove_lock_dir(&self.path).map_err(|e| {
            GuardError::Runtime(format!(
                "failed to release lock '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = remove_lock_dir(&self.path)
        {
            log_line(
                "lock",
                &format!("failed to release lock '{}': {}", self.path.display(), e),
            );
        }
    }
}

/// Remove a lock directory, treating NotFound as success.
pub(super) fn remove_lock_dir(path: &Path) -> std::io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
