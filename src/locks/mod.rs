//! Filesystem locking subsystem.
//!
//! A lock is a directory: atomic `mkdir` is the mutual-exclusion event, and
//! directory existence is the sole truth of "locked". This is the only
//! dependable single-host mutual-exclusion primitive that needs no separate
//! lock service.
//!
//! # Metadata
//!
//! The holder writes an `owner` file inside the lock directory with
//! line-oriented `key=value` pairs (`pid`, `created_at`, `host`) —
//! intentionally human-readable so an operator can inspect a contended lock
//! with `cat`. Contenders read it for stale-lock decisions and error
//! messages.
//!
//! # Stale recovery
//!
//! A waiter may forcibly remove a lock whose recorded owner pid is dead AND
//! whose age exceeds the configured threshold. Both conditions are required:
//! the age floor avoids reclaiming a lock whose owner has not finished
//! writing metadata yet, and guards against OS pid reuse producing a false
//! "alive".
//!
//! # RAII Guards
//!
//! Acquisition returns a guard that removes the lock directory on drop.
//! Removal tolerates "already gone" silently, because stale recovery means
//! any waiter may have deleted the directory first.

mod guard;
mod metadata;
mod operations;


pub use guard::LockGuard;
pub use metadata::{LockMetadata, OWNER_FILE};
pub use operations::{LockConfig, acquire, run_locked};
