//! Lock metadata: the `owner` file inside a lock directory.

use crate::error::{GuardError, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::fs;
use std::path::Path;

/// Name of the metadata file inside a lock directory.
pub const OWNER_FILE: &str = "owner";

/// Metadata recorded by the lock holder.
///
/// Serialized as line-oriented `key=value` pairs rather than JSON so an
/// operator can read a contended lock without tooling. Unknown keys are
/// ignored on parse for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockMetadata {
    /// Process ID of the lock holder.
    pub pid: u32,

    /// Timestamp when the lock was created (RFC3339).
    pub created_at: DateTime<Utc>,

    /// Hostname of the lock holder.
    pub host: String,
}

impl LockMetadata {
    /// Create metadata for the current process with the current timestamp.
    pub fn for_current_process() -> Self {
        Self {
            pid: std::process::id(),
            created_at: Utc::now(),
            host: hostname::get()
                .map(|h| h.to_string_lossy().to_string())
                .unwrap_or_else(|_| "unknown".to_string()),
        }
    }

    /// Read and parse the `owner` file of a lock directory.
    pub fn from_lock_dir(lock_dir: &Path) -> Result<Self> {
        let path = lock_dir.join(OWNER_FILE);
        let content = fs::read_to_string(&path).map_err(|e| {
            GuardError::Runtime(format!(
                "failed to read lock metadata '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::parse(&content).map_err(|e| {
            GuardError::Runtime(format!(
                "failed to parse lock metadata '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse `key=value` lines. Unknown keys are ignored; `pid` and
    /// `created_at` are required.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let mut pid: Option<u32> = None;
        let mut created_at: Option<DateTime<Utc>> = None;
        let mut host = "unknown".to_string();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match key {
                "pid" => {
                    pid = Some(
                        value
                            .parse()
                            .map_err(|_| format!("invalid pid '{}'", value))?,
                    );
                }
                "created_at" => {
                    created_at = Some(
                        DateTime::parse_from_rfc3339(value)
                            .map(|t| t.with_timezone(&Utc))
                            .map_err(|_| format!("invalid created_at '{}'", value))?,
                    );
                }
                "host" => host = value.to_string(),
                _ => {}
            }
        }

        Ok(Self {
            pid: pid.ok_or("missing pid")?,
            created_at: created_at.ok_or("missing created_at")?,
            host,
        })
    }

    /// Serialize to the `key=value` line format.
    pub fn to_record(&self) -> String {
        format!(
            "pid={}\ncreated_at={}\nhost={}\n",
            self.pid,
            self.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.host
        )
    }

    /// Write the `owner` file into an already-created lock directory.
    pub fn write_to(&self, lock_dir: &Path) -> Result<()> {
        let path = lock_dir.join(OWNER_FILE);
        fs::write(&path, self.to_record()).map_err(|e| {
            GuardError::Runtime(format!(
                "failed to write lock metadata '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Calculate the age of the lock from its recorded creation time.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created_at)
    }

    /// Format the age as a human-readable string for error messages.
    pub fn age_string(&self) -> String {
        let age = self.age();
        let seconds = age.num_seconds();
        let minutes = age.num_minutes();
        let hours = age.num_hours();

        if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds % 60)
        } else {
            format!("{}s", seconds)
        }
    }
}
