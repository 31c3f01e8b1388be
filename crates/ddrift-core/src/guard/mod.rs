//! PID-file instance guard
//!
//! Advisory lock file implementation of [`InstanceGuard`]. The file holds a
//! small JSON payload (`{ "pid": ..., "acquired_at": ... }`) so an
//! overlapping invocation can tell a live holder from a stale leftover.
//!
//! ## Staleness
//!
//! A lock file is reclaimed when any of these hold:
//! - the payload cannot be parsed,
//! - the recorded PID is no longer alive,
//! - the payload is older than the worst-case run duration (the poll
//!   budget caps a run near one hour, so anything older cannot be a live
//!   holder even under PID reuse).
//!
//! The file is removed on drop when this process owns it; a crash leaves
//! the file behind, and the next invocation reclaims it via the rules
//! above.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::Error;
use crate::traits::InstanceGuard;

/// Upper bound on a run's lifetime: 360 poll attempts, 10 s apart, plus
/// slack for the network calls around them.
const MAX_LOCK_AGE_SECS: i64 = 3700;

/// Lock file payload
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LockInfo {
    pid: u32,
    acquired_at: DateTime<Utc>,
}

/// Advisory PID lock file guarding concurrent reconciliation runs
#[derive(Debug)]
pub struct PidFileGuard {
    path: PathBuf,
    owned: AtomicBool,
}

impl PidFileGuard {
    /// Create a guard for the given lock path; nothing is touched on disk
    /// until [`InstanceGuard::another_instance_running`] is called.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            owned: AtomicBool::new(false),
        }
    }

    /// Atomically create the lock file with our own PID
    ///
    /// Returns `Ok(true)` when the file was created by us, `Ok(false)` when
    /// another process created it first (lost the race).
    async fn try_create(&self) -> Result<bool, Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::guard(format!(
                        "failed to create lock directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let info = LockInfo {
            pid: std::process::id(),
            acquired_at: Utc::now(),
        };
        let payload = serde_json::to_vec(&info)?;

        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
        {
            Ok(mut file) => {
                file.write_all(&payload).await.map_err(|e| {
                    Error::guard(format!("failed to write lock file: {}", e))
                })?;
                file.flush().await.map_err(|e| {
                    Error::guard(format!("failed to flush lock file: {}", e))
                })?;
                self.owned.store(true, Ordering::SeqCst);
                debug!("acquired lock file {} (pid {})", self.path.display(), info.pid);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(Error::guard(format!(
                "failed to create lock file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Decide whether an existing lock file belongs to a live holder
    async fn holder_is_live(&self) -> Result<bool, Error> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(c) => c,
            // Holder released between our create attempt and this read.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => {
                return Err(Error::guard(format!(
                    "failed to read lock file {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let info: LockInfo = match serde_json::from_str(&contents) {
            Ok(info) => info,
            Err(e) => {
                warn!(
                    "lock file {} is unreadable ({}), treating as stale",
                    self.path.display(),
                    e
                );
                return Ok(false);
            }
        };

        let age = Utc::now().signed_duration_since(info.acquired_at);
        if age.num_seconds() > MAX_LOCK_AGE_SECS {
            warn!(
                "lock file {} is {}s old (pid {}), treating as stale",
                self.path.display(),
                age.num_seconds(),
                info.pid
            );
            return Ok(false);
        }

        Ok(pid_alive(info.pid))
    }

    /// Remove a stale lock file, tolerating a concurrent removal
    async fn reclaim(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::guard(format!(
                "failed to remove stale lock file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[async_trait::async_trait]
impl InstanceGuard for PidFileGuard {
    async fn another_instance_running(&self) -> Result<bool, Error> {
        if self.try_create().await? {
            return Ok(false);
        }

        if self.holder_is_live().await? {
            return Ok(true);
        }

        // Stale file: reclaim and try once more. Losing the second race
        // means another invocation got there first, which is a live holder.
        self.reclaim().await?;
        Ok(!self.try_create().await?)
    }
}

impl Drop for PidFileGuard {
    fn drop(&mut self) {
        if self.owned.load(Ordering::SeqCst) {
            if let Err(e) = std::fs::remove_file(&self.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("failed to remove lock file {}: {}", self.path.display(), e);
                }
            }
        }
    }
}

/// Best-effort PID liveness probe
///
/// On Unix, signal 0 probes existence without delivering anything; EPERM
/// still means the process exists. Elsewhere the probe reports alive and
/// the age bound above governs staleness.
#[cfg(unix)]
fn pid_alive(pid: u32) -> bool {
    let rc = unsafe { libc::kill(pid as libc::pid_t, 0) };
    rc == 0 || std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(not(unix))]
fn pid_alive(_pid: u32) -> bool {
    true
}
