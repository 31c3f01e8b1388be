//! Instance guard trait
//!
//! The tool is expected to be invoked on a fixed periodic schedule; a prior
//! slow invocation (still polling for convergence) must not race with a new
//! one issuing a second, possibly conflicting, update. The guard provides
//! mutual exclusion across process invocations.
//!
//! The production implementation is an advisory PID lock file
//! ([`crate::guard::PidFileGuard`]), not a process-table scan: matching
//! processes by a command-line substring is fragile, and two unrelated
//! processes sharing a substring by coincidence would deadlock the tool.

use async_trait::async_trait;

/// Trait for cross-process mutual exclusion
#[async_trait]
pub trait InstanceGuard: Send + Sync {
    /// Check whether another reconciliation instance is already active
    ///
    /// Implementations that acquire a lock as part of answering must keep
    /// holding it for the lifetime of the guard value, so that overlapping
    /// invocations observe this run until it finishes.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: Another live instance is running; the caller must not
    ///   touch the DNS provider
    /// - `Ok(false)`: No other instance; this run now holds the guard
    /// - `Err(Error)`: The guard state could not be determined
    async fn another_instance_running(&self) -> Result<bool, crate::Error>;
}
