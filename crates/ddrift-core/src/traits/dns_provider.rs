//! DNS provider trait
//!
//! Defines the interface for pushing a new IP value to the managed DNS
//! record via a provider-specific API.
//!
//! ## Implementations
//!
//! - GoDaddy REST API: `ddrift-provider-godaddy` crate
//! - AWS Route 53: `ddrift-provider-route53` crate
//!
//! ## Responsibility boundaries
//!
//! Providers execute exactly one update call per invocation and return
//! success or failure. They must not retry, back off, poll for propagation,
//! or decide whether an update is needed; all of that is owned by the
//! reconcile engine. A provider error is fatal for the run: a provider-side
//! failure (bad credentials, malformed record) will not self-heal by
//! retrying blindly, so it is surfaced immediately for the operator to fix
//! before the next scheduled invocation.

use async_trait::async_trait;
use std::net::IpAddr;

use crate::config::RecordSpec;

/// Trait for DNS provider implementations
///
/// # Idempotence
///
/// `set_record` must be idempotent: calling it twice with identical
/// arguments leaves the record in the same end state as calling it once.
/// Both required variants (a PUT-style REST call and an UPSERT change set)
/// satisfy this naturally.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Set the managed record to `ip`
    ///
    /// # Parameters
    ///
    /// - `record`: The managed record (domain, host label, type, TTL)
    /// - `ip`: The new IP value
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The provider accepted the update
    /// - `Err(Error)`: The update failed; propagated to the engine as a
    ///   fatal error for this run
    async fn set_record(&self, record: &RecordSpec, ip: IpAddr) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
