//! IP resolver trait
//!
//! Defines the interface for fetching the machine's current public IP
//! address from an external lookup service.
//!
//! ## Implementations
//!
//! - HTTP-based: `ddrift-ip-http` crate
//! - Future: STUN, router UPnP queries, etc.

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for public-IP lookup implementations
///
/// Implementations must be thread-safe and usable across async tasks.
/// A single reconciliation run calls [`current_public_ip`] exactly once;
/// implementations should not cache across runs or retry internally.
/// Detection failures end the run and the scheduler tries again at the
/// next invocation.
///
/// [`current_public_ip`]: IpResolver::current_public_ip
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Get the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The current public IP, parsed from its canonical form
    /// - `Err(Error)`: If the lookup service is unreachable, returns a
    ///   non-success status, or returns a body that is not an IP literal
    async fn current_public_ip(&self) -> Result<IpAddr, crate::Error>;
}
