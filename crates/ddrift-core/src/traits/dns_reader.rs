//! DNS reader trait
//!
//! Defines the interface for resolving the IP currently published in the
//! managed DNS record. Used twice per run: once for the initial drift
//! comparison and once per convergence-poll attempt.

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for DNS reader implementations
///
/// Implementations should query a recursive resolver directly rather than
/// the OS stub resolver; a locally cached answer can report "already in
/// sync" for a record that is actually stale.
#[async_trait]
pub trait DnsReader: Send + Sync {
    /// Resolve the IP currently published for `name`
    ///
    /// # Parameters
    ///
    /// - `name`: Fully qualified record name (e.g. "home.example.com")
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The first matching answer for the managed record type
    /// - `Err(Error)`: If resolution fails or yields no matching record
    async fn current_record_ip(&self, name: &str) -> Result<IpAddr, crate::Error>;
}
