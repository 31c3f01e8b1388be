//! Notifier trait
//!
//! Defines the interface for delivering a human-readable failure message
//! through an external channel. Invoked only when an update was issued but
//! never converged within the poll budget.

use async_trait::async_trait;

/// Trait for notification implementations
///
/// Delivery is best-effort: the engine logs a delivery failure and moves
/// on, so a broken mail setup can never mask the underlying timeout.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message` to `destination`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The channel accepted the message
    /// - `Err(Error)`: Delivery failed; callers log this and continue
    async fn send(&self, message: &str, destination: &str) -> Result<(), crate::Error>;
}
