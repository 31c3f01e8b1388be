//! Error types for the reconciliation system
//!
//! The variants mirror the failure taxonomy of one run: configuration
//! problems are caught before any network call, lookup/resolution failures
//! end the run as a detection failure, provider failures are fatal and
//! never retried, and delivery failures are logged but never escalated.

use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the reconciliation system
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (pre-flight, no network calls made)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Public-IP lookup errors
    #[error("IP lookup error: {0}")]
    Lookup(String),

    /// DNS resolution errors
    #[error("DNS resolution error: {0}")]
    Resolution(String),

    /// Provider-specific update error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Instance guard errors
    #[error("Instance guard error: {0}")]
    Guard(String),

    /// Notification delivery errors
    #[error("Notification delivery error: {0}")]
    Delivery(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an IP lookup error
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create a DNS resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an instance guard error
    pub fn guard(msg: impl Into<String>) -> Self {
        Self::Guard(msg.into())
    }

    /// Create a notification delivery error
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }
}
