//! Configuration types for the reconciliation system
//!
//! A [`ReconcileConfig`] is built once at startup, validated before any
//! network call, and passed read-only into the engine. There is no mutable
//! global configuration anywhere in the system.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Immutable configuration for one reconciliation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// The managed DNS record
    pub record: RecordSpec,

    /// Endpoint returning the caller's public IP as a plain-text body
    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,

    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Failure notification configuration
    pub notify: NotifyConfig,

    /// Path of the advisory lock file guarding concurrent runs
    #[serde(default = "default_lock_path")]
    pub lock_path: PathBuf,
}

impl ReconcileConfig {
    /// Validate the configuration
    ///
    /// Required keys (credentials above all) must be present and
    /// well-formed; there are no silent fallbacks for them.
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.record.validate()?;
        self.provider.validate()?;
        self.notify.validate()?;

        if self.lookup_url.is_empty() {
            return Err(crate::Error::config("IP lookup URL cannot be empty"));
        }
        if !self.lookup_url.starts_with("http://") && !self.lookup_url.starts_with("https://") {
            return Err(crate::Error::config(format!(
                "IP lookup URL must use HTTP or HTTPS. Got: {}",
                self.lookup_url
            )));
        }

        Ok(())
    }
}

/// The DNS record under management
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSpec {
    /// Zone apex, e.g. "example.com"
    pub domain: String,

    /// Host label within the zone, e.g. "home" ("@" for the apex itself)
    pub name: String,

    /// Record type (A for IPv4, AAAA for IPv6)
    #[serde(default = "default_record_type")]
    pub record_type: RecordType,

    /// Desired record TTL in seconds; also sizes the convergence-poll budget
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

impl RecordSpec {
    /// Fully qualified name of the managed record
    pub fn fqdn(&self) -> String {
        if self.name == "@" {
            self.domain.clone()
        } else {
            format!("{}.{}", self.name, self.domain)
        }
    }

    /// Validate the record specification
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_domain_name(&self.domain)?;
        if self.name.is_empty() {
            return Err(crate::Error::config("Record name cannot be empty"));
        }
        if self.name != "@" {
            validate_domain_name(&self.name)?;
        }
        if self.ttl == 0 {
            return Err(crate::Error::config("Record TTL must be > 0"));
        }
        Ok(())
    }
}

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    Aaaa,
}

impl RecordType {
    /// The record type as it appears in provider APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// GoDaddy REST API provider
    Godaddy {
        /// API key
        api_key: String,
        /// API secret
        api_secret: String,
        /// API base URL override (defaults to the production endpoint)
        #[serde(default)]
        base_url: Option<String>,
    },

    /// AWS Route 53 provider
    Route53 {
        /// Hosted zone ID
        hosted_zone_id: String,
        /// AWS access key ID
        access_key_id: String,
        /// AWS secret access key
        secret_access_key: String,
        /// AWS region (Route 53 is global; defaults to us-east-1)
        #[serde(default)]
        region: Option<String>,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Godaddy {
                api_key,
                api_secret,
                ..
            } => {
                if api_key.is_empty() {
                    return Err(crate::Error::config("GoDaddy API key cannot be empty"));
                }
                if api_secret.is_empty() {
                    return Err(crate::Error::config("GoDaddy API secret cannot be empty"));
                }
                Ok(())
            }
            ProviderConfig::Route53 {
                hosted_zone_id,
                access_key_id,
                secret_access_key,
                ..
            } => {
                if hosted_zone_id.is_empty() {
                    return Err(crate::Error::config(
                        "Route 53 hosted zone ID cannot be empty",
                    ));
                }
                if access_key_id.is_empty() || secret_access_key.is_empty() {
                    return Err(crate::Error::config("AWS credentials cannot be empty"));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Godaddy { .. } => "godaddy",
            ProviderConfig::Route53 { .. } => "route53",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Failure notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Destination address the escalation message is sent to
    pub destination: String,

    /// Mail command the message is piped through
    #[serde(default = "default_notify_command")]
    pub command: String,
}

impl NotifyConfig {
    /// Validate the notification configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.destination.is_empty() {
            return Err(crate::Error::config(
                "Notification destination cannot be empty",
            ));
        }
        if self.command.is_empty() {
            return Err(crate::Error::config(
                "Notification command cannot be empty",
            ));
        }
        Ok(())
    }
}

/// Validate that a string is a valid domain name
///
/// Basic DNS name validation per RFC 1035; not comprehensive but catches
/// common configuration mistakes.
fn validate_domain_name(domain: &str) -> Result<(), crate::Error> {
    if domain.is_empty() {
        return Err(crate::Error::config("Domain name cannot be empty"));
    }

    // Total length limit (RFC 1035: 253 chars max)
    if domain.len() > 253 {
        return Err(crate::Error::config(format!(
            "Domain name too long: {} chars (max 253)",
            domain.len()
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Domain name has empty label: '{}'",
                domain
            )));
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(crate::Error::config(format!(
                "Domain label contains invalid characters. Label: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

fn default_lookup_url() -> String {
    "https://icanhazip.com".to_string()
}

fn default_lock_path() -> PathBuf {
    std::env::temp_dir().join("ddrift.lock")
}

fn default_record_type() -> RecordType {
    RecordType::A
}

fn default_ttl() -> u32 {
    3600
}

fn default_notify_command() -> String {
    "mail".to_string()
}
