//! # GoDaddy DNS provider
//!
//! [`DnsProvider`] implementation for the GoDaddy v1 domains API.
//!
//! One update is a single authenticated PUT replacing the managed record:
//!
//! ```http
//! PUT /v1/domains/{domain}/records/{type}/{name}
//! Authorization: sso-key {api_key}:{api_secret}
//!
//! [{ "data": "203.0.113.9", "ttl": 3600, "name": "home" }]
//! ```
//!
//! PUT-replace is idempotent by construction: repeating the call with the
//! same arguments leaves the record set unchanged. The provider performs
//! exactly one HTTP request per invocation and propagates failures to the
//! engine instead of retrying.
//!
//! ## Security
//!
//! The API credentials never appear in logs; the Debug implementation
//! redacts them.

use std::net::IpAddr;
use std::time::Duration;

use ddrift_core::config::{ProviderConfig, RecordSpec};
use ddrift_core::traits::{DnsProvider, DnsProviderFactory};
use ddrift_core::{Error, Result};

/// GoDaddy production API base URL
const GODADDY_API_BASE: &str = "https://api.godaddy.com";

/// Timeout for provider API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// GoDaddy DNS provider
pub struct GoDaddyProvider {
    api_key: String,
    api_secret: String,
    base_url: String,
    client: reqwest::Client,
}

// Credentials are redacted from Debug output.
impl std::fmt::Debug for GoDaddyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoDaddyProvider")
            .field("api_key", &"<REDACTED>")
            .field("api_secret", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GoDaddyProvider {
    /// Create a new GoDaddy provider
    ///
    /// # Parameters
    ///
    /// - `api_key` / `api_secret`: production credentials from the GoDaddy
    ///   developer portal
    /// - `base_url`: API endpoint override, primarily for tests
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        base_url: Option<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();

        if api_key.is_empty() || api_secret.is_empty() {
            return Err(Error::config("GoDaddy credentials cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            api_secret,
            base_url: base_url.unwrap_or_else(|| GODADDY_API_BASE.to_string()),
            client,
        })
    }

    fn auth_header(&self) -> String {
        format!("sso-key {}:{}", self.api_key, self.api_secret)
    }
}

#[async_trait::async_trait]
impl DnsProvider for GoDaddyProvider {
    async fn set_record(&self, record: &RecordSpec, ip: IpAddr) -> Result<()> {
        let url = format!(
            "{}/v1/domains/{}/records/{}/{}",
            self.base_url,
            record.domain,
            record.record_type.as_str(),
            record.name
        );

        // The API replaces the whole record set for (type, name).
        let body = serde_json::json!([{
            "data": ip.to_string(),
            "ttl": record.ttl,
            "name": record.name,
        }]);

        tracing::info!("updating {} record {} -> {}", record.record_type.as_str(), record.fqdn(), ip);

        let response = self
            .client
            .put(&url)
            .header("Authorization", self.auth_header())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::provider("godaddy", format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return match status.as_u16() {
                401 | 403 => Err(Error::provider(
                    "godaddy",
                    format!(
                        "Authentication failed: invalid API key/secret or insufficient permissions. Status: {}",
                        status
                    ),
                )),
                404 => Err(Error::provider(
                    "godaddy",
                    format!("Domain or record not found: {}", record.fqdn()),
                )),
                422 => Err(Error::provider(
                    "godaddy",
                    format!("Record rejected as malformed: {} - {}", status, error_text),
                )),
                429 => Err(Error::provider(
                    "godaddy",
                    format!("Rate limit exceeded. Status: {}", status),
                )),
                500..=599 => Err(Error::provider(
                    "godaddy",
                    format!("Server error (transient): {} - {}", status, error_text),
                )),
                _ => Err(Error::provider(
                    "godaddy",
                    format!("Update failed: {} - {}", status, error_text),
                )),
            };
        }

        tracing::info!("record {} updated", record.fqdn());
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "godaddy"
    }
}

/// Factory for creating GoDaddy providers
pub struct GoDaddyFactory;

impl DnsProviderFactory for GoDaddyFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::Godaddy {
                api_key,
                api_secret,
                base_url,
            } => Ok(Box::new(GoDaddyProvider::new(
                api_key.clone(),
                api_secret.clone(),
                base_url.clone(),
            )?)),
            _ => Err(Error::config("Invalid config for GoDaddy provider")),
        }
    }
}

/// Register the GoDaddy provider with a registry
pub fn register(registry: &ddrift_core::ProviderRegistry) {
    registry.register_provider("godaddy", Box::new(GoDaddyFactory));
}
