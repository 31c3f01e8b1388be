//! # AWS Route 53 DNS provider
//!
//! [`DnsProvider`] implementation issuing a `ChangeResourceRecordSets`
//! call with a single UPSERT change against the configured hosted zone.
//!
//! UPSERT is idempotent by definition: repeating the change with the same
//! record set leaves the zone unchanged. The provider performs exactly one
//! API call per invocation and propagates failures to the engine instead
//! of retrying.
//!
//! Credentials are provided explicitly through configuration; there is no
//! fallback to the ambient AWS credential chain, so a missing key fails
//! the run before any call is made.

use std::net::IpAddr;

use aws_sdk_route53::Client;
use aws_sdk_route53::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};

use ddrift_core::config::{ProviderConfig, RecordSpec, RecordType};
use ddrift_core::traits::{DnsProvider, DnsProviderFactory};
use ddrift_core::{Error, Result};

/// Route 53 is a global service; its API lives in us-east-1.
const DEFAULT_REGION: &str = "us-east-1";

/// AWS Route 53 DNS provider
pub struct Route53Provider {
    client: Client,
    hosted_zone_id: String,
}

// The SDK client embeds the credentials; keep them out of Debug output.
impl std::fmt::Debug for Route53Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Provider")
            .field("hosted_zone_id", &self.hosted_zone_id)
            .finish()
    }
}

impl Route53Provider {
    /// Create a new Route 53 provider with static credentials
    pub fn new(
        hosted_zone_id: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: Option<String>,
    ) -> Result<Self> {
        let hosted_zone_id = hosted_zone_id.into();
        let access_key_id = access_key_id.into();
        let secret_access_key = secret_access_key.into();

        if hosted_zone_id.is_empty() {
            return Err(Error::config("Route 53 hosted zone ID cannot be empty"));
        }
        if access_key_id.is_empty() || secret_access_key.is_empty() {
            return Err(Error::config("AWS credentials cannot be empty"));
        }

        let credentials =
            Credentials::new(access_key_id, secret_access_key, None, None, "ddrift-config");

        let config = aws_sdk_route53::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(
                region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            ))
            .credentials_provider(credentials)
            .build();

        Ok(Self {
            client: Client::from_conf(config),
            hosted_zone_id,
        })
    }
}

/// Map the configured record type onto the Route 53 record set type
fn rr_type(record_type: RecordType) -> RrType {
    match record_type {
        RecordType::A => RrType::A,
        RecordType::Aaaa => RrType::Aaaa,
    }
}

#[async_trait::async_trait]
impl DnsProvider for Route53Provider {
    async fn set_record(&self, record: &RecordSpec, ip: IpAddr) -> Result<()> {
        let fqdn = record.fqdn();

        let value = ResourceRecord::builder()
            .value(ip.to_string())
            .build()
            .map_err(|e| Error::provider("route53", format!("invalid record value: {}", e)))?;

        let record_set = ResourceRecordSet::builder()
            .name(&fqdn)
            .r#type(rr_type(record.record_type))
            .ttl(i64::from(record.ttl))
            .resource_records(value)
            .build()
            .map_err(|e| Error::provider("route53", format!("invalid record set: {}", e)))?;

        let change = Change::builder()
            .action(ChangeAction::Upsert)
            .resource_record_set(record_set)
            .build()
            .map_err(|e| Error::provider("route53", format!("invalid change: {}", e)))?;

        let batch = ChangeBatch::builder()
            .changes(change)
            .build()
            .map_err(|e| Error::provider("route53", format!("invalid change batch: {}", e)))?;

        tracing::info!(
            "upserting {} record {} -> {} in zone {}",
            record.record_type.as_str(),
            fqdn,
            ip,
            self.hosted_zone_id
        );

        self.client
            .change_resource_record_sets()
            .hosted_zone_id(&self.hosted_zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| {
                // DisplayErrorContext unwraps the SDK's nested error chain.
                let detail = aws_sdk_route53::error::DisplayErrorContext(&e);
                Error::provider("route53", format!("ChangeResourceRecordSets failed: {}", detail))
            })?;

        tracing::info!("record {} upserted", fqdn);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "route53"
    }
}

/// Factory for creating Route 53 providers
pub struct Route53Factory;

impl DnsProviderFactory for Route53Factory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::Route53 {
                hosted_zone_id,
                access_key_id,
                secret_access_key,
                region,
            } => Ok(Box::new(Route53Provider::new(
                hosted_zone_id.clone(),
                access_key_id.clone(),
                secret_access_key.clone(),
                region.clone(),
            )?)),
            _ => Err(Error::config("Invalid config for Route 53 provider")),
        }
    }
}

/// Register the Route 53 provider with a registry
pub fn register(registry: &ddrift_core::ProviderRegistry) {
    registry.register_provider("route53", Box::new(Route53Factory));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_types_map_to_rr_types() {
        assert_eq!(rr_type(RecordType::A), RrType::A);
        assert_eq!(rr_type(RecordType::Aaaa), RrType::Aaaa);
    }

    #[test]
    fn empty_zone_id_is_rejected() {
        assert!(Route53Provider::new("", "key", "secret", None).is_err());
    }

    #[test]
    fn empty_credentials_are_rejected() {
        assert!(Route53Provider::new("Z123", "", "secret", None).is_err());
        assert!(Route53Provider::new("Z123", "key", "", None).is_err());
    }

    #[test]
    fn factory_creates_from_matching_config() {
        let config = ProviderConfig::Route53 {
            hosted_zone_id: "Z123".to_string(),
            access_key_id: "key".to_string(),
            secret_access_key: "secret".to_string(),
            region: None,
        };
        assert!(Route53Factory.create(&config).is_ok());
    }

    #[test]
    fn factory_rejects_foreign_config() {
        let config = ProviderConfig::Godaddy {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            base_url: None,
        };
        assert!(Route53Factory.create(&config).is_err());
    }

    #[test]
    fn zone_id_visible_but_client_details_hidden_in_debug() {
        let provider = Route53Provider::new("Z123", "AKIAFAKE", "fake-secret", None).unwrap();
        let debug_str = format!("{:?}", provider);
        assert!(debug_str.contains("Z123"));
        assert!(!debug_str.contains("fake-secret"));
    }
}
