//! # Recursive-resolver DNS reader
//!
//! [`DnsReader`] implementation backed by hickory-resolver. Queries go to a
//! public recursive resolver rather than the OS stub resolver: a locally
//! cached answer can claim "already in sync" for a record that is actually
//! stale, and convergence polling needs to observe the live recursive
//! answer, not the cache that was warm before the update.

use std::net::IpAddr;

use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::proto::rr::{RData, RecordType as WireRecordType};

use ddrift_core::config::RecordType;
use ddrift_core::traits::DnsReader;
use ddrift_core::{Error, Result};

/// DNS reader querying a public recursive resolver
pub struct RecursiveDnsReader {
    resolver: TokioAsyncResolver,
    record_type: RecordType,
}

impl RecursiveDnsReader {
    /// Create a reader for the given record type, using Cloudflare's
    /// public resolvers.
    pub fn new(record_type: RecordType) -> Self {
        Self::with_config(record_type, ResolverConfig::cloudflare())
    }

    /// Create a reader with an explicit resolver configuration
    pub fn with_config(record_type: RecordType, config: ResolverConfig) -> Self {
        let resolver = TokioAsyncResolver::tokio(config, ResolverOpts::default());
        Self {
            resolver,
            record_type,
        }
    }
}

/// Map the configured record type onto the wire type queried for
fn wire_type(record_type: RecordType) -> WireRecordType {
    match record_type {
        RecordType::A => WireRecordType::A,
        RecordType::Aaaa => WireRecordType::AAAA,
    }
}

#[async_trait::async_trait]
impl DnsReader for RecursiveDnsReader {
    async fn current_record_ip(&self, name: &str) -> Result<IpAddr> {
        let rtype = wire_type(self.record_type);

        let lookup = self
            .resolver
            .lookup(name, rtype)
            .await
            .map_err(|e| Error::resolution(format!("{} lookup for {} failed: {}", rtype, name, e)))?;

        let ip = lookup
            .iter()
            .find_map(|rdata| match rdata {
                RData::A(a) => Some(IpAddr::V4(a.0)),
                RData::AAAA(aaaa) => Some(IpAddr::V6(aaaa.0)),
                _ => None,
            })
            .ok_or_else(|| {
                Error::resolution(format!("no {} record in answer for {}", rtype, name))
            })?;

        tracing::debug!("{} currently resolves to {}", name, ip);
        Ok(ip)
    }
}
