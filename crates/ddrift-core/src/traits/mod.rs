//! Core traits for the reconciliation system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpResolver`]: Fetch the machine's current public IP
//! - [`DnsReader`]: Resolve the currently published IP of the managed record
//! - [`DnsProvider`]: Push a new IP to the managed record via a provider API
//! - [`InstanceGuard`]: Mutual exclusion across process invocations
//! - [`Notifier`]: Deliver a failure message through an external channel

pub mod dns_provider;
pub mod dns_reader;
pub mod instance_guard;
pub mod ip_resolver;
pub mod notifier;

pub use dns_provider::{DnsProvider, DnsProviderFactory};
pub use dns_reader::DnsReader;
pub use instance_guard::InstanceGuard;
pub use ip_resolver::IpResolver;
pub use notifier::Notifier;
