//! Test doubles and common utilities for reconcile contract tests
//!
//! These doubles count every call so tests can assert not just on the
//! outcome of a run but on which capabilities were (and were not) touched.

use ddrift_core::config::{
    NotifyConfig, ProviderConfig, ReconcileConfig, RecordSpec, RecordType,
};
use ddrift_core::error::{Error, Result};
use ddrift_core::traits::{DnsProvider, DnsReader, InstanceGuard, IpResolver, Notifier};
use std::collections::VecDeque;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An IpResolver returning a fixed address (or a fixed failure)
pub struct StaticIpResolver {
    ip: Option<IpAddr>,
    call_count: Arc<AtomicUsize>,
}

impl StaticIpResolver {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip: Some(ip),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            ip: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            ip: other.ip,
            call_count: Arc::clone(&other.call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpResolver for StaticIpResolver {
    async fn current_public_ip(&self) -> Result<IpAddr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.ip
            .ok_or_else(|| Error::lookup("lookup service unreachable"))
    }
}

/// A DnsReader replaying a scripted sequence of answers
///
/// The first entry answers the initial drift comparison; subsequent
/// entries answer convergence polls. The last entry repeats once the
/// script is exhausted. `None` entries are resolution failures.
pub struct ScriptedDnsReader {
    responses: std::sync::Mutex<VecDeque<Option<IpAddr>>>,
    last: std::sync::Mutex<Option<Option<IpAddr>>>,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedDnsReader {
    pub fn new(responses: Vec<Option<IpAddr>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.into_iter().collect()),
            last: std::sync::Mutex::new(None),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Reader that always answers with the same address
    pub fn constant(ip: IpAddr) -> Self {
        Self::new(vec![Some(ip)])
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            responses: std::sync::Mutex::new(other.responses.lock().unwrap().clone()),
            last: std::sync::Mutex::new(other.last.lock().unwrap().clone()),
            call_count: Arc::clone(&other.call_count),
        }
    }
}

#[async_trait::async_trait]
impl DnsReader for ScriptedDnsReader {
    async fn current_record_ip(&self, _name: &str) -> Result<IpAddr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let next = {
            let mut responses = self.responses.lock().unwrap();
            match responses.pop_front() {
                Some(entry) => {
                    if responses.is_empty() {
                        *self.last.lock().unwrap() = Some(entry);
                    }
                    entry
                }
                None => self
                    .last
                    .lock()
                    .unwrap()
                    .unwrap_or(None),
            }
        };

        next.ok_or_else(|| Error::resolution("no answer"))
    }
}

/// A DnsProvider that records calls and optionally fails
pub struct MockDnsProvider {
    fail: bool,
    set_call_count: Arc<AtomicUsize>,
    set_ips: Arc<std::sync::Mutex<Vec<IpAddr>>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            fail: false,
            set_call_count: Arc::new(AtomicUsize::new(0)),
            set_ips: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn set_call_count(&self) -> usize {
        self.set_call_count.load(Ordering::SeqCst)
    }

    pub fn set_ips(&self) -> Vec<IpAddr> {
        self.set_ips.lock().unwrap().clone()
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            fail: other.fail,
            set_call_count: Arc::clone(&other.set_call_count),
            set_ips: Arc::clone(&other.set_ips),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn set_record(&self, _record: &RecordSpec, ip: IpAddr) -> Result<()> {
        self.set_call_count.fetch_add(1, Ordering::SeqCst);
        self.set_ips.lock().unwrap().push(ip);

        if self.fail {
            return Err(Error::provider("mock", "update rejected"));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// An InstanceGuard with a fixed answer
pub struct StaticGuard {
    running: bool,
    call_count: Arc<AtomicUsize>,
}

impl StaticGuard {
    pub fn free() -> Self {
        Self {
            running: false,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn held() -> Self {
        Self {
            running: true,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            running: other.running,
            call_count: Arc::clone(&other.call_count),
        }
    }
}

#[async_trait::async_trait]
impl InstanceGuard for StaticGuard {
    async fn another_instance_running(&self) -> Result<bool> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.running)
    }
}

/// A Notifier that records every delivered message
pub struct RecordingNotifier {
    messages: Arc<std::sync::Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            messages: Arc::clone(&other.messages),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str, destination: &str) -> Result<()> {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), destination.to_string()));
        Ok(())
    }
}

/// Helper to create a minimal ReconcileConfig for testing
pub fn minimal_config(ttl: u32) -> ReconcileConfig {
    ReconcileConfig {
        record: RecordSpec {
            domain: "example.com".to_string(),
            name: "home".to_string(),
            record_type: RecordType::A,
            ttl,
        },
        lookup_url: "https://icanhazip.com".to_string(),
        provider: ProviderConfig::Godaddy {
            api_key: "test-key".to_string(),
            api_secret: "test-secret".to_string(),
            base_url: None,
        },
        notify: NotifyConfig {
            destination: "ops@example.com".to_string(),
            command: "mail".to_string(),
        },
        lock_path: std::env::temp_dir().join("ddrift-test.lock"),
    }
}

/// Parse helper for test addresses
pub fn ip(s: &str) -> IpAddr {
    s.parse().expect("test IP literal")
}
