//! Core reconcile engine
//!
//! The ReconcileEngine is responsible for:
//! - Detecting drift between the public IP and the published DNS record
//! - Consulting the instance guard before any mutating call
//! - Issuing at most one provider update per run
//! - Polling for convergence within a TTL-derived budget
//! - Escalating to the notifier when convergence never happens
//!
//! ## Control flow
//!
//! ```text
//! IpResolver ──┐
//!              ├── drift? ──no──▶ AlreadyInSync
//! DnsReader ───┘    │yes
//!                   ▼
//!             InstanceGuard ──held──▶ SkippedConcurrentRun
//!                   │free
//!                   ▼
//!             DnsProvider::set_record     (failure is fatal, not retried)
//!                   │
//!                   ▼
//!             poll DnsReader × RetryBudget ──match──▶ UpdateConfirmed
//!                   │exhausted
//!                   ▼
//!             Notifier::send ──▶ UpdateTimedOut
//! ```
//!
//! All retry and timing policy lives here; the capability adapters execute
//! single-shot calls and never sleep, retry, or back off on their own.

mod budget;

pub use budget::RetryBudget;

use std::fmt;
use std::net::IpAddr;

use tracing::{debug, info, warn};

use crate::config::ReconcileConfig;
use crate::error::Result;
use crate::traits::{DnsProvider, DnsReader, InstanceGuard, IpResolver, Notifier};

/// Terminal result of one reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The public IP and the DNS record already agree
    AlreadyInSync,
    /// Another instance holds the guard; nothing was touched
    SkippedConcurrentRun,
    /// The record was updated and the new value was observed via DNS
    UpdateConfirmed,
    /// The record was updated but never converged within the poll budget
    UpdateTimedOut,
    /// The public IP or the DNS record could not be determined
    DetectionFailed,
}

impl ReconcileOutcome {
    /// Whether this outcome counts as a success for exit-code purposes
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ReconcileOutcome::AlreadyInSync
                | ReconcileOutcome::SkippedConcurrentRun
                | ReconcileOutcome::UpdateConfirmed
        )
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReconcileOutcome::AlreadyInSync => "already in sync",
            ReconcileOutcome::SkippedConcurrentRun => "skipped (concurrent run)",
            ReconcileOutcome::UpdateConfirmed => "update confirmed",
            ReconcileOutcome::UpdateTimedOut => "update timed out",
            ReconcileOutcome::DetectionFailed => "detection failed",
        };
        f.write_str(s)
    }
}

/// Core reconcile engine
///
/// One engine value performs one reconciliation and is then discarded; the
/// process is invoked again by an external scheduler for the next run.
///
/// ## Ordering
///
/// The zero-cost drift comparison always runs before the guard check, so
/// the common "no drift" invocation touches neither the lock file nor the
/// provider.
pub struct ReconcileEngine {
    /// Public-IP lookup
    ip_resolver: Box<dyn IpResolver>,

    /// Published-record lookup, also used for convergence polling
    dns_reader: Box<dyn DnsReader>,

    /// Provider pushing the new value
    provider: Box<dyn DnsProvider>,

    /// Cross-process mutual exclusion
    guard: Box<dyn InstanceGuard>,

    /// Failure escalation channel
    notifier: Box<dyn Notifier>,

    /// Immutable run configuration
    config: ReconcileConfig,
}

impl ReconcileEngine {
    /// Create a new reconcile engine
    ///
    /// Validates the configuration; no network calls are made here.
    pub fn new(
        ip_resolver: Box<dyn IpResolver>,
        dns_reader: Box<dyn DnsReader>,
        provider: Box<dyn DnsProvider>,
        guard: Box<dyn InstanceGuard>,
        notifier: Box<dyn Notifier>,
        config: ReconcileConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ip_resolver,
            dns_reader,
            provider,
            guard,
            notifier,
            config,
        })
    }

    /// Perform one reconciliation
    ///
    /// Detection and convergence failures are reported as outcomes, not
    /// errors; `Err` is reserved for failures that need operator attention
    /// before the next scheduled run (provider rejection, guard I/O).
    pub async fn run(&self) -> Result<ReconcileOutcome> {
        let fqdn = self.config.record.fqdn();

        // Detection phase. Either lookup failing ends the run; retrying
        // detection is the scheduler's job at the next invocation.
        let current_ip = match self.ip_resolver.current_public_ip().await {
            Ok(ip) => ip,
            Err(e) => {
                warn!("public IP lookup failed: {}", e);
                return Ok(ReconcileOutcome::DetectionFailed);
            }
        };

        let dns_ip = match self.dns_reader.current_record_ip(&fqdn).await {
            Ok(ip) => ip,
            Err(e) => {
                warn!("DNS lookup for {} failed: {}", fqdn, e);
                return Ok(ReconcileOutcome::DetectionFailed);
            }
        };

        // Canonical comparison; source formatting was normalized at parse.
        if current_ip == dns_ip {
            debug!("{} already points at {}", fqdn, current_ip);
            return Ok(ReconcileOutcome::AlreadyInSync);
        }

        info!("drift detected on {}: {} -> {}", fqdn, dns_ip, current_ip);

        if self.guard.another_instance_running().await? {
            info!("another reconciliation is active, skipping this run");
            return Ok(ReconcileOutcome::SkippedConcurrentRun);
        }

        // The one mutating call of the run. Not retried: a provider-side
        // error will not self-heal, unlike propagation lag below.
        self.provider.set_record(&self.config.record, current_ip).await?;
        info!(
            "{} update accepted by {}, awaiting propagation",
            fqdn,
            self.provider.provider_name()
        );

        if self.poll_for_convergence(&fqdn, current_ip).await {
            info!("{} converged to {}", fqdn, current_ip);
            return Ok(ReconcileOutcome::UpdateConfirmed);
        }

        warn!(
            "{} did not converge to {} within the poll budget",
            fqdn, current_ip
        );
        self.escalate(current_ip).await;

        Ok(ReconcileOutcome::UpdateTimedOut)
    }

    /// Poll the DNS reader until it observes `expected` or the budget runs out
    ///
    /// A read error counts as "not yet converged": propagation lag is
    /// self-healing with time, and this phase is the one designed internal
    /// retry in the system.
    async fn poll_for_convergence(&self, fqdn: &str, expected: IpAddr) -> bool {
        let budget = RetryBudget::from_ttl(self.config.record.ttl);
        debug!(
            "polling for convergence: {} attempts, {:?} apart",
            budget.attempts, budget.delay
        );

        for attempt in 1..=budget.attempts {
            match self.dns_reader.current_record_ip(fqdn).await {
                Ok(ip) if ip == expected => return true,
                Ok(ip) => {
                    debug!("attempt {}: {} still resolves to {}", attempt, fqdn, ip);
                }
                Err(e) => {
                    debug!("attempt {}: lookup failed ({}), treating as not converged", attempt, e);
                }
            }

            if attempt < budget.attempts {
                tokio::time::sleep(budget.delay).await;
            }
        }

        false
    }

    /// Deliver the timeout escalation
    ///
    /// Delivery failure is logged and swallowed so a broken notification
    /// channel never masks the timeout outcome itself.
    async fn escalate(&self, new_ip: IpAddr) {
        let message = format!(
            "An IP address appears to have changed, but there was an issue \
             with updating it. The new IP address appears to be {}. Thank you.",
            new_ip
        );

        if let Err(e) = self
            .notifier
            .send(&message, &self.config.notify.destination)
            .await
        {
            warn!("failed to deliver timeout notification: {}", e);
        }
    }
}
