//! # ddrift-core
//!
//! Core library for the ddrift DNS reconciliation tool.
//!
//! One invocation performs one reconciliation: detect the current public
//! IP and the published DNS answer, compare them canonically, and when they
//! drift apart push the new value through a provider API, then poll until
//! the update is visible or a TTL-derived budget runs out.
//!
//! ## Architecture Overview
//!
//! - **IpResolver**: Trait for fetching the current public IP
//! - **DnsReader**: Trait for resolving the published record value
//! - **DnsProvider**: Trait for pushing updates via provider APIs
//! - **InstanceGuard**: Trait for cross-process mutual exclusion
//! - **Notifier**: Trait for failure escalation
//! - **ReconcileEngine**: Orchestrates the drift-detect → guard → update →
//!   confirm → escalate sequence and owns all retry/timing policy
//! - **ProviderRegistry**: Plugin-based registry for DNS providers
//!
//! ## Design Principles
//!
//! 1. **Separation of Concerns**: Core logic is separate from adapters
//! 2. **Single-shot**: No state persists between invocations beyond the
//!    instance-guard lock file
//! 3. **Library-First**: All core functionality usable without the daemon
//! 4. **One mutation per run**: At most one provider update is ever issued,
//!    and only behind the instance guard

pub mod config;
pub mod engine;
pub mod error;
pub mod guard;
pub mod notify;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::{NotifyConfig, ProviderConfig, ReconcileConfig, RecordSpec, RecordType};
pub use engine::{ReconcileEngine, ReconcileOutcome, RetryBudget};
pub use error::{Error, Result};
pub use guard::PidFileGuard;
pub use notify::CommandNotifier;
pub use registry::ProviderRegistry;
pub use traits::{DnsProvider, DnsReader, InstanceGuard, IpResolver, Notifier};
