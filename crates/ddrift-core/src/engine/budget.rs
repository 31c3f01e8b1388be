//! Convergence-poll retry budget

use std::time::Duration;

/// Fixed delay between convergence-poll attempts
const POLL_DELAY: Duration = Duration::from_secs(10);

/// Minimum TTL for which a proportional budget is meaningful
const MIN_PROPORTIONAL_TTL: u32 = 30;

/// TTL above which the budget is capped
const MAX_PROPORTIONAL_TTL: u32 = 3600;

/// Attempt cap; keeps the worst-case convergence wait near one hour
const MAX_ATTEMPTS: u32 = 360;

/// Poll budget for one run, derived once from the record TTL
///
/// Very short TTLs get a fixed two attempts (too short for a meaningful
/// proportional budget); everything else polls once per ten seconds of
/// TTL, capped so the worst-case wait stays near one hour no matter how
/// large the configured TTL is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    /// Number of poll attempts
    pub attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl RetryBudget {
    /// Derive the poll budget from a record TTL in seconds
    pub fn from_ttl(ttl: u32) -> Self {
        let attempts = if ttl < MIN_PROPORTIONAL_TTL {
            2
        } else if ttl > MAX_PROPORTIONAL_TTL {
            MAX_ATTEMPTS
        } else {
            ttl / 10
        };

        Self {
            attempts,
            delay: POLL_DELAY,
        }
    }
}
