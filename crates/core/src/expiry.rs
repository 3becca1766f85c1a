//! Expiry decision for managed rules.
//!
//! A pure predicate over (creation time, now, TTL). The current time is
//! always injected by the caller — nothing here reads the system clock, so
//! the policy is deterministic and directly testable.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Decides whether a managed rule has outlived its time-to-live.
///
/// Stateless and idempotent: identical inputs always yield identical output.
#[derive(Debug, Clone)]
pub struct ExpiryPolicy {
    ttl: Duration,
}

impl ExpiryPolicy {
    /// Create a policy with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns `true` iff `now - created_at >= ttl`.
    ///
    /// The boundary is inclusive: a rule is expired at the exact instant its
    /// TTL elapses. A `now` before `created_at` (clock skew, bad tag) counts
    /// as not expired.
    pub fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        // A TTL too large for chrono arithmetic means the rule never expires.
        let ttl = TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::MAX);
        now.signed_duration_since(created_at) >= ttl
    }
}
