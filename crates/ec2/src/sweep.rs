//! The sweep: one sequential pass over a security group's ingress rules.
//!
//! For each CIDR entry with a description, the codec decides whether the
//! rule is ours, the expiry policy decides whether it has outlived its TTL,
//! and expired rules are revoked one at a time. Unmanaged and malformed
//! descriptions are skipped without ever reaching the parser's error path.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use janitor_core::{DescriptionCodec, ExpiryPolicy};

use crate::provider::{ProviderError, SecurityGroups};
use crate::rules::RuleKey;

/// Counts from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Managed entries found (description matched the codec).
    pub examined: usize,
    /// Expired entries revoked (or that would be revoked, under dry run).
    pub revoked: usize,
    /// Managed entries still within their TTL.
    pub kept: usize,
    /// Entries with no description, or with an unmanaged/malformed one.
    pub skipped: usize,
}

/// Drives one cleanup pass over a [`SecurityGroups`] provider.
pub struct Sweeper {
    codec: DescriptionCodec,
    policy: ExpiryPolicy,
    dry_run: bool,
}

impl Sweeper {
    pub fn new(codec: DescriptionCodec, policy: ExpiryPolicy) -> Self {
        Self {
            codec,
            policy,
            dry_run: false,
        }
    }

    /// Under dry run, expired rules are reported but never revoked.
    pub fn dry_run(mut self, yes: bool) -> Self {
        self.dry_run = yes;
        self
    }

    /// Run one sweep at the given instant.
    ///
    /// Rules are re-listed in full and examined sequentially. A revoke
    /// failure aborts the sweep and propagates; the next scheduled run
    /// re-examines everything.
    pub async fn run(
        &self,
        api: &dyn SecurityGroups,
        now: DateTime<Utc>,
    ) -> Result<SweepReport, ProviderError> {
        let rules = api.list_ingress_rules().await?;
        let mut report = SweepReport::default();

        for rule in &rules {
            for entry in &rule.ranges {
                let description = match entry.description.as_deref() {
                    Some(d) => d,
                    None => {
                        report.skipped += 1;
                        continue;
                    }
                };

                if !self.codec.matches(description) {
                    debug!(cidr = %entry.cidr, "description not ours, skipping");
                    report.skipped += 1;
                    continue;
                }

                let tag = match self.codec.parse(description) {
                    Ok(tag) => tag,
                    Err(e) => {
                        // Unreachable past the matches gate, but never revoke
                        // on an ambiguous parse.
                        warn!(cidr = %entry.cidr, error = %e, "undecodable description, skipping");
                        report.skipped += 1;
                        continue;
                    }
                };

                report.examined += 1;
                info!(
                    description = %description,
                    cidr = %entry.cidr,
                    protocol = %rule.protocol,
                    "examining rule"
                );

                if !self.policy.is_expired(tag.created_at, now) {
                    debug!(cidr = %entry.cidr, "rule not expired, keeping it");
                    report.kept += 1;
                    continue;
                }

                report.revoked += 1;
                if self.dry_run {
                    info!(cidr = %entry.cidr, "rule expired (dry run, leaving in place)");
                    continue;
                }

                info!(cidr = %entry.cidr, "rule expired, removing it");
                api.revoke_ingress(&RuleKey::for_entry(rule, entry)).await?;
            }
        }

        info!(
            examined = report.examined,
            revoked = report.revoked,
            kept = report.kept,
            skipped = report.skipped,
            "sweep complete"
        );

        Ok(report)
    }
}
