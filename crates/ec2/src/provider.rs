//! Narrow interface to the cloud provider.
//!
//! The sweep only ever needs two operations — list the group's ingress rules
//! and revoke one (port range, protocol, CIDR) tuple — so that is the whole
//! trait. The AWS implementation lives in [`crate::client`];
//! [`MemorySecurityGroups`] backs tests and local dry runs.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::rules::{IngressRule, RuleKey};

/// Errors from the provider side.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No security group id was configured.
    #[error("no security group id configured")]
    NotConfigured,

    /// The configured security group does not exist (or the describe call
    /// returned no groups).
    #[error("security group {0} not found")]
    GroupNotFound(String),

    /// An AWS SDK error (stringified).
    #[error("AWS SDK error: {0}")]
    Api(String),
}

/// The two calls the janitor makes against a security group.
#[async_trait]
pub trait SecurityGroups: Send + Sync {
    /// List the group's current ingress rules. Re-read in full on every
    /// sweep; the provider is the sole source of truth.
    async fn list_ingress_rules(&self) -> Result<Vec<IngressRule>, ProviderError>;

    /// Revoke the ingress entry identified by `key`.
    async fn revoke_ingress(&self, key: &RuleKey) -> Result<(), ProviderError>;
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// In-memory security group for tests and local runs.
///
/// Revoking a tuple that is no longer present succeeds, matching the
/// idempotence the sweep relies on when invocations overlap.
pub struct MemorySecurityGroups {
    rules: Mutex<Vec<IngressRule>>,
}

impl MemorySecurityGroups {
    pub fn new(rules: Vec<IngressRule>) -> Self {
        Self {
            rules: Mutex::new(rules),
        }
    }

    /// Snapshot of the current rules.
    pub async fn rules(&self) -> Vec<IngressRule> {
        self.rules.lock().await.clone()
    }
}

#[async_trait]
impl SecurityGroups for MemorySecurityGroups {
    async fn list_ingress_rules(&self) -> Result<Vec<IngressRule>, ProviderError> {
        Ok(self.rules.lock().await.clone())
    }

    async fn revoke_ingress(&self, key: &RuleKey) -> Result<(), ProviderError> {
        let mut rules = self.rules.lock().await;

        for rule in rules.iter_mut() {
            if rule.ports != key.ports || rule.protocol != key.protocol {
                continue;
            }
            rule.ranges.retain(|entry| entry.cidr != key.cidr);
        }

        // A permission with no remaining entries is gone on the AWS side too.
        rules.retain(|rule| !rule.ranges.is_empty());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{IpRangeEntry, PortRange};

    fn entry(cidr: &str) -> IpRangeEntry {
        IpRangeEntry {
            cidr: cidr.into(),
            description: None,
        }
    }

    fn ssh_rule(entries: Vec<IpRangeEntry>) -> IngressRule {
        IngressRule {
            ports: PortRange::single(22),
            protocol: "tcp".into(),
            ranges: entries,
        }
    }

    #[tokio::test]
    async fn revoke_removes_only_the_matching_tuple() {
        let group = MemorySecurityGroups::new(vec![ssh_rule(vec![
            entry("203.0.113.0/24"),
            entry("198.51.100.0/24"),
        ])]);

        let key = RuleKey {
            ports: PortRange::single(22),
            protocol: "tcp".into(),
            cidr: "203.0.113.0/24".into(),
        };
        group.revoke_ingress(&key).await.unwrap();

        let rules = group.rules().await;
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].ranges, vec![entry("198.51.100.0/24")]);
    }

    #[tokio::test]
    async fn revoke_does_not_touch_other_port_ranges() {
        let group = MemorySecurityGroups::new(vec![
            ssh_rule(vec![entry("203.0.113.0/24")]),
            IngressRule {
                ports: PortRange::single(443),
                protocol: "tcp".into(),
                ranges: vec![entry("203.0.113.0/24")],
            },
        ]);

        let key = RuleKey {
            ports: PortRange::single(22),
            protocol: "tcp".into(),
            cidr: "203.0.113.0/24".into(),
        };
        group.revoke_ingress(&key).await.unwrap();

        let rules = group.rules().await;
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].ports, PortRange::single(443));
    }

    #[tokio::test]
    async fn revoking_an_absent_tuple_is_ok() {
        let group = MemorySecurityGroups::new(vec![]);

        let key = RuleKey {
            ports: PortRange::single(22),
            protocol: "tcp".into(),
            cidr: "203.0.113.0/24".into(),
        };
        group.revoke_ingress(&key).await.unwrap();
        group.revoke_ingress(&key).await.unwrap();

        assert!(group.rules().await.is_empty());
    }
}
