//! Domain types for security-group ingress rules.
//!
//! These mirror the EC2 wire shape closely enough that the sweep logic can
//! be exercised against an in-memory provider with the same semantics as the
//! real API.

use serde::{Deserialize, Serialize};

/// Port range of an ingress permission.
///
/// Both ends are absent for protocol `"-1"` (all traffic) rules, which carry
/// no FromPort/ToPort on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub from: Option<i32>,
    pub to: Option<i32>,
}

impl PortRange {
    /// A single-port range.
    pub fn single(port: i32) -> Self {
        Self {
            from: Some(port),
            to: Some(port),
        }
    }

    /// The all-traffic range (no ports on the wire).
    pub fn all() -> Self {
        Self {
            from: None,
            to: None,
        }
    }
}

/// One (CIDR, description) entry under an ingress permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpRangeEntry {
    pub cidr: String,
    /// Free-text description; carries the janitor tag for managed rules.
    pub description: Option<String>,
}

/// One ingress permission: a protocol/port condition with its CIDR entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    pub ports: PortRange,
    /// IP protocol as EC2 spells it: `"tcp"`, `"udp"`, `"icmp"`, or `"-1"`.
    pub protocol: String,
    pub ranges: Vec<IpRangeEntry>,
}

/// Identifies one revocable (port range, protocol, CIDR) tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleKey {
    pub ports: PortRange,
    pub protocol: String,
    pub cidr: String,
}

impl RuleKey {
    /// The key for one CIDR entry of a rule.
    pub fn for_entry(rule: &IngressRule, entry: &IpRangeEntry) -> Self {
        Self {
            ports: rule.ports,
            protocol: rule.protocol.clone(),
            cidr: entry.cidr.clone(),
        }
    }
}
