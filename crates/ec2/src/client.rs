//! AWS EC2 implementation of [`SecurityGroups`].
//!
//! Wraps the SDK client for one security group: DescribeSecurityGroups for
//! listing, RevokeSecurityGroupIngress for revocation. Required IAM
//! permissions: `ec2:DescribeSecurityGroups`, `ec2:RevokeSecurityGroupIngress`.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ec2::types::IpPermission;
use tracing::{debug, info};

use crate::config::JanitorConfig;
use crate::provider::{ProviderError, SecurityGroups};
use crate::rules::{IngressRule, IpRangeEntry, PortRange, RuleKey};

/// EC2-backed security group access, scoped to a single group id.
pub struct Ec2SecurityGroups {
    client: aws_sdk_ec2::Client,
    group_id: String,
}

impl Ec2SecurityGroups {
    /// Create a client for the group named in `config`.
    ///
    /// Returns [`ProviderError::NotConfigured`] when no group id is set.
    /// The AWS SDK config is loaded using the region specified in `config`.
    pub async fn new(config: &JanitorConfig) -> Result<Self, ProviderError> {
        if !config.is_configured() {
            return Err(ProviderError::NotConfigured);
        }

        let region = aws_sdk_ec2::config::Region::new(config.region.clone());
        let aws_cfg = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let client = aws_sdk_ec2::Client::new(&aws_cfg);

        info!(
            group_id = %config.security_group_id,
            region = %config.region,
            "Ec2SecurityGroups initialised"
        );

        Ok(Self {
            client,
            group_id: config.security_group_id.clone(),
        })
    }

    /// Map one SDK ingress permission into our domain shape.
    ///
    /// Protocol `"-1"` permissions carry no ports on the wire; entries
    /// without a CidrIp (IPv6-only members of the permission) are dropped.
    fn convert_permission(perm: &IpPermission) -> IngressRule {
        IngressRule {
            ports: PortRange {
                from: perm.from_port(),
                to: perm.to_port(),
            },
            protocol: perm.ip_protocol().unwrap_or("-1").to_string(),
            ranges: perm
                .ip_ranges()
                .iter()
                .filter_map(|range| {
                    range.cidr_ip().map(|cidr| IpRangeEntry {
                        cidr: cidr.to_string(),
                        description: range.description().map(str::to_string),
                    })
                })
                .collect(),
        }
    }
}

#[async_trait]
impl SecurityGroups for Ec2SecurityGroups {
    async fn list_ingress_rules(&self) -> Result<Vec<IngressRule>, ProviderError> {
        let resp = self
            .client
            .describe_security_groups()
            .group_ids(&self.group_id)
            .send()
            .await
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        let group = resp
            .security_groups()
            .first()
            .ok_or_else(|| ProviderError::GroupNotFound(self.group_id.clone()))?;

        let rules: Vec<IngressRule> = group
            .ip_permissions()
            .iter()
            .map(Self::convert_permission)
            .collect();

        debug!(
            group_id = %self.group_id,
            permissions = rules.len(),
            "listed ingress rules"
        );

        Ok(rules)
    }

    async fn revoke_ingress(&self, key: &RuleKey) -> Result<(), ProviderError> {
        let mut req = self
            .client
            .revoke_security_group_ingress()
            .group_id(&self.group_id)
            .ip_protocol(&key.protocol)
            .cidr_ip(&key.cidr);

        if let Some(from) = key.ports.from {
            req = req.from_port(from);
        }
        if let Some(to) = key.ports.to {
            req = req.to_port(to);
        }

        req.send()
            .await
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        info!(
            group_id = %self.group_id,
            cidr = %key.cidr,
            protocol = %key.protocol,
            "ingress rule revoked"
        );

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests — conversion logic only, no AWS calls
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ec2::types::IpRange;

    #[test]
    fn convert_tcp_permission() {
        let perm = IpPermission::builder()
            .ip_protocol("tcp")
            .from_port(22)
            .to_port(22)
            .ip_ranges(
                IpRange::builder()
                    .cidr_ip("203.0.113.0/24")
                    .description("auto-rule-1700000000")
                    .build(),
            )
            .ip_ranges(IpRange::builder().cidr_ip("198.51.100.7/32").build())
            .build();

        let rule = Ec2SecurityGroups::convert_permission(&perm);

        assert_eq!(rule.protocol, "tcp");
        assert_eq!(rule.ports, PortRange::single(22));
        assert_eq!(rule.ranges.len(), 2);
        assert_eq!(rule.ranges[0].cidr, "203.0.113.0/24");
        assert_eq!(
            rule.ranges[0].description.as_deref(),
            Some("auto-rule-1700000000")
        );
        assert_eq!(rule.ranges[1].description, None);
    }

    #[test]
    fn convert_all_traffic_permission() {
        let perm = IpPermission::builder()
            .ip_protocol("-1")
            .ip_ranges(IpRange::builder().cidr_ip("0.0.0.0/0").build())
            .build();

        let rule = Ec2SecurityGroups::convert_permission(&perm);

        assert_eq!(rule.protocol, "-1");
        assert_eq!(rule.ports, PortRange::all());
        assert_eq!(rule.ranges.len(), 1);
    }

    #[test]
    fn convert_drops_entries_without_cidr() {
        let perm = IpPermission::builder()
            .ip_protocol("tcp")
            .from_port(80)
            .to_port(80)
            .ip_ranges(IpRange::builder().description("no cidr here").build())
            .build();

        let rule = Ec2SecurityGroups::convert_permission(&perm);
        assert!(rule.ranges.is_empty());
    }

    #[test]
    fn missing_protocol_defaults_to_all() {
        let perm = IpPermission::builder().build();
        let rule = Ec2SecurityGroups::convert_permission(&perm);
        assert_eq!(rule.protocol, "-1");
    }
}
