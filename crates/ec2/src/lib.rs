//! EC2 side of the security-group janitor.
//!
//! This crate provides:
//! - Domain types mirroring the EC2 ingress permission shape
//! - A narrow [`SecurityGroups`] trait (list + revoke) with an in-memory
//!   implementation for tests and local runs
//! - The AWS SDK implementation over DescribeSecurityGroups /
//!   RevokeSecurityGroupIngress
//! - The sweep loop that ties the codec and expiry policy to the provider
//! - Env-based configuration and the `sweep-worker` binary

pub mod client;
pub mod config;
pub mod provider;
pub mod rules;
pub mod sweep;

pub use client::Ec2SecurityGroups;
pub use config::JanitorConfig;
pub use provider::{MemorySecurityGroups, ProviderError, SecurityGroups};
pub use rules::{IngressRule, IpRangeEntry, PortRange, RuleKey};
pub use sweep::{SweepReport, Sweeper};
