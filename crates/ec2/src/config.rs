//! Janitor configuration.
//!
//! An explicit struct passed into the entry point — nothing below `main`
//! reads the environment or holds globals. Accepts both the `JANITOR_*`
//! names and the bare `SECURITY_GROUP_ID`/`REGION` names earlier deployments
//! used.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use janitor_core::DEFAULT_MARKER;

/// Default TTL for managed rules: one day.
const DEFAULT_TTL_SECONDS: u64 = 86_400;

const DEFAULT_REGION: &str = "us-east-1";

// ── Env helpers ──────────────────────────────────────────────────

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// First non-empty value among the given keys.
fn env_first(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| env_opt(k))
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    match env_opt(key) {
        Some(v) => matches!(v.as_str(), "true" | "1"),
        None => default,
    }
}

// ── JanitorConfig ────────────────────────────────────────────────

/// Configuration for one sweep of one security group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Security group to clean (`sg-...`). Empty means not configured.
    pub security_group_id: String,
    /// AWS region the group lives in.
    pub region: String,
    /// Marker expected in managed rule descriptions.
    pub marker: String,
    /// Managed rule time-to-live in seconds.
    pub ttl_seconds: u64,
    /// Report expired rules without revoking them.
    pub dry_run: bool,
}

impl JanitorConfig {
    /// Build config from environment variables.
    ///
    /// `JANITOR_SECURITY_GROUP_ID` falls back to `SECURITY_GROUP_ID`;
    /// `JANITOR_REGION` falls back to `AWS_REGION`, then `REGION`.
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            security_group_id: env_first(&["JANITOR_SECURITY_GROUP_ID", "SECURITY_GROUP_ID"])
                .unwrap_or_default(),
            region: env_first(&["JANITOR_REGION", "AWS_REGION", "REGION"])
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            marker: env_opt("JANITOR_MARKER").unwrap_or_else(|| DEFAULT_MARKER.to_string()),
            ttl_seconds: env_u64("JANITOR_TTL_SECONDS", DEFAULT_TTL_SECONDS),
            dry_run: env_bool("JANITOR_DRY_RUN", false),
        }
    }

    /// Returns `true` when a security group id has been set.
    pub fn is_configured(&self) -> bool {
        !self.security_group_id.is_empty()
    }

    /// The TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Env-based tests must run serially to avoid interfering with each other.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Helper: clear all env vars the config reads.
    fn clear_janitor_env() {
        let keys = [
            "JANITOR_SECURITY_GROUP_ID",
            "SECURITY_GROUP_ID",
            "JANITOR_REGION",
            "AWS_REGION",
            "REGION",
            "JANITOR_MARKER",
            "JANITOR_TTL_SECONDS",
            "JANITOR_DRY_RUN",
        ];
        for k in keys {
            env::remove_var(k);
        }
    }

    #[test]
    fn defaults_when_no_env_vars() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_janitor_env();

        let cfg = JanitorConfig::from_env();

        assert_eq!(cfg.security_group_id, "");
        assert_eq!(cfg.region, "us-east-1");
        assert_eq!(cfg.marker, "auto-rule");
        assert_eq!(cfg.ttl_seconds, DEFAULT_TTL_SECONDS);
        assert!(!cfg.dry_run);
        assert!(!cfg.is_configured());
    }

    #[test]
    fn from_env_reads_vars() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_janitor_env();

        env::set_var("JANITOR_SECURITY_GROUP_ID", "sg-0123456789abcdef0");
        env::set_var("JANITOR_REGION", "eu-west-1");
        env::set_var("JANITOR_MARKER", "team-x-temp");
        env::set_var("JANITOR_TTL_SECONDS", "3600");
        env::set_var("JANITOR_DRY_RUN", "1");

        let cfg = JanitorConfig::from_env();

        assert_eq!(cfg.security_group_id, "sg-0123456789abcdef0");
        assert_eq!(cfg.region, "eu-west-1");
        assert_eq!(cfg.marker, "team-x-temp");
        assert_eq!(cfg.ttl_seconds, 3600);
        assert!(cfg.dry_run);
        assert!(cfg.is_configured());
        assert_eq!(cfg.ttl(), Duration::from_secs(3600));

        clear_janitor_env();
    }

    #[test]
    fn legacy_names_are_accepted() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_janitor_env();

        env::set_var("SECURITY_GROUP_ID", "sg-legacy");
        env::set_var("REGION", "ap-southeast-1");

        let cfg = JanitorConfig::from_env();
        assert_eq!(cfg.security_group_id, "sg-legacy");
        assert_eq!(cfg.region, "ap-southeast-1");

        clear_janitor_env();
    }

    #[test]
    fn janitor_names_take_precedence_over_legacy() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_janitor_env();

        env::set_var("SECURITY_GROUP_ID", "sg-legacy");
        env::set_var("JANITOR_SECURITY_GROUP_ID", "sg-new");
        env::set_var("REGION", "ap-southeast-1");
        env::set_var("AWS_REGION", "us-west-2");

        let cfg = JanitorConfig::from_env();
        assert_eq!(cfg.security_group_id, "sg-new");
        assert_eq!(cfg.region, "us-west-2");

        clear_janitor_env();
    }

    #[test]
    fn invalid_ttl_falls_back_to_default() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_janitor_env();

        env::set_var("JANITOR_TTL_SECONDS", "not_a_number");

        let cfg = JanitorConfig::from_env();
        assert_eq!(cfg.ttl_seconds, DEFAULT_TTL_SECONDS);

        clear_janitor_env();
    }
}
