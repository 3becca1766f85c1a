//! sweep-worker — one cleanup pass over a security group.
//!
//! Lists the group's ingress rules, revokes every janitor-tagged rule whose
//! TTL has elapsed, logs a summary, and exits. Repetition is the scheduler's
//! job (cron, EventBridge, a timer trigger) — the worker does not loop.
//!
//! Required IAM permissions:
//! - `ec2:DescribeSecurityGroups`
//! - `ec2:RevokeSecurityGroupIngress`

use chrono::Utc;
use clap::Parser;
use tracing::info;

use janitor_core::{DescriptionCodec, ExpiryPolicy};
use janitor_ec2::{Ec2SecurityGroups, JanitorConfig, Sweeper};

// ── CLI ─────────────────────────────────────────────────────────────

/// Security-group janitor — revokes expired tagged ingress rules.
#[derive(Parser, Debug)]
#[command(name = "sweep-worker", version, about)]
struct Cli {
    /// Security group to clean (sg-...). Env fallback is handled by
    /// [`JanitorConfig::from_env`], which also accepts the legacy
    /// `SECURITY_GROUP_ID` name.
    #[arg(long)]
    security_group_id: Option<String>,

    /// AWS region the group lives in. Multi-name env fallback
    /// (`JANITOR_REGION`/`AWS_REGION`/`REGION`) lives in the config.
    #[arg(long)]
    region: Option<String>,

    /// Marker expected in managed rule descriptions.
    #[arg(long, env = "JANITOR_MARKER")]
    marker: Option<String>,

    /// Managed rule time-to-live in seconds.
    #[arg(long, env = "JANITOR_TTL_SECONDS")]
    ttl_seconds: Option<u64>,

    /// Report expired rules without revoking them.
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Env config with CLI flags layered on top.
    fn into_config(self) -> JanitorConfig {
        let mut config = JanitorConfig::from_env();
        if let Some(id) = self.security_group_id {
            config.security_group_id = id;
        }
        if let Some(region) = self.region {
            config.region = region;
        }
        if let Some(marker) = self.marker {
            config.marker = marker;
        }
        if let Some(ttl) = self.ttl_seconds {
            config.ttl_seconds = ttl;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        config
    }
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config();

    let api = Ec2SecurityGroups::new(&config).await?;
    let sweeper = Sweeper::new(
        DescriptionCodec::new(&config.marker),
        ExpiryPolicy::new(config.ttl()),
    )
    .dry_run(config.dry_run);

    info!(
        group_id = %config.security_group_id,
        ttl_seconds = config.ttl_seconds,
        dry_run = config.dry_run,
        "sweep-worker starting"
    );

    let report = sweeper.run(&api, Utc::now()).await?;

    info!(
        examined = report.examined,
        revoked = report.revoked,
        kept = report.kept,
        skipped = report.skipped,
        "sweep-worker exited cleanly"
    );

    Ok(())
}
