//! Command line and environment configuration, read once at startup.

use std::time::Duration;

use clap::Parser;

pub const DEFAULT_INACTIVE_DAYS: i64 = 30;
pub const DEFAULT_API_BASE: &str = "https://slack.com/api";
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Parser)]
#[command(
    name = "channel-archiver",
    version,
    about = "Archive empty and inactive Slack channels in a single pass"
)]
pub struct Cli {
    /// Slack bot token
    #[arg(long, env = "ARCHIVEBOT_SLACK_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Days without a real message before a channel counts as inactive
    #[arg(long, env = "ARCHIVEBOT_INACTIVE_DAYS")]
    pub inactive_days: Option<String>,

    /// Channel or user id told about archive failures
    #[arg(long = "notify", env = "ARCHIVEBOT_NOTIFY_TARGET")]
    pub notify_target: Option<String>,

    #[arg(long, env = "ARCHIVEBOT_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    #[arg(long, env = "ARCHIVEBOT_REQUEST_TIMEOUT_MS", default_value_t = 10_000)]
    pub request_timeout_ms: u64,

    /// Give up on whatever is still running after this many seconds
    #[arg(long, env = "ARCHIVEBOT_DEADLINE_SECS", default_value_t = 600)]
    pub deadline_secs: u64,

    /// Upper bound on concurrent per-channel requests in each phase
    #[arg(long, env = "ARCHIVEBOT_MAX_CONCURRENCY", default_value_t = 16)]
    pub max_concurrency: usize,

    /// Report what would be archived without archiving anything
    #[arg(long, env = "ARCHIVEBOT_DRY_RUN")]
    pub dry_run: bool,
}

/// Everything the sweep needs, resolved once.
#[derive(Debug, Clone)]
pub struct SweepSettings {
    pub inactive_days: i64,
    pub cutoff: i64,
    pub notify_target: Option<String>,
    pub max_concurrency: usize,
    pub dry_run: bool,
    pub deadline: Duration,
}

/// Unset, blank, non-numeric, zero and negative values fall back to 30 days.
pub fn effective_inactive_days(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|days| *days > 0)
        .unwrap_or(DEFAULT_INACTIVE_DAYS)
}

pub fn retention_cutoff(now: i64, inactive_days: i64) -> i64 {
    now.saturating_sub(inactive_days.saturating_mul(SECONDS_PER_DAY))
}

impl Cli {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn settings(&self, now: i64) -> SweepSettings {
        let inactive_days = effective_inactive_days(self.inactive_days.as_deref());
        SweepSettings {
            inactive_days,
            cutoff: retention_cutoff(now, inactive_days),
            notify_target: self
                .notify_target
                .as_deref()
                .map(str::trim)
                .filter(|target| !target.is_empty())
                .map(str::to_string),
            max_concurrency: self.max_concurrency.max(1),
            dry_run: self.dry_run,
            deadline: Duration::from_secs(self.deadline_secs.max(1)),
        }
    }
}
