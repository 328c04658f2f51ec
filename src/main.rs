mod config;
mod models;
mod processing;
mod slack;
mod tracing_init;

use anyhow::{Result, ensure};
use chrono::Utc;
use clap::Parser;
use tokio::signal::ctrl_c;

use crate::config::Cli;
use crate::processing::sweep;
use crate::slack::SlackApiClient;

async fn interrupted() -> String {
    match ctrl_c().await {
        Ok(()) => "received Ctrl+C".to_string(),
        // Without a signal handler the deadline is the only way out.
        Err(_) => std::future::pending().await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_init::init_tracing();
    ensure!(!cli.token.trim().is_empty(), "ARCHIVEBOT_SLACK_TOKEN is empty");

    let settings = cli.settings(Utc::now().timestamp());
    let client = SlackApiClient::new(&cli.api_base, &cli.token, cli.request_timeout())?;

    let stats = sweep::list_and_sweep(&client, &settings, interrupted()).await?;
    stats.print_stats();

    Ok(())
}
